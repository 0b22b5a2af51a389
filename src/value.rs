//! Tri-state configuration values.
//!
//! The host evaluates configuration lazily: a value that depends on a resource
//! that has not been applied yet is sent as [`UNKNOWN_VALUE`] instead of its
//! content. [`ConfigValue`] keeps "not known yet" apart from "known but empty"
//! so the two can never be confused.

use serde_json::Value;

/// Sentinel the host sends in place of a value it cannot resolve yet.
pub const UNKNOWN_VALUE: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// A configuration value in one of its three resolution states.
///
/// `Known` never holds an empty string; use [`ConfigValue::from_string`] to
/// build one so `""` lands in `Empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue<T = String> {
    /// The value cannot be determined in this pass.
    Unknown,
    /// The value is known and is null or the empty string.
    Empty,
    /// The value is known and non-empty.
    Known(T),
}

impl ConfigValue<String> {
    /// Classify a resolved string.
    pub fn from_string(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Known(value)
        }
    }

    /// Decode a string attribute from its JSON wire form.
    ///
    /// An absent key or `null` reads as empty. On a type mismatch the JSON type
    /// name is returned so the caller can report it without echoing the value.
    pub fn from_json(value: Option<&Value>) -> Result<Self, &'static str> {
        match value {
            None | Some(Value::Null) => Ok(Self::Empty),
            Some(Value::String(s)) if s == UNKNOWN_VALUE => Ok(Self::Unknown),
            Some(Value::String(s)) => Ok(Self::from_string(s.as_str())),
            Some(other) => Err(json_type_name(other)),
        }
    }
}

impl<T> ConfigValue<T> {
    /// Whether the value is not resolved yet.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Whether the value is resolved and empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether the value is resolved and non-empty.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Transform the known content, keeping the resolution state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ConfigValue<U> {
        match self {
            Self::Unknown => ConfigValue::Unknown,
            Self::Empty => ConfigValue::Empty,
            Self::Known(v) => ConfigValue::Known(f(v)),
        }
    }

    /// Borrow the known content.
    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }

    /// Take the known content.
    pub fn into_known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            _ => None,
        }
    }
}

/// Name of a JSON value's type as shown in diagnostics.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_string_normalises_empty() {
        assert_eq!(ConfigValue::from_string(""), ConfigValue::Empty);
        assert_eq!(
            ConfigValue::from_string("abc"),
            ConfigValue::Known("abc".to_string())
        );
    }

    #[test]
    fn test_from_json_states() {
        assert_eq!(ConfigValue::from_json(None), Ok(ConfigValue::Empty));
        assert_eq!(ConfigValue::from_json(Some(&json!(null))), Ok(ConfigValue::Empty));
        assert_eq!(ConfigValue::from_json(Some(&json!(""))), Ok(ConfigValue::Empty));
        assert_eq!(
            ConfigValue::from_json(Some(&json!(UNKNOWN_VALUE))),
            Ok(ConfigValue::Unknown)
        );
        assert_eq!(
            ConfigValue::from_json(Some(&json!("abc"))),
            Ok(ConfigValue::Known("abc".to_string()))
        );
    }

    #[test]
    fn test_from_json_type_mismatch() {
        assert_eq!(ConfigValue::from_json(Some(&json!(42))), Err("number"));
        assert_eq!(ConfigValue::from_json(Some(&json!(true))), Err("bool"));
        assert_eq!(ConfigValue::from_json(Some(&json!(["a"]))), Err("array"));
    }

    #[test]
    fn test_predicates_and_map() {
        let unknown: ConfigValue = ConfigValue::Unknown;
        assert!(unknown.is_unknown());
        assert!(!unknown.is_empty());
        assert!(unknown.clone().map(|s| s.len()).is_unknown());

        let known = ConfigValue::from_string("xyz");
        assert!(known.is_known());
        assert_eq!(known.as_known().map(String::as_str), Some("xyz"));
        assert_eq!(known.map(|s| s.len()).into_known(), Some(3));

        let empty = ConfigValue::from_string("");
        assert!(empty.is_empty());
        assert_eq!(empty.into_known(), None);
    }
}
