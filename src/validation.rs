//! Schema conformance checks for configuration payloads.
//!
//! This is the first gate a configuration passes: the payload must be an
//! object whose attributes are declared in the [`Schema`] and carry values of
//! the declared type. Presence is not checked here; a required attribute that
//! is absent or null reads as empty and is reported by the emptiness stage of
//! [`configure`](crate::configure).
//!
//! Messages name the expected and actual JSON types only, never the value,
//! so sensitive attributes cannot leak through a type error.
//!
//! # Example
//!
//! ```
//! use terraform_provider_tidal::schema::{Attribute, Schema};
//! use terraform_provider_tidal::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0().with_attribute("name", Attribute::required_string());
//!
//! assert!(validate(&schema, &json!({"name": "test"})).is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"name": 42}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("name".to_string()));
//! ```

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::schema::{Attribute, AttributeType, Schema};
use crate::value::{json_type_name, UNKNOWN_VALUE};
use serde_json::Value;

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value conforms.
///
/// # Validation Rules
///
/// - The root must be an object (or null, which reads as all-empty)
/// - Attributes not declared in the schema are rejected
/// - Absent and null attributes are accepted
/// - The unknown sentinel is accepted for any attribute type
/// - Every other value must match the declared type
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return diagnostics,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!(
                        "The provider configuration must be an object, got {}",
                        json_type_name(value)
                    ))
                    .with_kind(DiagnosticKind::InvalidConfigValue),
            );
            return diagnostics;
        },
    };

    for name in obj.keys() {
        if schema.attribute(name).is_none() {
            diagnostics.push(
                Diagnostic::attribute_error(
                    name.as_str(),
                    format!("Unsupported attribute '{}'", name),
                    "This attribute is not declared in the provider schema",
                )
                .with_kind(DiagnosticKind::UnsupportedAttribute),
            );
        }
    }

    for (name, attr) in &schema.block.attributes {
        validate_attribute(attr, obj.get(name), name, &mut diagnostics);
    }

    diagnostics
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match value {
        None | Some(Value::Null) => {},
        Some(Value::String(s)) if s == UNKNOWN_VALUE => {},
        Some(v) => match attr.attr_type {
            AttributeType::String if v.is_string() => {},
            AttributeType::String => diagnostics.push(type_error(path, &attr.attr_type, v)),
        },
    }
}

fn type_error(path: &str, expected: &AttributeType, got: &Value) -> Diagnostic {
    Diagnostic::attribute_error(
        path,
        format!("Invalid type for attribute '{}'", path),
        format!("Expected {}, got {}", expected.name(), json_type_name(got)),
    )
    .with_kind(DiagnosticKind::InvalidConfigValue)
}
