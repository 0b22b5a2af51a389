//! Diagnostics reported back to the host.
//!
//! A [`Diagnostics`] set is passed by value from one configuration stage to the
//! next. Each stage takes the set, appends what it found and hands it back, so
//! no stage writes into shared state.

use serde::{Deserialize, Serialize};

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// An error that prevents the operation from completing.
    Error,
    /// A warning that doesn't prevent the operation but should be addressed.
    Warning,
}

/// What a configuration diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The payload or one of its attributes has the wrong shape.
    InvalidConfigValue,
    /// The payload carries an attribute the schema does not declare.
    UnsupportedAttribute,
    /// A required value cannot be resolved yet. The host may retry in a later pass.
    UnknownConfigValue,
    /// A required value resolved to the empty string.
    MissingConfigValue,
    /// The backend client could not be built from otherwise valid credentials.
    ClientBuildError,
}

/// A diagnostic message from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: DiagnosticSeverity,
    /// A short summary of the issue.
    pub summary: String,
    /// A detailed description of the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The attribute path where the issue occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// The configuration problem this diagnostic reports, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DiagnosticKind>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
            kind: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
            kind: None,
        }
    }

    /// Create an error scoped to a single attribute.
    pub fn attribute_error(
        attribute: impl Into<String>,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::error(summary)
            .with_detail(detail)
            .with_attribute(attribute)
    }

    /// Add detail to this diagnostic.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the attribute path for this diagnostic.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Tag this diagnostic with the problem it reports.
    pub fn with_kind(mut self, kind: DiagnosticKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Whether this diagnostic has error severity.
    pub fn is_error(&self) -> bool {
        matches!(self.severity, DiagnosticSeverity::Error)
    }
}

/// An ordered set of diagnostics accumulated over one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic and return the updated set.
    pub fn with(mut self, diagnostic: Diagnostic) -> Self {
        self.0.push(diagnostic);
        self
    }

    /// Append every diagnostic from `other` and return the updated set.
    pub fn with_all(mut self, other: impl IntoIterator<Item = Diagnostic>) -> Self {
        self.0.extend(other);
        self
    }

    /// Whether any error-severity diagnostic has been recorded.
    pub fn has_error(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    /// Number of diagnostics in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the diagnostics in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// Iterate over the error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    /// Kinds of all tagged diagnostics, in insertion order.
    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.0.iter().filter_map(|d| d.kind).collect()
    }

    /// Borrow the diagnostics as a slice.
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }

    /// Consume the set, returning the inner list.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self(vec![diagnostic])
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builders() {
        let err = Diagnostic::error("Invalid configuration")
            .with_detail("The value must be positive")
            .with_attribute("count")
            .with_kind(DiagnosticKind::InvalidConfigValue);

        assert_eq!(err.severity, DiagnosticSeverity::Error);
        assert_eq!(err.summary, "Invalid configuration");
        assert_eq!(err.detail, Some("The value must be positive".to_string()));
        assert_eq!(err.attribute, Some("count".to_string()));
        assert_eq!(err.kind, Some(DiagnosticKind::InvalidConfigValue));
    }

    #[test]
    fn test_attribute_error() {
        let err = Diagnostic::attribute_error("client_id", "Missing client_id", "Set it");
        assert!(err.is_error());
        assert_eq!(err.attribute.as_deref(), Some("client_id"));
        assert_eq!(err.detail.as_deref(), Some("Set it"));
        assert!(err.kind.is_none());
    }

    #[test]
    fn test_has_error_ignores_warnings() {
        let diags = Diagnostics::new().with(Diagnostic::warning("Deprecated attribute"));
        assert!(!diags.has_error());
        assert_eq!(diags.len(), 1);

        let diags = diags.with(Diagnostic::error("Broken"));
        assert!(diags.has_error());
        assert_eq!(diags.errors().count(), 1);
    }

    #[test]
    fn test_accumulates_in_order() {
        let diags = Diagnostics::new()
            .with(Diagnostic::error("first").with_kind(DiagnosticKind::UnknownConfigValue))
            .with_all(vec![
                Diagnostic::warning("untagged"),
                Diagnostic::error("second").with_kind(DiagnosticKind::MissingConfigValue),
            ]);

        let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, vec!["first", "untagged", "second"]);
        assert_eq!(
            diags.kinds(),
            vec![
                DiagnosticKind::UnknownConfigValue,
                DiagnosticKind::MissingConfigValue
            ]
        );
    }

    #[test]
    fn test_serializes_as_list() {
        let diags: Diagnostics = vec![Diagnostic::error("Broken")
            .with_attribute("client_id")
            .with_kind(DiagnosticKind::MissingConfigValue)]
        .into();

        let json = serde_json::to_value(&diags).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "severity": "error",
                "summary": "Broken",
                "attribute": "client_id",
                "kind": "missing_config_value"
            }])
        );
    }
}
