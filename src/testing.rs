//! Testing utilities for provider implementations.
//!
//! This module provides utilities to test `ProviderService` implementations
//! without spinning up a full gRPC server.
//!
//! # Example
//!
//! ```ignore
//! use terraform_provider_tidal::testing::ProviderTester;
//! use terraform_provider_tidal::TidalProvider;
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_configure() {
//!     let tester = ProviderTester::new(TidalProvider::new("test"));
//!     tester
//!         .configure(json!({"client_id": "abc", "client_secret": "xyz"}))
//!         .await
//!         .unwrap();
//! }
//! ```

use std::io;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::ProviderError;
use crate::schema::ProviderSchema;
use crate::server::ProviderService;
use crate::types::ProviderMetadata;

/// A test harness for provider implementations.
///
/// This wraps a `ProviderService` implementation and provides
/// simplified methods for testing without a gRPC server.
pub struct ProviderTester<P: ProviderService> {
    provider: P,
}

impl<P: ProviderService> ProviderTester<P> {
    /// Create a new tester for the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get the provider's metadata.
    pub fn metadata(&self) -> ProviderMetadata {
        self.provider.metadata()
    }

    /// Get the provider's schema.
    pub fn schema(&self) -> ProviderSchema {
        self.provider.schema()
    }

    /// Get the list of resource type names.
    pub fn resource_types(&self) -> Vec<String> {
        self.provider.metadata().resources
    }

    /// Get the list of data source type names.
    pub fn data_source_types(&self) -> Vec<String> {
        self.provider.metadata().data_sources
    }

    /// Validate provider configuration.
    ///
    /// Returns `Ok(())` if validation passes (no error diagnostics).
    /// Returns `Err` with the diagnostics if there are errors.
    pub async fn validate_provider_config(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.validate_provider_config(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Configure the provider.
    ///
    /// Returns `Ok(())` if configuration succeeds.
    /// Returns `Err` with the diagnostics if there are errors.
    pub async fn configure(&self, config: Value) -> Result<(), TestError> {
        let diagnostics = self.provider.configure(config).await?;
        check_diagnostics(diagnostics)
    }

    /// Stop the provider.
    pub async fn stop(&self) -> Result<(), ProviderError> {
        self.provider.stop().await
    }
}

/// Error type for test operations that may fail with diagnostics.
#[derive(Debug)]
pub enum TestError {
    /// The operation failed with diagnostics.
    Diagnostics(Diagnostics),
    /// The operation failed with a provider error.
    Provider(ProviderError),
}

impl TestError {
    /// The diagnostics carried by this error, if any.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            TestError::Diagnostics(diags) => Some(diags),
            TestError::Provider(_) => None,
        }
    }
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Diagnostics(diags) => {
                writeln!(f, "Operation failed with {} diagnostic(s):", diags.len())?;
                for diag in diags {
                    write!(f, "  [{:?}] {}", diag.severity, diag.summary)?;
                    if let Some(detail) = &diag.detail {
                        write!(f, ": {}", detail)?;
                    }
                    if let Some(attr) = &diag.attribute {
                        write!(f, " (at {})", attr)?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            },
            TestError::Provider(e) => write!(f, "Provider error: {}", e),
        }
    }
}

impl std::error::Error for TestError {}

impl From<ProviderError> for TestError {
    fn from(e: ProviderError) -> Self {
        TestError::Provider(e)
    }
}

/// Check diagnostics and return an error if there are any errors.
fn check_diagnostics(diagnostics: Diagnostics) -> Result<(), TestError> {
    let errors: Diagnostics = diagnostics.into_iter().filter(Diagnostic::is_error).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(TestError::Diagnostics(errors))
    }
}

// =========================================================================
// Log Capture
// =========================================================================

#[derive(Clone, Default)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log capture buffer poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber that records every event at
/// `TRACE` and above, returning `f`'s result and the rendered log output.
///
/// Only events emitted on the calling thread are captured, which covers
/// synchronous code and futures driven by a current-thread runtime.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);

    let logs = writer
        .0
        .lock()
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default();
    (result, logs)
}

// =========================================================================
// Assertion Helpers
// =========================================================================

/// Assert that diagnostics contain no errors.
///
/// # Panics
///
/// Panics if there are any error diagnostics.
pub fn assert_no_errors(diagnostics: &Diagnostics) {
    let errors: Vec<_> = diagnostics.errors().collect();

    assert!(
        errors.is_empty(),
        "Expected no errors, but got {} error(s): {:?}",
        errors.len(),
        errors.iter().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that diagnostics contain at least one error.
///
/// # Panics
///
/// Panics if there are no error diagnostics.
pub fn assert_has_errors(diagnostics: &Diagnostics) {
    assert!(
        diagnostics.has_error(),
        "Expected at least one error, but got none"
    );
}

/// Assert that diagnostics contain an error with the given summary substring.
///
/// # Panics
///
/// Panics if no error diagnostic contains the given substring.
pub fn assert_error_contains(diagnostics: &Diagnostics, substring: &str) {
    let has_matching_error = diagnostics.errors().any(|d| d.summary.contains(substring));

    assert!(
        has_matching_error,
        "Expected an error containing '{}', but no matching error found. Errors: {:?}",
        substring,
        diagnostics.errors().map(|d| &d.summary).collect::<Vec<_>>()
    );
}

/// Assert that the tagged diagnostics are exactly `expected`, in order, each
/// paired with its attribute path (`None` for unscoped diagnostics).
///
/// # Panics
///
/// Panics if the kinds or their attribute paths differ.
pub fn assert_diagnostic_kinds(
    diagnostics: &Diagnostics,
    expected: &[(DiagnosticKind, Option<&str>)],
) {
    let actual: Vec<_> = diagnostics
        .iter()
        .filter_map(|d| d.kind.map(|k| (k, d.attribute.as_deref())))
        .collect();

    assert_eq!(
        actual, expected,
        "Diagnostic kinds differ from the expected set"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, Schema};
    use crate::types::ProviderMetadata;
    use serde_json::json;

    // A provider that insists on an api_key, for testing the tester
    struct TestProvider;

    #[async_trait::async_trait]
    impl ProviderService for TestProvider {
        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                type_name: "test".to_string(),
                version: "0.0.0".to_string(),
                resources: vec!["test_resource".to_string()],
                data_sources: vec![],
            }
        }

        fn schema(&self) -> ProviderSchema {
            ProviderSchema {
                provider: Schema::v0().with_attribute("api_key", Attribute::required_string()),
                resources: [("test_resource".to_string(), Schema::v0())].into(),
                data_sources: Default::default(),
            }
        }

        async fn configure(&self, config: Value) -> Result<Diagnostics, ProviderError> {
            match config.get("api_key") {
                Some(Value::String(_)) => Ok(Diagnostics::new()
                    .with(Diagnostic::warning("api_key will be rotated"))),
                Some(_) => Err(ProviderError::Configuration("api_key must be a string".into())),
                None => Ok(Diagnostics::from(
                    Diagnostic::attribute_error("api_key", "Missing api_key", "Set it")
                        .with_kind(DiagnosticKind::MissingConfigValue),
                )),
            }
        }
    }

    #[tokio::test]
    async fn test_tester_configure_ignores_warnings() {
        let tester = ProviderTester::new(TestProvider);
        tokio_test::assert_ok!(tester.configure(json!({"api_key": "test"})).await);
    }

    #[tokio::test]
    async fn test_tester_configure_reports_diagnostics() {
        let tester = ProviderTester::new(TestProvider);
        let err = tester.configure(json!({})).await.unwrap_err();

        let diagnostics = err.diagnostics().unwrap();
        assert_has_errors(diagnostics);
        assert_error_contains(diagnostics, "Missing api_key");
        assert_diagnostic_kinds(
            diagnostics,
            &[(DiagnosticKind::MissingConfigValue, Some("api_key"))],
        );
    }

    #[tokio::test]
    async fn test_tester_configure_provider_error() {
        let tester = ProviderTester::new(TestProvider);
        let err = tester.configure(json!({"api_key": 1})).await.unwrap_err();
        assert!(matches!(err, TestError::Provider(ProviderError::Configuration(_))));
        assert!(err.diagnostics().is_none());
    }

    #[tokio::test]
    async fn test_tester_default_validate_and_stop() {
        let tester = ProviderTester::new(TestProvider);
        tokio_test::assert_ok!(tester.validate_provider_config(json!({})).await);
        tokio_test::assert_ok!(tester.stop().await);
    }

    #[test]
    fn test_tester_metadata() {
        let tester = ProviderTester::new(TestProvider);
        assert_eq!(tester.metadata().type_name, "test");
        assert_eq!(tester.resource_types(), vec!["test_resource".to_string()]);
        assert!(tester.data_source_types().is_empty());
        assert!(tester.schema().resources.contains_key("test_resource"));
    }

    #[test]
    fn test_assert_no_errors() {
        let diagnostics = Diagnostics::from(Diagnostic::warning("Just a warning"));
        assert_no_errors(&diagnostics);
    }

    #[test]
    #[should_panic(expected = "Expected no errors")]
    fn test_assert_no_errors_fails() {
        let diagnostics = Diagnostics::from(Diagnostic::error("An error"));
        assert_no_errors(&diagnostics);
    }

    #[test]
    fn test_capture_logs_records_events() {
        let (value, logs) = capture_logs(|| {
            tracing::debug!(answer = 42, "inside capture");
            7
        });
        assert_eq!(value, 7);
        assert!(logs.contains("inside capture"));
        assert!(logs.contains("answer=42"));
    }

    #[test]
    fn test_test_error_display() {
        let err = TestError::Diagnostics(
            Diagnostics::new()
                .with(Diagnostic::error("First error").with_attribute("field1"))
                .with(Diagnostic::error("Second error").with_detail("More info")),
        );

        let display = format!("{}", err);
        assert!(display.contains("First error"));
        assert!(display.contains("Second error"));
        assert!(display.contains("field1"));
        assert!(display.contains("More info"));
    }
}
