//! Provider configuration pipeline.
//!
//! A raw configuration passes through four gated stages:
//!
//! 1. **Decode**: the payload must be an object of declared attributes with
//!    string values (or the unknown sentinel, or null).
//! 2. **Unknown**: every attribute the host could not resolve yet is reported.
//! 3. **Empty**: every attribute that resolved to `""` (or null) is reported.
//! 4. **Bootstrap**: the [`ClientFactory`] builds the backend client.
//!
//! Within a stage both attributes are always checked, so one pass reports every
//! problem of that stage at once. A stage that records an error ends the pass;
//! later stages never run on values an earlier stage rejected.
//!
//! The pipeline holds no state between calls. Validating the same payload
//! twice gives the same diagnostics.

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::ClientFactory;
use crate::config::{provider_config_schema, ProviderConfig, CLIENT_ID, CLIENT_SECRET};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::ProviderError;
use crate::validation;

#[derive(Debug, Clone, Copy)]
enum Stage {
    Decode,
    Unknown,
    Empty,
    Bootstrap,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Stage::Decode => "decode",
            Stage::Unknown => "unknown",
            Stage::Empty => "empty",
            Stage::Bootstrap => "bootstrap",
        }
    }
}

/// Run the decode, unknown and empty stages.
///
/// On success the returned configuration has both values known and non-empty.
pub fn validate(raw: &Value) -> Result<ProviderConfig, Diagnostics> {
    let (config, diagnostics) = decode(raw, Diagnostics::new())?;
    let diagnostics = gate(Stage::Unknown, check_unknown(&config, diagnostics))?;
    gate(Stage::Empty, check_empty(&config, diagnostics))?;
    Ok(config)
}

/// Validate the configuration and build the backend client.
pub fn configure<F: ClientFactory>(factory: &F, raw: &Value) -> Result<F::Client, Diagnostics> {
    let config = validate(raw)?;
    bootstrap(factory, config)
}

fn gate(stage: Stage, diagnostics: Diagnostics) -> Result<Diagnostics, Diagnostics> {
    if diagnostics.has_error() {
        debug!(
            stage = stage.as_str(),
            errors = diagnostics.errors().count(),
            "Configuration stage failed"
        );
        Err(diagnostics)
    } else {
        Ok(diagnostics)
    }
}

fn decode(
    raw: &Value,
    diagnostics: Diagnostics,
) -> Result<(ProviderConfig, Diagnostics), Diagnostics> {
    let schema = provider_config_schema();
    let diagnostics = gate(
        Stage::Decode,
        diagnostics.with_all(validation::validate(&schema, raw)),
    )?;

    Ok((ProviderConfig::from_json(raw), diagnostics))
}

fn check_unknown(config: &ProviderConfig, diagnostics: Diagnostics) -> Diagnostics {
    let fields = [
        (CLIENT_ID, config.client_id.is_unknown()),
        (CLIENT_SECRET, config.client_secret.is_unknown()),
    ];
    diagnostics.with_all(
        fields
            .into_iter()
            .filter(|(_, unknown)| *unknown)
            .map(|(name, _)| unknown_value(name)),
    )
}

fn check_empty(config: &ProviderConfig, diagnostics: Diagnostics) -> Diagnostics {
    let fields = [
        (CLIENT_ID, config.client_id.is_empty()),
        (CLIENT_SECRET, config.client_secret.is_empty()),
    ];
    diagnostics.with_all(
        fields
            .into_iter()
            .filter(|(_, empty)| *empty)
            .map(|(name, _)| missing_value(name)),
    )
}

fn bootstrap<F: ClientFactory>(
    factory: &F,
    config: ProviderConfig,
) -> Result<F::Client, Diagnostics> {
    let credentials = config
        .into_credentials()
        .map_err(|e| Diagnostics::from(client_build_error(&e)))?;

    debug!(client_id = %credentials.client_id(), "Creating TIDAL API client");

    factory.build(credentials).map_err(|e| {
        warn!(
            stage = Stage::Bootstrap.as_str(),
            error = %e,
            "Unable to create TIDAL API client"
        );
        Diagnostics::from(client_build_error(&e))
    })
}

fn unknown_value(field: &str) -> Diagnostic {
    Diagnostic::attribute_error(
        field,
        format!("Unknown TIDAL API {}", field),
        format!(
            "The provider cannot create the TIDAL API client as there is an unknown \
             configuration value for the TIDAL API {}. The value may depend on a \
             resource that has not been applied yet; apply that resource first or set \
             the value statically in the configuration.",
            field
        ),
    )
    .with_kind(DiagnosticKind::UnknownConfigValue)
}

fn missing_value(field: &str) -> Diagnostic {
    Diagnostic::attribute_error(
        field,
        format!("Missing TIDAL API {}", field),
        format!(
            "The provider cannot create the TIDAL API client as there is a missing or \
             empty value for the TIDAL API {}.",
            field
        ),
    )
    .with_kind(DiagnosticKind::MissingConfigValue)
}

fn client_build_error(err: &ProviderError) -> Diagnostic {
    Diagnostic::error("Unable to Create TIDAL API Client")
        .with_detail(format!(
            "An unexpected error occurred when creating the TIDAL API client. If the \
             error is not clear, please contact the provider developers.\n\n\
             TIDAL Client Error: {}",
            err.message()
        ))
        .with_kind(DiagnosticKind::ClientBuildError)
}
