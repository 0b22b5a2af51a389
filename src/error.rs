//! Error types for the TIDAL provider.
//!
//! User-facing configuration problems are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s. `ProviderError` covers the
//! faults outside that model: payloads that cannot be decoded, a backend client
//! that cannot be built, and transport failures.

use thiserror::Error;

/// Errors that can occur while serving or configuring the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider configuration is not usable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend client could not be constructed from the credentials.
    #[error("Client build error: {0}")]
    ClientBuild(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A gRPC transport error occurred.
    #[error("Transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// Binding or accepting on the listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Get the error message as a string.
    ///
    /// Returns a reference to the error message for any variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Configuration(msg) => msg,
            Self::ClientBuild(msg) => msg,
            Self::Serialization(_err) => "serialization error (see Debug output)",
            Self::Transport(_err) => "transport error (see Debug output)",
            Self::Io(_err) => "I/O error (see Debug output)",
        }
    }
}

impl From<ProviderError> for tonic::Status {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Configuration(msg) => tonic::Status::failed_precondition(msg),
            ProviderError::ClientBuild(msg) => tonic::Status::failed_precondition(msg),
            ProviderError::Serialization(err) => {
                tonic::Status::invalid_argument(format!("Serialization error: {}", err))
            },
            ProviderError::Transport(err) => {
                tonic::Status::unavailable(format!("Transport error: {}", err))
            },
            ProviderError::Io(err) => tonic::Status::unavailable(format!("I/O error: {}", err)),
        }
    }
}
