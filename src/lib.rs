//! TIDAL infrastructure provider
//!
//! This crate is a provider plugin for a declarative infrastructure host. It
//! registers under the type name `tidal` and exposes no resources or data
//! sources yet. Its job is to accept the provider configuration block, check
//! it, and build the TIDAL API client every later operation will share.
//!
//! # Overview
//!
//! - **Configuration pipeline** ([`configure`]): decode, reject unknown values,
//!   reject empty values, then build the client. Each stage only runs when
//!   the previous one produced no errors.
//! - **Tri-state values** ([`value::ConfigValue`]): unknown, empty, or known.
//! - **Client bootstrap** ([`ClientFactory`]): the seam where a real API client
//!   is constructed from validated [`Credentials`].
//! - **Provider shell** ([`TidalProvider`]): implements [`ProviderService`] and
//!   holds the configured client.
//! - **Server helpers** ([`serve`]): gRPC server with the handshake protocol
//!   and graceful shutdown.
//!
//! # Quick Start
//!
//! ```ignore
//! use terraform_provider_tidal::{init_logging, serve, TidalProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging();
//!     serve(TidalProvider::new(env!("CARGO_PKG_VERSION"))).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Handshake Protocol
//!
//! When the provider starts via [`serve`], it outputs a handshake string to stdout:
//!
//! ```text
//! TIDAL_PROVIDER|1|127.0.0.1:50051
//! ```
//!
//! Format: `TIDAL_PROVIDER|<protocol_version>|<address>`
//!
//! # Provider Protocol
//!
//! - **GetMetadata**: Returns the type name, version, and resource/data source names
//! - **GetSchema**: Returns the provider configuration schema
//! - **ValidateProviderConfig**: Checks the configuration without building a client
//! - **Configure**: Checks the configuration and builds the API client
//! - **Stop**: Releases the client

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod configure;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod provider;
pub mod schema;
pub mod server;
pub mod testing;
pub mod types;
pub mod validation;
pub mod value;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated;

// Re-export main types at crate root
pub use client::{ClientFactory, CredentialsClientFactory, TidalClient};
pub use config::{Credentials, ProviderConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSeverity, Diagnostics};
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::TidalProvider;
pub use schema::ProviderSchema;
pub use server::{
    serve, serve_on, serve_on_with_options, serve_with_options, ProviderService, ServeOptions,
};
pub use types::{ProviderMetadata, HANDSHAKE_PREFIX, PROTOCOL_VERSION};
pub use value::{ConfigValue, UNKNOWN_VALUE};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tonic;
pub use tracing;
