//! Logging setup for the provider binary.
//!
//! All logs are written to **stderr**. Stdout carries the handshake line and
//! nothing else.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls log levels (e.g., `info`, `debug`,
//!   `terraform_provider_tidal=debug`)
//!
//! # Examples
//!
//! ```bash
//! # Show info logs (default)
//! RUST_LOG=info ./terraform-provider-tidal
//!
//! # Show debug logs for the configuration pipeline only
//! RUST_LOG=terraform_provider_tidal::configure=debug ./terraform-provider-tidal
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the default logging subscriber.
///
/// Filters with `RUST_LOG`, falling back to `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with a custom default level.
///
/// Like [`init_logging`], but `default_level` is used when `RUST_LOG` is not
/// set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    subscriber(env_filter(default_level)).init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Unlike [`init_logging`], this function does not panic if a subscriber
/// has already been set.
pub fn try_init_logging() -> bool {
    subscriber(env_filter("info")).try_init().is_ok()
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    )
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be set once per process, so only the
    // filter parsing is exercised here.

    use super::*;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("terraform_provider_tidal=debug").is_ok());
        assert!(EnvFilter::try_new("warn,terraform_provider_tidal::configure=debug").is_ok());
    }

    #[test]
    fn test_subscriber_builds_without_installing() {
        let subscriber = subscriber(EnvFilter::new("debug"));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("scoped subscriber");
        });
    }
}
