//! Backend client bootstrap.
//!
//! The concrete TIDAL API client is not part of this crate yet. The
//! [`ClientFactory`] trait marks where it plugs in: it receives validated
//! credentials and returns whatever handle resources and data sources will
//! share. The default factory does no I/O and simply keeps the credentials.

use crate::config::Credentials;
use crate::error::ProviderError;

/// Builds the backend client once the configuration has been validated.
pub trait ClientFactory: Send + Sync + 'static {
    /// The client handle shared with resources and data sources.
    type Client: Send + Sync + 'static;

    /// Construct a client from credentials that are known and non-empty.
    ///
    /// An error here is reported to the host as a single, non-attribute
    /// diagnostic.
    fn build(&self, credentials: Credentials) -> Result<Self::Client, ProviderError>;
}

/// Client handle holding the TIDAL API credentials.
#[derive(Debug)]
pub struct TidalClient {
    credentials: Credentials,
}

impl TidalClient {
    /// Create a client for the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// The credentials this client authenticates with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Factory producing a [`TidalClient`] without contacting the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialsClientFactory;

impl ClientFactory for CredentialsClientFactory {
    type Client = TidalClient;

    fn build(&self, credentials: Credentials) -> Result<TidalClient, ProviderError> {
        Ok(TidalClient::new(credentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::value::ConfigValue;

    #[test]
    fn test_default_factory_keeps_credentials() {
        let credentials = ProviderConfig::new(
            ConfigValue::from_string("abc"),
            ConfigValue::from_string("xyz"),
        )
        .into_credentials()
        .unwrap();

        let client = CredentialsClientFactory.build(credentials).unwrap();
        assert_eq!(client.credentials().client_id(), "abc");
        assert_eq!(client.credentials().client_secret(), "xyz");
        assert!(!format!("{:?}", client).contains("xyz"));
    }
}
