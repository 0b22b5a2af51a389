//! The TIDAL provider.
//!
//! [`TidalProvider`] is the object the plugin host drives. It holds only its
//! version tag, the client factory, and the client built by the last successful
//! configure call. Resources and data sources will read that client through
//! [`TidalProvider::client`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::client::{ClientFactory, CredentialsClientFactory};
use crate::config::provider_config_schema;
use crate::configure;
use crate::diagnostics::Diagnostics;
use crate::error::ProviderError;
use crate::schema::{ProviderSchema, Schema};
use crate::server::ProviderService;
use crate::types::ProviderMetadata;

/// Provider type name; resource type names are prefixed with it.
pub const TYPE_NAME: &str = "tidal";

/// The TIDAL provider.
pub struct TidalProvider<F: ClientFactory = CredentialsClientFactory> {
    // "dev" for local builds, "test" under acceptance tests, the crate
    // version on release.
    version: String,
    factory: F,
    client: RwLock<Option<Arc<F::Client>>>,
}

impl TidalProvider {
    /// Create a provider using the default client factory.
    pub fn new(version: impl Into<String>) -> Self {
        Self::with_factory(version, CredentialsClientFactory)
    }
}

impl<F: ClientFactory> TidalProvider<F> {
    /// Create a provider that builds its client with `factory`.
    pub fn with_factory(version: impl Into<String>, factory: F) -> Self {
        Self {
            version: version.into(),
            factory,
            client: RwLock::new(None),
        }
    }

    /// The provider version tag.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Resource types implemented by this provider, keyed by type name.
    pub fn resources(&self) -> BTreeMap<String, Schema> {
        BTreeMap::new()
    }

    /// Data source types implemented by this provider, keyed by type name.
    pub fn data_sources(&self) -> BTreeMap<String, Schema> {
        BTreeMap::new()
    }

    /// The client built by the last successful configure call.
    pub async fn client(&self) -> Option<Arc<F::Client>> {
        self.client.read().await.clone()
    }
}

#[async_trait::async_trait]
impl<F: ClientFactory> ProviderService for TidalProvider<F> {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: TYPE_NAME.to_string(),
            version: self.version.clone(),
            resources: self.resources().into_keys().collect(),
            data_sources: self.data_sources().into_keys().collect(),
        }
    }

    fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            provider: provider_config_schema(),
            resources: self.resources(),
            data_sources: self.data_sources(),
        }
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Diagnostics, ProviderError> {
        match configure::validate(&config) {
            Ok(_) => Ok(Diagnostics::new()),
            Err(diagnostics) => Ok(diagnostics),
        }
    }

    async fn configure(&self, config: Value) -> Result<Diagnostics, ProviderError> {
        match configure::configure(&self.factory, &config) {
            Ok(client) => {
                *self.client.write().await = Some(Arc::new(client));
                info!(version = %self.version, "TIDAL provider configured");
                Ok(Diagnostics::new())
            },
            Err(diagnostics) => Ok(diagnostics),
        }
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        if self.client.write().await.take().is_some() {
            debug!("Released TIDAL API client");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TidalClient;
    use crate::config::{Credentials, CLIENT_ID, CLIENT_SECRET};
    use crate::diagnostics::DiagnosticKind;
    use crate::testing::{assert_diagnostic_kinds, assert_no_errors, capture_logs, ProviderTester};
    use crate::value::UNKNOWN_VALUE;
    use serde_json::json;

    struct RejectingFactory;

    impl ClientFactory for RejectingFactory {
        type Client = TidalClient;

        fn build(&self, _credentials: Credentials) -> Result<TidalClient, ProviderError> {
            Err(ProviderError::ClientBuild("invalid_client".to_string()))
        }
    }

    #[test]
    fn test_metadata() {
        let provider = TidalProvider::new("test");
        let metadata = provider.metadata();

        assert_eq!(metadata.type_name, "tidal");
        assert_eq!(metadata.version, "test");
        assert!(metadata.resources.is_empty());
        assert!(metadata.data_sources.is_empty());
    }

    #[test]
    fn test_schema() {
        let tester = ProviderTester::new(TidalProvider::new("test"));
        let schema = tester.schema();

        assert!(schema.provider.attribute(CLIENT_ID).unwrap().flags.required);
        assert!(schema.provider.attribute(CLIENT_SECRET).unwrap().flags.sensitive);
        assert!(schema.resources.is_empty());
        assert!(schema.data_sources.is_empty());
        assert!(tester.resource_types().is_empty());
        assert!(tester.data_source_types().is_empty());
    }

    #[tokio::test]
    async fn test_validate_does_not_build_client() {
        let provider = TidalProvider::new("test");

        let diagnostics = provider
            .validate_provider_config(json!({"client_id": "abc", "client_secret": "xyz"}))
            .await
            .unwrap();
        assert_no_errors(&diagnostics);
        assert!(provider.client().await.is_none());
    }

    #[tokio::test]
    async fn test_validate_reports_unknown_values() {
        let provider = TidalProvider::new("test");

        let diagnostics = provider
            .validate_provider_config(json!({"client_id": UNKNOWN_VALUE, "client_secret": ""}))
            .await
            .unwrap();
        assert_diagnostic_kinds(
            &diagnostics,
            &[(DiagnosticKind::UnknownConfigValue, Some(CLIENT_ID))],
        );
    }

    #[tokio::test]
    async fn test_configure_stores_client() {
        let tester = ProviderTester::new(TidalProvider::new("test"));
        tokio_test::assert_ok!(
            tester
                .configure(json!({"client_id": "abc", "client_secret": "xyz"}))
                .await
        );

        let client = tester.provider().client().await.unwrap();
        assert_eq!(client.credentials().client_id(), "abc");
    }

    #[tokio::test]
    async fn test_failed_configure_keeps_previous_client() {
        let provider = TidalProvider::new("test");
        provider
            .configure(json!({"client_id": "abc", "client_secret": "xyz"}))
            .await
            .unwrap();

        let diagnostics = provider
            .configure(json!({"client_id": "", "client_secret": ""}))
            .await
            .unwrap();
        assert_diagnostic_kinds(
            &diagnostics,
            &[
                (DiagnosticKind::MissingConfigValue, Some(CLIENT_ID)),
                (DiagnosticKind::MissingConfigValue, Some(CLIENT_SECRET)),
            ],
        );

        let client = provider.client().await.unwrap();
        assert_eq!(client.credentials().client_id(), "abc");
    }

    #[tokio::test]
    async fn test_client_build_failure() {
        let provider = TidalProvider::with_factory("test", RejectingFactory);

        let diagnostics = provider
            .configure(json!({"client_id": "abc", "client_secret": "xyz"}))
            .await
            .unwrap();
        assert_diagnostic_kinds(&diagnostics, &[(DiagnosticKind::ClientBuildError, None)]);
        assert!(provider.client().await.is_none());
    }

    #[tokio::test]
    async fn test_stop_releases_client() {
        let tester = ProviderTester::new(TidalProvider::new("test"));
        tester
            .configure(json!({"client_id": "abc", "client_secret": "xyz"}))
            .await
            .unwrap();

        tokio_test::assert_ok!(tester.stop().await);
        assert!(tester.provider().client().await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_validations_are_independent() {
        let provider = TidalProvider::new("test");

        let (unknown, missing) = tokio::join!(
            provider.validate_provider_config(json!({"client_id": UNKNOWN_VALUE})),
            provider.validate_provider_config(json!({"client_id": "abc", "client_secret": ""})),
        );

        assert_diagnostic_kinds(
            &unknown.unwrap(),
            &[(DiagnosticKind::UnknownConfigValue, Some(CLIENT_ID))],
        );
        assert_diagnostic_kinds(
            &missing.unwrap(),
            &[(DiagnosticKind::MissingConfigValue, Some(CLIENT_SECRET))],
        );
    }

    #[test]
    fn test_configure_never_logs_secret() {
        let secret = "s3cr3t-tidal-key";
        let provider = TidalProvider::new("test");

        let (diagnostics, logs) = capture_logs(|| {
            tokio_test::block_on(async {
                let ok = provider
                    .configure(json!({"client_id": "abc", "client_secret": secret}))
                    .await
                    .unwrap();
                let failed = provider
                    .configure(json!({"client_id": "", "client_secret": secret}))
                    .await
                    .unwrap();
                ok.with_all(failed)
            })
        });

        assert!(logs.contains("TIDAL provider configured"));
        assert!(!logs.contains(secret));
        assert!(!serde_json::to_string(&diagnostics).unwrap().contains(secret));
    }
}
