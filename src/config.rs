//! The provider configuration block.

use std::fmt;

use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

use crate::error::ProviderError;
use crate::schema::{Attribute, Schema};
use crate::value::ConfigValue;

/// Attribute name of the API client identifier.
pub const CLIENT_ID: &str = "client_id";

/// Attribute name of the API client secret.
pub const CLIENT_SECRET: &str = "client_secret";

/// Schema of the provider configuration block.
pub fn provider_config_schema() -> Schema {
    Schema::v0()
        .with_description("Interact with the TIDAL API.")
        .with_attribute(
            CLIENT_ID,
            Attribute::required_string()
                .with_description("OAuth client ID of the TIDAL API application."),
        )
        .with_attribute(
            CLIENT_SECRET,
            Attribute::required_string()
                .with_description("OAuth client secret of the TIDAL API application.")
                .sensitive(),
        )
}

/// The user-supplied provider block, decoded but not yet validated.
pub struct ProviderConfig {
    /// Credential identifier.
    pub client_id: ConfigValue,
    /// Credential secret.
    pub client_secret: ConfigValue<Secret<String>>,
}

impl ProviderConfig {
    /// Build a configuration from already-classified values.
    pub fn new(client_id: ConfigValue, client_secret: ConfigValue) -> Self {
        Self {
            client_id,
            client_secret: client_secret.map(Secret::new),
        }
    }

    /// Read the provider block from its JSON wire form.
    ///
    /// `value` must already have passed [`validate`](crate::validation::validate)
    /// against [`provider_config_schema`], which rejects every non-string
    /// value. Anything else reads as empty.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| {
            let raw = match value {
                Value::Object(map) => map.get(name),
                _ => None,
            };
            ConfigValue::from_json(raw).unwrap_or(ConfigValue::Empty)
        };

        Self::new(field(CLIENT_ID), field(CLIENT_SECRET))
    }

    /// Extract the credentials. Both values must be known and non-empty.
    pub fn into_credentials(self) -> Result<Credentials, ProviderError> {
        match (self.client_id, self.client_secret) {
            (ConfigValue::Known(client_id), ConfigValue::Known(client_secret)) => Ok(Credentials {
                client_id,
                client_secret,
            }),
            _ => Err(ProviderError::Configuration(
                "client_id and client_secret must both be known and non-empty".to_string(),
            )),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = match &self.client_secret {
            ConfigValue::Unknown => "<unknown>",
            ConfigValue::Empty => "<empty>",
            ConfigValue::Known(_) => "[REDACTED]",
        };
        f.debug_struct("ProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &secret)
            .finish()
    }
}

/// A validated credential pair.
pub struct Credentials {
    client_id: String,
    client_secret: Secret<String>,
}

impl Credentials {
    /// The client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The client secret. Never log the returned value.
    pub fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use crate::value::UNKNOWN_VALUE;
    use serde_json::json;

    #[test]
    fn test_schema_declares_credentials() {
        let schema = provider_config_schema();

        let id = schema.attribute(CLIENT_ID).unwrap();
        assert!(id.flags.required);
        assert!(!id.flags.sensitive);

        let secret = schema.attribute(CLIENT_SECRET).unwrap();
        assert!(secret.flags.required);
        assert!(secret.flags.sensitive);
        assert_eq!(schema.block.attributes.len(), 2);
    }

    #[test]
    fn test_from_json_states() {
        let config = ProviderConfig::from_json(&json!({
            "client_id": UNKNOWN_VALUE,
            "client_secret": ""
        }));
        assert!(config.client_id.is_unknown());
        assert!(config.client_secret.is_empty());

        let config =
            ProviderConfig::from_json(&json!({"client_id": "abc", "client_secret": "xyz"}));
        assert_eq!(config.client_id.as_known().map(String::as_str), Some("abc"));
        assert!(config.client_secret.is_known());

        let config = ProviderConfig::from_json(&json!({}));
        assert!(config.client_id.is_empty());
        assert!(config.client_secret.is_empty());

        let config = ProviderConfig::from_json(&Value::Null);
        assert!(config.client_id.is_empty());
    }

    #[test]
    fn test_decode_gate_rejects_what_from_json_cannot_read() {
        let schema = provider_config_schema();

        for raw in [
            json!({"client_id": 7, "client_secret": "xyz"}),
            json!({"client_id": "abc", "client_secret": {}}),
            json!({"client_id": "abc", "client_secret": ["xyz"]}),
        ] {
            assert!(!validate(&schema, &raw).is_empty(), "accepted {}", raw);
        }

        let raw = json!({"client_id": "abc", "client_secret": UNKNOWN_VALUE});
        assert!(validate(&schema, &raw).is_empty());
        let config = ProviderConfig::from_json(&raw);
        assert!(config.client_id.is_known());
        assert!(config.client_secret.is_unknown());
    }

    #[test]
    fn test_into_credentials() {
        let config = ProviderConfig::new(
            ConfigValue::from_string("abc"),
            ConfigValue::from_string("xyz"),
        );
        let credentials = config.into_credentials().unwrap();
        assert_eq!(credentials.client_id(), "abc");
        assert_eq!(credentials.client_secret(), "xyz");

        let config = ProviderConfig::new(ConfigValue::from_string("abc"), ConfigValue::Unknown);
        assert!(matches!(
            config.into_credentials(),
            Err(ProviderError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ProviderConfig::new(
            ConfigValue::from_string("abc"),
            ConfigValue::from_string("s3cr3t-value"),
        );
        assert!(!format!("{:?}", config).contains("s3cr3t-value"));

        let credentials = config.into_credentials().unwrap();
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("abc"));
        assert!(!debug.contains("s3cr3t-value"));
    }
}
