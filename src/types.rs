//! Convenience types shared by the provider and the gRPC layer.

use serde::{Deserialize, Serialize};

/// Provider metadata returned by GetMetadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// The provider type name used as the prefix of resource type names.
    pub type_name: String,
    /// The provider version tag.
    pub version: String,
    /// List of resource type names.
    pub resources: Vec<String>,
    /// List of data source type names.
    pub data_sources: Vec<String>,
}

/// The protocol version for the handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// The handshake prefix output by the provider.
pub const HANDSHAKE_PREFIX: &str = "TIDAL_PROVIDER";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_constants() {
        assert_eq!(PROTOCOL_VERSION, 1);
        assert_eq!(HANDSHAKE_PREFIX, "TIDAL_PROVIDER");
    }
}
