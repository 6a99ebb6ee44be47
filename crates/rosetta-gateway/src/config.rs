use rosetta_core::NetworkIdentifier;

/// Configuration for a Rosetta endpoint connection
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the Rosetta service, without a trailing slash
    pub endpoint: String,
    /// Network identifier attached to every request
    pub network: NetworkIdentifier,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Creates a configuration for the given endpoint and network
    pub fn new(endpoint: impl Into<String>, network: NetworkIdentifier) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            endpoint,
            network,
            timeout_secs: 30,
        }
    }

    /// Sets the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new("http://localhost:8082", NetworkIdentifier::testnet())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        let config = GatewayConfig::new("https://rosetta.example.com/", NetworkIdentifier::mainnet());
        assert_eq!(config.endpoint, "https://rosetta.example.com");
    }

    #[test]
    fn test_with_timeout() {
        let config = GatewayConfig::default().with_timeout(60);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.network, NetworkIdentifier::testnet());
    }
}
