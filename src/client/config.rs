//! Client configuration

use std::time::Duration;

/// Upper bound on every client call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an A2A client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the agent
    pub agent_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Enable request/response validation
    pub validate_responses: bool,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            timeout: DEFAULT_TIMEOUT,
            validate_responses: true,
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable validation
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_responses = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("http://localhost:8001");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate_responses);

        let config = config
            .with_timeout(Duration::from_secs(2))
            .with_validation(false);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert!(!config.validate_responses);
    }
}
