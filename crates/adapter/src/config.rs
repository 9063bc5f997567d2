//! Adapter tuning: timeouts, read retries, confirmation polling

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration shared by [`crate::ReadAdapter`] and [`crate::WriteAdapter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Bound on a single RPC round trip (seconds)
    /// Default: 20
    pub rpc_timeout_secs: u64,

    /// Extra attempts for a read that failed on the network, 0 or 1
    /// Writes are never retried
    /// Default: 1
    pub read_retries: u8,

    /// Bound on waiting for a transaction to be included (seconds)
    /// Default: 120
    pub confirmation_timeout_secs: u64,

    /// Delay between receipt polls (milliseconds)
    /// Default: 1000
    pub poll_interval_ms: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            rpc_timeout_secs: 20,
            read_retries: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 1000,
        }
    }
}

impl AdapterConfig {
    /// Validate configuration
    ///
    /// Returns `Ok(())` if valid, otherwise returns error message
    pub fn validate(&self) -> Result<(), String> {
        if self.rpc_timeout_secs == 0 {
            return Err("rpc_timeout_secs must be > 0".to_string());
        }

        if self.rpc_timeout_secs > 300 {
            return Err("rpc_timeout_secs too large (max 300)".to_string());
        }

        if self.read_retries > 1 {
            return Err("read_retries must be 0 or 1".to_string());
        }

        if self.confirmation_timeout_secs == 0 {
            return Err("confirmation_timeout_secs must be > 0".to_string());
        }

        if self.confirmation_timeout_secs > 3600 {
            return Err("confirmation_timeout_secs too large (max 1 hour)".to_string());
        }

        if self.poll_interval_ms < 10 {
            return Err("poll_interval_ms must be >= 10".to_string());
        }

        if self.poll_interval_ms > 60_000 {
            return Err("poll_interval_ms too large (max 60000)".to_string());
        }

        Ok(())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AdapterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rpc_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_rpc_timeout_bounds() {
        let mut config = AdapterConfig::default();

        config.rpc_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.rpc_timeout_secs = 30;
        assert!(config.validate().is_ok());

        config.rpc_timeout_secs = 301;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_read_retries_capped_at_one() {
        let mut config = AdapterConfig::default();

        config.read_retries = 0;
        assert!(config.validate().is_ok());

        config.read_retries = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_bounds() {
        let mut config = AdapterConfig::default();

        config.poll_interval_ms = 5;
        assert!(config.validate().is_err());

        config.poll_interval_ms = 60_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AdapterConfig = toml::from_str("rpc_timeout_secs = 10").unwrap();
        assert_eq!(config.rpc_timeout_secs, 10);
        assert_eq!(config.read_retries, 1);
        assert_eq!(config.confirmation_timeout_secs, 120);
    }
}
