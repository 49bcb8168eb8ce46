//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transport::RetryPolicy;
use crate::SdkError;

/// Default RPC endpoint
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Connection settings for [`KokkaClient`](crate::KokkaClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: String,
    /// Per-request HTTP timeout, in (possibly fractional) seconds on disk
    #[serde(with = "seconds")]
    pub timeout: Duration,
    /// Retry settings
    pub retry: RetryConfig,
}

/// Serializable retry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Fixed delay between attempts in milliseconds
    pub delay_ms: u64,
    /// HTTP statuses worth another attempt
    pub retryable_statuses: Vec<u16>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
            retryable_statuses: vec![500, 502, 503, 504],
        }
    }
}

impl ClientConfig {
    /// Create with the given endpoint and default settings
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self::default().with_rpc_url(rpc_url)
    }

    /// Set the endpoint
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Set the per-request timeout. Sub-second precision is kept.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry settings
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry policy derived from [`RetryConfig`]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.retry)
    }

    /// Reject settings that cannot produce a working client
    pub fn validate(&self) -> Result<(), SdkError> {
        let url = self.rpc_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SdkError::Configuration(format!(
                "rpc_url must be an http(s) URL, got {:?}",
                self.rpc_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(SdkError::Configuration("timeout must be positive".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(SdkError::Configuration(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// Whole seconds serialize as integers, anything finer as a float
mod seconds {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        if value.subsec_nanos() == 0 {
            serializer.serialize_u64(value.as_secs())
        } else {
            serializer.serialize_f64(value.as_secs_f64())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.delay_ms, 1000);
        assert_eq!(config.retry.retryable_statuses, vec![500, 502, 503, 504]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("https://rpc.example.org")
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryConfig {
                max_attempts: 5,
                delay_ms: 10,
                retryable_statuses: vec![503],
            });

        assert_eq!(config.rpc_url, "https://rpc.example.org");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.delay, Duration::from_millis(10));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"rpc_url":"http://node:8545","retry":{"max_attempts":1}}"#)
                .unwrap();
        assert_eq!(config.rpc_url, "http://node:8545");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry.delay_ms, 1000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            ClientConfig::new("ftp://node").validate(),
            Err(SdkError::Configuration(_))
        ));
        assert!(ClientConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());

        let mut config = ClientConfig::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sub_second_timeout_kept() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert!(config.validate().is_ok());

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout"], serde_json::json!(0.5));
        let back: ClientConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_whole_second_timeout_stays_integer() {
        let json = serde_json::to_value(ClientConfig::default()).unwrap();
        assert_eq!(json["timeout"], serde_json::json!(30));
        let config: ClientConfig = serde_json::from_str(r#"{"timeout":10}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(serde_json::from_str::<ClientConfig>(r#"{"timeout":-1}"#).is_err());
    }
}
