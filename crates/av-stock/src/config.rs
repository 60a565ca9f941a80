//! Configuration for the Alpha Vantage client

use crate::error::{Result, StockError};
use crate::retry::{MAX_ATTEMPTS_CAP, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const ENV_API_KEY: &str = "ALPHA_VANTAGE_API_KEY";
pub const ENV_BASE_URL: &str = "ALPHA_VANTAGE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ALPHA_VANTAGE_TIMEOUT_SECS";
pub const ENV_MAX_ATTEMPTS: &str = "ALPHA_VANTAGE_MAX_ATTEMPTS";
pub const ENV_RATE_LIMIT: &str = "ALPHA_VANTAGE_RATE_LIMIT";

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Configuration for Alpha Vantage access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Alpha Vantage API key
    #[serde(skip_serializing, default)]
    pub api_key: String,

    /// Base URL; requests go to `{base_url}/query`
    pub base_url: String,

    /// Request timeout (none by default)
    pub request_timeout: Option<Duration>,

    /// Attempts per fetch, 1 disables retries
    pub max_attempts: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Upper bound of a single backoff
    pub max_backoff: Duration,

    /// Client-side request budget per minute (unlimited by default)
    pub requests_per_minute: Option<u32>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            max_attempts: 1,
            retry_backoff_base: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            requests_per_minute: None,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(StockError::ConfigError(format!(
                "{ENV_API_KEY} environment variable is required"
            )));
        }

        Url::parse(&self.base_url).map_err(|e| {
            StockError::ConfigError(format!("invalid base URL '{}': {}", self.base_url, e))
        })?;

        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_CAP {
            return Err(StockError::ConfigError(format!(
                "max_attempts must be between 1 and {MAX_ATTEMPTS_CAP}"
            )));
        }

        if self.requests_per_minute == Some(0) {
            return Err(StockError::ConfigError(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(StockError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Retry policy for fetches
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            self.retry_backoff_base,
            self.max_backoff,
            2.0,
        )
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    max_attempts: Option<u32>,
    retry_backoff_base: Option<Duration>,
    max_backoff: Option<Duration>,
    requests_per_minute: Option<u32>,
}

impl StockConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set attempts per fetch
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set the backoff ceiling
    pub fn max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = Some(duration);
        self
    }

    /// Set the client-side rate limit
    pub fn requests_per_minute(mut self, limit: u32) -> Self {
        self.requests_per_minute = Some(limit);
        self
    }

    /// Load settings from the process environment
    pub fn with_env(self) -> Result<Self> {
        self.with_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through `lookup`; unset or empty variables are ignored
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            let secs = parse_number(ENV_TIMEOUT_SECS, &secs)?;
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(attempts) = get(ENV_MAX_ATTEMPTS) {
            self.max_attempts = Some(parse_number(ENV_MAX_ATTEMPTS, &attempts)?);
        }
        if let Some(limit) = get(ENV_RATE_LIMIT) {
            self.requests_per_minute = Some(parse_number(ENV_RATE_LIMIT, &limit)?);
        }

        Ok(self)
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            api_key: self.api_key.unwrap_or(defaults.api_key),
            base_url: self.base_url.unwrap_or(defaults.base_url),
            request_timeout: self.request_timeout.or(defaults.request_timeout),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            retry_backoff_base: self.retry_backoff_base.unwrap_or(defaults.retry_backoff_base),
            max_backoff: self.max_backoff.unwrap_or(defaults.max_backoff),
            requests_per_minute: self.requests_per_minute.or(defaults.requests_per_minute),
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        StockError::ConfigError(format!("{name} must be a non-negative integer (got '{raw}')"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StockConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_attempts, 1);
        assert!(config.request_timeout.is_none());
        assert!(config.requests_per_minute.is_none());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = StockConfig::builder()
            .with_lookup(lookup(&[]))
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, StockError::ConfigError(ref msg) if msg.contains(ENV_API_KEY)));

        let err = StockConfig::builder()
            .with_lookup(lookup(&[(ENV_API_KEY, "  ")]))
            .unwrap()
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn test_env_values() {
        let config = StockConfig::builder()
            .with_lookup(lookup(&[
                (ENV_API_KEY, "demo"),
                (ENV_BASE_URL, "http://localhost:8080"),
                (ENV_TIMEOUT_SECS, "15"),
                (ENV_MAX_ATTEMPTS, "3"),
                (ENV_RATE_LIMIT, "5"),
            ]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.api_key, "demo");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.requests_per_minute, Some(5));
        assert_eq!(config.retry_policy().max_attempts, 3);
    }

    #[test]
    fn test_explicit_settings_after_env_win() {
        let config = StockConfig::builder()
            .with_lookup(lookup(&[(ENV_API_KEY, "demo"), (ENV_MAX_ATTEMPTS, "2")]))
            .unwrap()
            .max_attempts(4)
            .build()
            .unwrap();
        assert_eq!(config.max_attempts, 4);
    }

    #[test]
    fn test_invalid_values() {
        assert!(
            StockConfig::builder()
                .with_lookup(lookup(&[(ENV_API_KEY, "demo"), (ENV_MAX_ATTEMPTS, "many")]))
                .is_err()
        );

        assert!(StockConfig::builder().api_key("demo").max_attempts(0).build().is_err());
        assert!(StockConfig::builder().api_key("demo").max_attempts(11).build().is_err());
        assert!(StockConfig::builder().api_key("demo").base_url("not a url").build().is_err());
        assert!(StockConfig::builder().api_key("demo").requests_per_minute(0).build().is_err());
        assert!(
            StockConfig::builder()
                .api_key("demo")
                .request_timeout(Duration::ZERO)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = StockConfig::builder().api_key("secret").build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
