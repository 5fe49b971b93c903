//! Client configuration options.

use std::time::Duration;

use crate::Environment;

/// Configuration for the TrueLayer client.
///
/// # Example
///
/// ```
/// use truelayer_rs::{ClientConfig, Environment};
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_environment(Environment::Sandbox)
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Hosts to talk to
    pub environment: Environment,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Retry configuration
    pub retry: RetryConfig,
    /// Whether access tokens are cached and shared between calls
    pub credentials_caching: bool,
    /// Tokens are refreshed this long before they expire
    pub token_expiry_margin: Duration,
    /// OAuth scopes requested for API calls
    pub scopes: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            timeout: Duration::from_secs(30),
            user_agent: format!(
                "truelayer-rs/{} (Rust)",
                env!("CARGO_PKG_VERSION")
            ),
            retry: RetryConfig::default(),
            credentials_caching: true,
            token_expiry_margin: Duration::from_secs(60),
            scopes: vec!["payments".to_string()],
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable the shared credentials cache.
    pub fn with_credentials_caching(mut self, enabled: bool) -> Self {
        self.credentials_caching = enabled;
        self
    }

    /// Set how long before expiry a cached token stops being used.
    pub fn with_token_expiry_margin(mut self, margin: Duration) -> Self {
        self.token_expiry_margin = margin;
        self
    }

    /// Set the OAuth scopes requested for API calls.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

/// Configuration for automatic retries.
///
/// Retries apply to transport failures that may be transient (timeouts,
/// connection errors) and to the status codes in `retry_statuses`. Every
/// attempt of one call reuses the same idempotency key and signature.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// HTTP status codes to retry on
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the initial backoff duration.
    pub fn with_initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set the maximum backoff duration.
    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Set the status codes that trigger a retry.
    pub fn with_retry_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_statuses = statuses.into();
        self
    }

    /// Calculate the backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_millis = (self.initial_backoff.as_millis() as u64)
            .saturating_mul(2u64.saturating_pow(attempt));
        let max_millis = self.max_backoff.as_millis() as u64;
        Duration::from_millis(backoff_millis.min(max_millis))
    }

    /// Check if a status code should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.credentials_caching);
        assert_eq!(config.token_expiry_margin, Duration::from_secs(60));
        assert_eq!(config.scopes, vec!["payments".to_string()]);
        assert!(config.environment.is_live());
        assert!(config.user_agent.starts_with("truelayer-rs/"));
    }

    #[test]
    fn test_config_setters() {
        let config = ClientConfig::new()
            .with_environment(Environment::Sandbox)
            .with_credentials_caching(false)
            .with_scopes(["payments", "paydirect"]);
        assert!(config.environment.is_sandbox());
        assert!(!config.credentials_caching);
        assert_eq!(config.scopes.len(), 2);
    }

    #[test]
    fn test_retry_backoff() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_for_attempt(0), Duration::from_millis(500));
        assert_eq!(config.backoff_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_retry_backoff_max() {
        let config = RetryConfig::default()
            .with_initial_backoff(Duration::from_secs(10))
            .with_max_backoff(Duration::from_secs(30));

        // 10 * 2^3 = 80, but capped at 30
        assert_eq!(config.backoff_for_attempt(3), Duration::from_secs(30));
        assert_eq!(config.backoff_for_attempt(70), Duration::from_secs(30));
    }

    #[test]
    fn test_should_retry_status() {
        let config = RetryConfig::default();
        assert!(config.should_retry_status(429));
        assert!(config.should_retry_status(503));
        assert!(!config.should_retry_status(404));
        assert!(!config.should_retry_status(401));
    }
}
