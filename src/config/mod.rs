//! Configuration module for the Brawlhalla client.
//!
//! Holds the API key, base URL, request timeout, the two admission limits and
//! the policy switches that decide how rate limits and upstream errors reach
//! the caller.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

use crate::errors::{BrawlhallaError, BrawlhallaResult};

/// Default base URL for the Brawlhalla API.
pub const DEFAULT_BASE_URL: &str = "https://api.brawlhalla.com";

/// Default request timeout (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default burst allowance, in requests per second.
pub const DEFAULT_BURST_LIMIT: u32 = 10;

/// Default sustained allowance, in requests per 15 minutes.
pub const DEFAULT_SUSTAINED_LIMIT: u32 = 180;

/// Default delay before a rate limited request is retried.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Configuration for the Brawlhalla client.
#[derive(Clone)]
pub struct BrawlhallaConfig {
    /// API key for authentication (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests.
    pub base_url: String,
    /// Requests allowed per second.
    pub burst_limit: u32,
    /// Requests allowed per 15 minutes.
    pub sustained_limit: u32,
    /// Whether the client waits for admission before each request.
    pub use_internal_limiter: bool,
    /// Request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Surface non-429 upstream errors as `Err` instead of `Ok(None)`.
    pub propagate_errors: bool,
    /// Turn provider 429s into `Ok(None)` (or a retry) instead of `Err`.
    pub swallow_rate_limit: bool,
    /// Retry swallowed 429s after [`BrawlhallaConfig::retry_delay`].
    pub retry_on_rate_limit: bool,
    /// Delay before a rate limited request is retried.
    pub retry_delay: Duration,
    /// Upper bound on automatic 429 retries; `None` retries without limit.
    pub max_rate_limit_retries: Option<u32>,
}

impl BrawlhallaConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> BrawlhallaConfigBuilder {
        BrawlhallaConfigBuilder::new()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        crate::auth::key_hint(self.api_key.expose_secret())
    }
}

impl std::fmt::Debug for BrawlhallaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrawlhallaConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("burst_limit", &self.burst_limit)
            .field("sustained_limit", &self.sustained_limit)
            .field("use_internal_limiter", &self.use_internal_limiter)
            .field("timeout", &self.timeout)
            .field("propagate_errors", &self.propagate_errors)
            .field("swallow_rate_limit", &self.swallow_rate_limit)
            .field("retry_on_rate_limit", &self.retry_on_rate_limit)
            .field("retry_delay", &self.retry_delay)
            .field("max_rate_limit_retries", &self.max_rate_limit_retries)
            .finish()
    }
}

/// Builder for `BrawlhallaConfig`.
#[derive(Default)]
pub struct BrawlhallaConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    burst_limit: Option<u32>,
    sustained_limit: Option<u32>,
    use_internal_limiter: Option<bool>,
    timeout: Option<Option<Duration>>,
    propagate_errors: Option<bool>,
    swallow_rate_limit: Option<bool>,
    retry_on_rate_limit: Option<bool>,
    retry_delay: Option<Duration>,
    max_rate_limit_retries: Option<u32>,
}

impl BrawlhallaConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the number of requests allowed per second.
    pub fn burst_limit(mut self, limit: u32) -> Self {
        self.burst_limit = Some(limit);
        self
    }

    /// Sets the number of requests allowed per 15 minutes.
    pub fn sustained_limit(mut self, limit: u32) -> Self {
        self.sustained_limit = Some(limit);
        self
    }

    /// Enables or disables the internal admission controller.
    pub fn use_internal_limiter(mut self, enabled: bool) -> Self {
        self.use_internal_limiter = Some(enabled);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(Some(timeout));
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Some(Duration::from_secs(secs)));
        self
    }

    /// Waits for responses indefinitely.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = Some(None);
        self
    }

    /// Sets whether upstream errors are returned as `Err`.
    pub fn propagate_errors(mut self, propagate: bool) -> Self {
        self.propagate_errors = Some(propagate);
        self
    }

    /// Sets whether provider 429s are swallowed.
    pub fn swallow_rate_limit(mut self, swallow: bool) -> Self {
        self.swallow_rate_limit = Some(swallow);
        self
    }

    /// Sets whether swallowed 429s are retried.
    pub fn retry_on_rate_limit(mut self, retry: bool) -> Self {
        self.retry_on_rate_limit = Some(retry);
        self
    }

    /// Sets the delay before retrying a rate limited request.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Caps the number of automatic 429 retries.
    pub fn max_rate_limit_retries(mut self, max: u32) -> Self {
        self.max_rate_limit_retries = Some(max);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> BrawlhallaResult<BrawlhallaConfig> {
        let api_key = self
            .api_key
            .ok_or_else(|| BrawlhallaError::configuration("API key is required"))?;

        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(BrawlhallaError::configuration("API key cannot be empty"));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        validate_base_url(&base_url)?;

        let burst_limit = self.burst_limit.unwrap_or(DEFAULT_BURST_LIMIT);
        let sustained_limit = self.sustained_limit.unwrap_or(DEFAULT_SUSTAINED_LIMIT);
        if burst_limit == 0 || sustained_limit == 0 {
            return Err(BrawlhallaError::configuration(
                "Rate limits must be greater than zero",
            ));
        }

        Ok(BrawlhallaConfig {
            api_key: SecretString::new(api_key),
            base_url,
            burst_limit,
            sustained_limit,
            use_internal_limiter: self.use_internal_limiter.unwrap_or(true),
            timeout: self.timeout.unwrap_or(Some(DEFAULT_TIMEOUT)),
            propagate_errors: self.propagate_errors.unwrap_or(true),
            swallow_rate_limit: self.swallow_rate_limit.unwrap_or(true),
            retry_on_rate_limit: self.retry_on_rate_limit.unwrap_or(false),
            retry_delay: self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY),
            max_rate_limit_retries: self.max_rate_limit_retries,
        })
    }
}

/// HTTPS is required, except for loopback hosts used by local test servers.
fn validate_base_url(base_url: &str) -> BrawlhallaResult<()> {
    let url = Url::parse(base_url)?;
    match url.scheme() {
        "https" => Ok(()),
        "http" if matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]")) => Ok(()),
        _ => Err(BrawlhallaError::configuration("Base URL must use HTTPS")),
    }
}
