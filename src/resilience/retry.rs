//! Retry policy for requests the provider rejected with HTTP 429.

use std::time::Duration;

use crate::config::{BrawlhallaConfig, DEFAULT_RETRY_DELAY};

/// Retry configuration for rate limited requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Whether swallowed 429s are retried at all.
    pub enabled: bool,
    /// Fixed delay between a 429 and the next attempt.
    pub delay: Duration,
    /// Maximum number of retries; `None` means unbounded.
    pub max_retries: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            delay: DEFAULT_RETRY_DELAY,
            max_retries: None,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables retries.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the delay.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = Some(max);
        self
    }

    /// Creates a configuration with no retries.
    pub fn no_retries() -> Self {
        Self::default()
    }
}

impl From<&BrawlhallaConfig> for RetryConfig {
    fn from(config: &BrawlhallaConfig) -> Self {
        Self {
            enabled: config.retry_on_rate_limit,
            delay: config.retry_delay,
            max_retries: config.max_rate_limit_retries,
        }
    }
}

/// Decides whether and when a rate limited request is attempted again.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Creates a new retry policy.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the delay before retry number `attempt + 1`, or `None` when the
    /// request should not be retried.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if !self.config.enabled {
            return None;
        }

        match self.config.max_retries {
            Some(max) if attempt >= max => None,
            _ => Some(self.config.delay),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}
