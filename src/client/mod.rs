//! Brawlhalla API client.
//!
//! Provides the main client interface for interacting with the Brawlhalla API.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{BrawlhallaConfig, BrawlhallaConfigBuilder};
use crate::errors::{BrawlhallaError, BrawlhallaResult};
use crate::observability::{DefaultMetricsCollector, MetricsCollector, RequestMetrics};
use crate::pipeline::RequestPipeline;
use crate::resilience::{Clock, RateLimiter, RateSnapshot, TokioClock};
use crate::services::{ClansService, LegendsService, PlayersService, RankingsService};
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main Brawlhalla client.
///
/// Every operation shares one admission limiter, so concurrent callers
/// together stay inside the provider's quota.
///
/// # Example
///
/// ```rust,no_run
/// use brawlhalla_client::BrawlhallaClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = BrawlhallaClient::builder()
///         .api_key("your_api_key")
///         .build()?;
///
///     if let Some(player) = client.players().stats(2).await? {
///         println!("{:?}", player.get("name"));
///     }
///     Ok(())
/// }
/// ```
pub struct BrawlhallaClient {
    config: BrawlhallaConfig,
    pipeline: Arc<RequestPipeline>,
    players_service: PlayersService,
    rankings_service: RankingsService,
    clans_service: ClansService,
    legends_service: LegendsService,
}

impl BrawlhallaClient {
    /// Creates a new client builder.
    pub fn builder() -> BrawlhallaClientBuilder {
        BrawlhallaClientBuilder::new()
    }

    /// Creates a client from an API key with default settings.
    pub fn from_api_key(api_key: impl Into<String>) -> BrawlhallaResult<Self> {
        BrawlhallaClientBuilder::new().api_key(api_key).build()
    }

    /// Returns the players service.
    pub fn players(&self) -> &PlayersService {
        &self.players_service
    }

    /// Returns the rankings service.
    pub fn rankings(&self) -> &RankingsService {
        &self.rankings_service
    }

    /// Returns the clans service.
    pub fn clans(&self) -> &ClansService {
        &self.clans_service
    }

    /// Returns the legends service.
    pub fn legends(&self) -> &LegendsService {
        &self.legends_service
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BrawlhallaConfig {
        &self.config
    }

    /// Returns a snapshot of request metrics.
    pub fn metrics(&self) -> RequestMetrics {
        self.pipeline.metrics().get_metrics()
    }

    /// Returns current token levels, or `None` when the internal limiter is off.
    pub async fn rate_limit_snapshot(&self) -> Option<RateSnapshot> {
        match self.pipeline.rate_limiter() {
            Some(limiter) => Some(limiter.snapshot().await),
            None => None,
        }
    }
}

impl std::fmt::Debug for BrawlhallaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrawlhallaClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Brawlhalla client.
pub struct BrawlhallaClientBuilder {
    config_builder: BrawlhallaConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    metrics: Option<Arc<dyn MetricsCollector>>,
    clock: Option<Arc<dyn Clock>>,
}

impl BrawlhallaClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: BrawlhallaConfigBuilder::new(),
            transport: None,
            auth: None,
            metrics: None,
            clock: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: BrawlhallaConfig) -> Self {
        let mut config_builder = BrawlhallaConfigBuilder::new()
            .api_key(config.api_key())
            .base_url(&config.base_url)
            .burst_limit(config.burst_limit)
            .sustained_limit(config.sustained_limit)
            .use_internal_limiter(config.use_internal_limiter)
            .propagate_errors(config.propagate_errors)
            .swallow_rate_limit(config.swallow_rate_limit)
            .retry_on_rate_limit(config.retry_on_rate_limit)
            .retry_delay(config.retry_delay);

        config_builder = match config.timeout {
            Some(timeout) => config_builder.timeout(timeout),
            None => config_builder.no_timeout(),
        };
        if let Some(max) = config.max_rate_limit_retries {
            config_builder = config_builder.max_rate_limit_retries(max);
        }

        Self {
            config_builder,
            ..Self::new()
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the requests allowed per second.
    pub fn burst_limit(mut self, limit: u32) -> Self {
        self.config_builder = self.config_builder.burst_limit(limit);
        self
    }

    /// Sets the requests allowed per 15 minutes.
    pub fn sustained_limit(mut self, limit: u32) -> Self {
        self.config_builder = self.config_builder.sustained_limit(limit);
        self
    }

    /// Enables or disables client-side admission control.
    pub fn use_internal_limiter(mut self, enabled: bool) -> Self {
        self.config_builder = self.config_builder.use_internal_limiter(enabled);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config_builder = self.config_builder.timeout_secs(secs);
        self
    }

    /// Waits indefinitely for responses.
    pub fn no_timeout(mut self) -> Self {
        self.config_builder = self.config_builder.no_timeout();
        self
    }

    /// Surfaces non-429 failures as errors instead of `Ok(None)`.
    pub fn propagate_errors(mut self, propagate: bool) -> Self {
        self.config_builder = self.config_builder.propagate_errors(propagate);
        self
    }

    /// Turns provider 429s into `Ok(None)` or a retry.
    pub fn swallow_rate_limit(mut self, swallow: bool) -> Self {
        self.config_builder = self.config_builder.swallow_rate_limit(swallow);
        self
    }

    /// Retries swallowed 429s.
    pub fn retry_on_rate_limit(mut self, retry: bool) -> Self {
        self.config_builder = self.config_builder.retry_on_rate_limit(retry);
        self
    }

    /// Sets the delay before a 429 is retried.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config_builder = self.config_builder.retry_delay(delay);
        self
    }

    /// Caps automatic 429 retries.
    pub fn max_rate_limit_retries(mut self, max: u32) -> Self {
        self.config_builder = self.config_builder.max_rate_limit_retries(max);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets a custom metrics collector.
    pub fn metrics(mut self, metrics: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Sets the clock driving the admission limiter.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the client.
    pub fn build(self) -> BrawlhallaResult<BrawlhallaClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransportImpl::new(&config.base_url).map_err(|e| {
                BrawlhallaError::Configuration {
                    message: e.to_string(),
                }
            })?),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ApiKeyAuth::new(config.api_key.clone())),
        };
        auth.validate()?;

        let metrics: Arc<dyn MetricsCollector> = self
            .metrics
            .unwrap_or_else(|| Arc::new(DefaultMetricsCollector::new()));

        let rate_limiter = if config.use_internal_limiter {
            let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(TokioClock::new()));
            Some(Arc::new(RateLimiter::new(
                config.burst_limit,
                config.sustained_limit,
                clock,
            )))
        } else {
            None
        };

        let pipeline = Arc::new(RequestPipeline::new(
            &config,
            transport,
            auth,
            rate_limiter,
            metrics,
        ));

        tracing::debug!(
            base_url = %config.base_url,
            limiter = config.use_internal_limiter,
            "Brawlhalla client created"
        );

        Ok(BrawlhallaClient {
            players_service: PlayersService::new(Arc::clone(&pipeline)),
            rankings_service: RankingsService::new(Arc::clone(&pipeline)),
            clans_service: ClansService::new(Arc::clone(&pipeline)),
            legends_service: LegendsService::new(Arc::clone(&pipeline)),
            pipeline,
            config,
        })
    }
}

impl Default for BrawlhallaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
