//! Request pipeline shared by every service.
//!
//! One call goes through admission, URL construction, a bounded dispatch,
//! classification of the response and finally the configured error policy.
//! A swallowed 429 with retries enabled loops back to admission.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::auth::AuthProvider;
use crate::config::BrawlhallaConfig;
use crate::errors::{ApiErrorResponse, BrawlhallaError, BrawlhallaResult};
use crate::observability::{MetricsCollector, OutcomeKind, RequestTimer};
use crate::resilience::{RateLimiter, RetryConfig, RetryPolicy};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::types::response::NormalizedResponse;

const PLACEHOLDER: &str = "{}";

/// A provider endpoint with its positional arguments and optional query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    operation: &'static str,
    template: &'static str,
    args: Vec<String>,
    query: Vec<(&'static str, Option<String>)>,
}

impl Endpoint {
    /// Creates an endpoint from a path template such as `player/{}/stats`.
    pub fn new(operation: &'static str, template: &'static str) -> Self {
        Self {
            operation,
            template,
            args: Vec::new(),
            query: Vec::new(),
        }
    }

    /// Appends the next positional path argument.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Appends a query pair. `None` and empty values are dropped at dispatch.
    pub fn query<V: ToString>(mut self, name: &'static str, value: Option<V>) -> Self {
        self.query.push((name, value.map(|v| v.to_string())));
        self
    }

    /// Returns the operation label used in logs and metrics.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Returns the path template.
    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Substitutes the positional arguments into the template.
    pub fn resolve_path(&self) -> BrawlhallaResult<String> {
        let slots = self.template.matches(PLACEHOLDER).count();
        if slots != self.args.len() {
            return Err(BrawlhallaError::configuration(format!(
                "Endpoint '{}' takes {} argument(s), got {}",
                self.template,
                slots,
                self.args.len()
            )));
        }

        let mut path = String::with_capacity(self.template.len() + 16);
        let mut rest = self.template;
        for arg in &self.args {
            if let Some(index) = rest.find(PLACEHOLDER) {
                path.push_str(&rest[..index]);
                path.push_str(arg);
                rest = &rest[index + PLACEHOLDER.len()..];
            }
        }
        path.push_str(rest);

        Ok(path)
    }

    /// Returns the query pairs that carry a non-empty value, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .iter()
            .filter_map(|(name, value)| match value {
                Some(value) if !value.is_empty() => Some((name.to_string(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Classified result of a single dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// HTTP 200 with a normalized payload.
    Success(NormalizedResponse),
    /// HTTP 429.
    RateLimited {
        /// Message extracted from the body.
        detail: String,
    },
    /// No response arrived within the timeout.
    Timeout,
    /// Any other status.
    Error {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
        /// Message extracted from the body.
        detail: String,
    },
}

impl Outcome {
    fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success(_) => OutcomeKind::Success,
            Outcome::RateLimited { .. } => OutcomeKind::RateLimited,
            Outcome::Timeout => OutcomeKind::Timeout,
            Outcome::Error { .. } => OutcomeKind::UpstreamError,
        }
    }
}

/// Returns the canonical reason phrase for `status`, or `"Unknown"`.
pub fn reason_phrase(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown")
}

/// Classifies a response by status.
///
/// A 200 whose body is not a JSON object or array of objects is an error
/// regardless of policy.
pub fn classify(response: &HttpResponse) -> BrawlhallaResult<Outcome> {
    match response.status {
        200 => Ok(Outcome::Success(NormalizedResponse::from_slice(
            &response.body,
        )?)),
        429 => Ok(Outcome::RateLimited {
            detail: ApiErrorResponse::detail_from_body(&response.body),
        }),
        status => Ok(Outcome::Error {
            status,
            reason: reason_phrase(status).to_string(),
            detail: ApiErrorResponse::detail_from_body(&response.body),
        }),
    }
}

/// Executes endpoints against the provider.
pub struct RequestPipeline {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    rate_limiter: Option<Arc<RateLimiter>>,
    retry: RetryPolicy,
    metrics: Arc<dyn MetricsCollector>,
    timeout: Option<Duration>,
    propagate_errors: bool,
    swallow_rate_limit: bool,
}

impl RequestPipeline {
    /// Creates a pipeline with the policy taken from `config`.
    pub fn new(
        config: &BrawlhallaConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        rate_limiter: Option<Arc<RateLimiter>>,
        metrics: Arc<dyn MetricsCollector>,
    ) -> Self {
        Self {
            transport,
            auth,
            rate_limiter,
            retry: RetryPolicy::new(RetryConfig::from(config)),
            metrics,
            timeout: config.timeout,
            propagate_errors: config.propagate_errors,
            swallow_rate_limit: config.swallow_rate_limit,
        }
    }

    /// Returns the admission limiter, if enabled.
    pub fn rate_limiter(&self) -> Option<&Arc<RateLimiter>> {
        self.rate_limiter.as_ref()
    }

    /// Returns the metrics collector.
    pub fn metrics(&self) -> &Arc<dyn MetricsCollector> {
        &self.metrics
    }

    /// Executes `endpoint` and applies the error policy.
    ///
    /// `Ok(None)` means the failure was swallowed: a timeout, a 429 with
    /// rate limit swallowing on, or another failure with error propagation
    /// off.
    #[instrument(skip(self, endpoint), fields(operation = endpoint.operation, path = endpoint.template))]
    pub async fn execute(&self, endpoint: &Endpoint) -> BrawlhallaResult<Option<NormalizedResponse>> {
        let request = self.build_request(endpoint)?;
        let mut retries = 0u32;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                let waited = limiter.acquire().await;
                self.metrics.record_admission_wait(waited);
            }

            let timer = RequestTimer::start(endpoint.operation);
            let dispatched = self.dispatch(request.clone()).await;
            let kind = match &dispatched {
                Ok(outcome) => outcome.kind(),
                Err(BrawlhallaError::Network { .. }) => OutcomeKind::NetworkError,
                Err(_) => OutcomeKind::UpstreamError,
            };
            self.metrics
                .record_request(timer.operation(), kind, timer.elapsed());

            match dispatched {
                Ok(Outcome::Success(response)) => return Ok(Some(response)),
                Ok(Outcome::Timeout) => {
                    tracing::warn!(timeout = ?self.timeout, "Request timed out");
                    return Ok(None);
                }
                Ok(Outcome::RateLimited { detail }) => {
                    if !self.swallow_rate_limit {
                        return Err(BrawlhallaError::RateLimited { message: detail });
                    }

                    match self.retry.next_delay(retries) {
                        Some(delay) => {
                            tracing::info!(
                                retry = retries + 1,
                                delay_ms = delay.as_millis() as u64,
                                "Rate limited by provider, retrying"
                            );
                            self.metrics.record_retry(endpoint.operation);
                            tokio::time::sleep(delay).await;
                            retries += 1;
                        }
                        None => {
                            tracing::warn!(%detail, "Rate limited by provider");
                            return Ok(None);
                        }
                    }
                }
                Ok(Outcome::Error {
                    status,
                    reason,
                    detail,
                }) => {
                    if self.propagate_errors {
                        return Err(BrawlhallaError::upstream(status, reason, detail));
                    }
                    tracing::warn!(status, %reason, %detail, "Upstream error suppressed");
                    return Ok(None);
                }
                Err(err @ BrawlhallaError::Network { .. }) => {
                    if self.propagate_errors {
                        return Err(err);
                    }
                    tracing::warn!(error = %err, "Network error suppressed");
                    return Ok(None);
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn build_request(&self, endpoint: &Endpoint) -> BrawlhallaResult<HttpRequest> {
        let mut query = endpoint.query_pairs();
        self.auth.apply_auth(&mut query);

        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        Ok(HttpRequest {
            path: endpoint.resolve_path()?,
            query,
            headers,
            timeout: self.timeout,
        })
    }

    async fn dispatch(&self, request: HttpRequest) -> BrawlhallaResult<Outcome> {
        let send = self.transport.send(request);
        let sent = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, send).await {
                Ok(sent) => sent,
                Err(_) => return Ok(Outcome::Timeout),
            },
            None => send.await,
        };

        match sent {
            Ok(response) => classify(&response),
            Err(TransportError::Timeout { .. }) => Ok(Outcome::Timeout),
            Err(TransportError::Connection { message })
            | Err(TransportError::InvalidResponse { message }) => {
                Err(BrawlhallaError::Network { message })
            }
        }
    }
}

impl fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("rate_limiter", &self.rate_limiter.is_some())
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .field("propagate_errors", &self.propagate_errors)
            .field("swallow_rate_limit", &self.swallow_rate_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BrawlhallaConfigBuilder;
    use crate::mocks::{MockAuth, MockResponse, MockTransport};
    use crate::observability::DefaultMetricsCollector;
    use crate::resilience::TokioClock;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Harness {
        pipeline: RequestPipeline,
        transport: Arc<MockTransport>,
        metrics: Arc<DefaultMetricsCollector>,
    }

    fn harness(configure: impl FnOnce(BrawlhallaConfigBuilder) -> BrawlhallaConfigBuilder) -> Harness {
        let config = configure(BrawlhallaConfig::builder().api_key("test-key"))
            .build()
            .unwrap();
        let transport = Arc::new(MockTransport::new());
        let metrics = Arc::new(DefaultMetricsCollector::new());
        let limiter = config.use_internal_limiter.then(|| {
            Arc::new(RateLimiter::new(
                config.burst_limit,
                config.sustained_limit,
                Arc::new(TokioClock::new()),
            ))
        });

        let pipeline = RequestPipeline::new(
            &config,
            transport.clone(),
            Arc::new(MockAuth::new("test-key")),
            limiter,
            metrics.clone(),
        );

        Harness {
            pipeline,
            transport,
            metrics,
        }
    }

    fn stats() -> Endpoint {
        Endpoint::new("players.stats", "player/{}/stats").arg(2)
    }

    #[test]
    fn test_resolve_path() {
        let endpoint = Endpoint::new("rankings.page", "rankings/{}/{}/{}")
            .arg("1v1")
            .arg("eu")
            .arg(1);

        assert_eq!(endpoint.resolve_path().unwrap(), "rankings/1v1/eu/1");
    }

    #[test]
    fn test_resolve_path_argument_mismatch() {
        let endpoint = Endpoint::new("players.stats", "player/{}/stats");
        let err = endpoint.resolve_path().unwrap_err();
        assert!(matches!(err, BrawlhallaError::Configuration { .. }));

        let endpoint = Endpoint::new("clans.get", "clan/{}").arg(1).arg(2);
        assert!(endpoint.resolve_path().is_err());
    }

    #[test]
    fn test_query_pairs_drop_absent_values() {
        let endpoint = Endpoint::new("rankings.page", "rankings/{}/{}/{}")
            .query("name", None::<String>)
            .query("empty", Some(""))
            .query("steamid", Some(76561198000000000u64));

        assert_eq!(
            endpoint.query_pairs(),
            vec![("steamid".to_string(), "76561198000000000".to_string())]
        );
    }

    #[test]
    fn test_classify() {
        let ok = classify(&HttpResponse {
            status: 200,
            body: br#"{"brawlhalla_id":2}"#.to_vec(),
        })
        .unwrap();
        assert!(matches!(ok, Outcome::Success(_)));

        let limited = classify(&HttpResponse {
            status: 429,
            body: Vec::new(),
        })
        .unwrap();
        assert_eq!(
            limited,
            Outcome::RateLimited {
                detail: "No further details.".to_string()
            }
        );

        let error = classify(&HttpResponse {
            status: 503,
            body: br#"{"error":{"message":"maintenance"}}"#.to_vec(),
        })
        .unwrap();
        assert_eq!(
            error,
            Outcome::Error {
                status: 503,
                reason: "Service Unavailable".to_string(),
                detail: "maintenance".to_string(),
            }
        );
    }

    #[test]
    fn test_reason_phrase_unknown() {
        assert_eq!(reason_phrase(404), "Not Found");
        assert_eq!(reason_phrase(599), "Unknown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_record() {
        let h = harness(|b| b);
        h.transport
            .queue_json(&json!({"brawlhalla_id": 2, "name": "bmg | dan"}));

        let response = h.pipeline.execute(&stats()).await.unwrap().unwrap();

        assert_eq!(response.get("brawlhalla_id").and_then(|v| v.as_u64()), Some(2));
        let request = h.transport.last_request().unwrap();
        assert_eq!(request.path, "player/2/stats");
        assert_eq!(
            request.query,
            vec![("api_key".to_string(), "test-key".to_string())]
        );
        assert_eq!(request.headers.get("Accept").map(String::as_str), Some("application/json"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_array_payload_normalizes_to_list() {
        let h = harness(|b| b);
        h.transport
            .queue_json(&json!([{"rank": 1}, {"rank": 2}]));

        let response = h.pipeline.execute(&stats()).await.unwrap().unwrap();

        assert_eq!(response.records().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_swallowed() {
        let h = harness(|b| b);
        h.transport.queue_error(429, "Too many requests");

        let result = h.pipeline.execute(&stats()).await.unwrap();

        assert!(result.is_none());
        assert_eq!(h.transport.request_count(), 1);
        assert_eq!(h.metrics.get_metrics().rate_limited_requests, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_surfaced_when_not_swallowed() {
        let h = harness(|b| b.swallow_rate_limit(false));
        h.transport.queue_error(429, "Too many requests");

        let err = h.pipeline.execute(&stats()).await.unwrap_err();

        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "Rate limit exceeded: Too many requests");
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retried_after_delay() {
        let h = harness(|b| b.retry_on_rate_limit(true).retry_delay(Duration::from_secs(5)));
        h.transport.queue_error(429, "Too many requests");
        h.transport.queue_json(&json!({"clan_id": 1}));

        let start = tokio::time::Instant::now();
        let response = h.pipeline.execute(&stats()).await.unwrap();

        assert!(response.is_some());
        assert!(start.elapsed() >= Duration::from_secs(5));
        assert_eq!(h.transport.request_count(), 2);
        assert_eq!(h.metrics.get_metrics().retries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retry_cap() {
        let h = harness(|b| {
            b.retry_on_rate_limit(true)
                .retry_delay(Duration::from_secs(1))
                .max_rate_limit_retries(2)
        });
        h.transport.set_default(MockResponse::error(429, "Too many requests"));

        let result = h.pipeline.execute(&stats()).await.unwrap();

        assert!(result.is_none());
        assert_eq!(h.transport.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_error_propagated() {
        let h = harness(|b| b);
        h.transport.queue_error(500, "Internal failure");

        let err = h.pipeline.execute(&stats()).await.unwrap_err();

        match err {
            BrawlhallaError::Upstream {
                status,
                reason,
                detail,
            } => {
                assert_eq!(status, 500);
                assert_eq!(reason, "Internal Server Error");
                assert_eq!(detail, "Internal failure");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_error_without_envelope() {
        let h = harness(|b| b);
        h.transport.queue(MockResponse::raw(404, "not json"));

        let err = h.pipeline.execute(&stats()).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Upstream error (HTTP 404 Not Found): No further details."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_upstream_error_suppressed() {
        let h = harness(|b| b.propagate_errors(false));
        h.transport.queue_error(500, "Internal failure");

        assert!(h.pipeline.execute(&stats()).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_always_swallowed() {
        let h = harness(|b| b.timeout(Duration::from_secs(10)).propagate_errors(true));
        h.transport.queue(
            MockResponse::json(&json!({"clan_id": 1})).with_delay(Duration::from_secs(30)),
        );

        let start = tokio::time::Instant::now();
        let result = h.pipeline.execute(&stats()).await.unwrap();

        assert!(result.is_none());
        assert!(start.elapsed() < Duration::from_secs(30));
        assert_eq!(h.metrics.get_metrics().timeouts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_timeout_is_swallowed_even_when_propagating() {
        let h = harness(|b| b.propagate_errors(true));
        h.transport.queue_timeout(Duration::from_secs(10));

        let result = h.pipeline.execute(&stats()).await.unwrap();

        assert!(result.is_none());
        assert_eq!(h.metrics.get_metrics().timeouts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_timeout_waits_for_slow_response() {
        let h = harness(|b| b.no_timeout());
        h.transport.queue(
            MockResponse::json(&json!({"clan_id": 1})).with_delay(Duration::from_secs(30)),
        );

        assert!(h.pipeline.execute(&stats()).await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_error_follows_propagation() {
        let h = harness(|b| b);
        h.transport.queue_connection_failure("connection refused");
        let err = h.pipeline.execute(&stats()).await.unwrap_err();
        assert!(matches!(err, BrawlhallaError::Network { .. }));

        let h = harness(|b| b.propagate_errors(false));
        h.transport.queue_connection_failure("connection refused");
        assert!(h.pipeline.execute(&stats()).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_success_is_always_an_error() {
        let h = harness(|b| b.propagate_errors(false));
        h.transport.queue(MockResponse::raw(200, "42"));

        let err = h.pipeline.execute(&stats()).await.unwrap_err();

        assert!(matches!(err, BrawlhallaError::MalformedResponse { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_defers_request_past_burst() {
        let h = harness(|b| b.burst_limit(10));
        h.transport.set_default(MockResponse::json(&json!({"ok": true})));

        let start = tokio::time::Instant::now();
        for _ in 0..10 {
            h.pipeline.execute(&stats()).await.unwrap();
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        h.pipeline.execute(&stats()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(1));
        assert_eq!(h.metrics.get_metrics().admission_waits, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_disabled_never_waits() {
        let h = harness(|b| b.burst_limit(1).use_internal_limiter(false));
        h.transport.set_default(MockResponse::json(&json!({"ok": true})));

        let start = tokio::time::Instant::now();
        for _ in 0..5 {
            h.pipeline.execute(&stats()).await.unwrap();
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(h.pipeline.rate_limiter().is_none());
    }
}
