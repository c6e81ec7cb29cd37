//! Metrics collection for the Brawlhalla client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Classified result of one dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// HTTP 200 with a normalized payload.
    Success,
    /// HTTP 429.
    RateLimited,
    /// Any other non-200 status.
    UpstreamError,
    /// No response within the timeout.
    Timeout,
    /// Connection or protocol failure.
    NetworkError,
}

impl OutcomeKind {
    /// Returns a stable label for this outcome.
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::Success => "success",
            OutcomeKind::RateLimited => "rate_limited",
            OutcomeKind::UpstreamError => "upstream_error",
            OutcomeKind::Timeout => "timeout",
            OutcomeKind::NetworkError => "network_error",
        }
    }
}

/// Metrics collector interface.
pub trait MetricsCollector: Send + Sync {
    /// Records a dispatched request and how it ended.
    fn record_request(&self, operation: &str, outcome: OutcomeKind, latency: Duration);

    /// Records time spent waiting for admission.
    fn record_admission_wait(&self, waited: Duration);

    /// Records an automatic retry after a 429.
    fn record_retry(&self, operation: &str);

    /// Gets current metrics.
    fn get_metrics(&self) -> RequestMetrics;

    /// Resets all metrics.
    fn reset(&self);
}

/// Request metrics snapshot.
#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    /// Total dispatched requests.
    pub total_requests: u64,
    /// Requests answered with HTTP 200.
    pub successful_requests: u64,
    /// Requests answered with HTTP 429.
    pub rate_limited_requests: u64,
    /// Requests answered with another non-200 status.
    pub upstream_errors: u64,
    /// Requests that timed out.
    pub timeouts: u64,
    /// Requests that failed in transport.
    pub network_errors: u64,
    /// Automatic retries after a 429.
    pub retries: u64,
    /// Requests that had to wait for admission.
    pub admission_waits: u64,
    /// Total time spent waiting for admission, in milliseconds.
    pub admission_wait_ms: u64,
    /// Total dispatch latency in milliseconds.
    pub total_latency_ms: u64,
    /// Requests per operation.
    pub operations: HashMap<String, u64>,
}

impl RequestMetrics {
    /// Calculates average latency in milliseconds.
    pub fn average_latency_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.total_requests as f64
        }
    }

    /// Calculates success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            100.0
        } else {
            (self.successful_requests as f64 / self.total_requests as f64) * 100.0
        }
    }
}

/// Default metrics collector implementation.
#[derive(Default)]
pub struct DefaultMetricsCollector {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    rate_limited_requests: AtomicU64,
    upstream_errors: AtomicU64,
    timeouts: AtomicU64,
    network_errors: AtomicU64,
    retries: AtomicU64,
    admission_waits: AtomicU64,
    admission_wait_ms: AtomicU64,
    total_latency_ms: AtomicU64,
    operations: RwLock<HashMap<String, u64>>,
}

impl DefaultMetricsCollector {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, outcome: OutcomeKind) -> &AtomicU64 {
        match outcome {
            OutcomeKind::Success => &self.successful_requests,
            OutcomeKind::RateLimited => &self.rate_limited_requests,
            OutcomeKind::UpstreamError => &self.upstream_errors,
            OutcomeKind::Timeout => &self.timeouts,
            OutcomeKind::NetworkError => &self.network_errors,
        }
    }
}

impl MetricsCollector for DefaultMetricsCollector {
    fn record_request(&self, operation: &str, outcome: OutcomeKind, latency: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.counter(outcome).fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(latency.as_millis() as u64, Ordering::Relaxed);

        if let Ok(mut ops) = self.operations.write() {
            *ops.entry(operation.to_string()).or_insert(0) += 1;
        }
    }

    fn record_admission_wait(&self, waited: Duration) {
        if waited.is_zero() {
            return;
        }
        self.admission_waits.fetch_add(1, Ordering::Relaxed);
        self.admission_wait_ms
            .fetch_add(waited.as_millis() as u64, Ordering::Relaxed);
    }

    fn record_retry(&self, _operation: &str) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    fn get_metrics(&self) -> RequestMetrics {
        RequestMetrics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            rate_limited_requests: self.rate_limited_requests.load(Ordering::Relaxed),
            upstream_errors: self.upstream_errors.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            network_errors: self.network_errors.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            admission_waits: self.admission_waits.load(Ordering::Relaxed),
            admission_wait_ms: self.admission_wait_ms.load(Ordering::Relaxed),
            total_latency_ms: self.total_latency_ms.load(Ordering::Relaxed),
            operations: self
                .operations
                .read()
                .map(|ops| ops.clone())
                .unwrap_or_default(),
        }
    }

    fn reset(&self) {
        for counter in [
            &self.total_requests,
            &self.successful_requests,
            &self.rate_limited_requests,
            &self.upstream_errors,
            &self.timeouts,
            &self.network_errors,
            &self.retries,
            &self.admission_waits,
            &self.admission_wait_ms,
            &self.total_latency_ms,
        ] {
            counter.store(0, Ordering::Relaxed);
        }

        if let Ok(mut ops) = self.operations.write() {
            ops.clear();
        }
    }
}

impl std::fmt::Debug for DefaultMetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultMetricsCollector")
            .field("total_requests", &self.total_requests.load(Ordering::Relaxed))
            .finish()
    }
}

/// Metrics collector that discards everything.
#[derive(Debug, Default)]
pub struct NoopMetricsCollector;

impl MetricsCollector for NoopMetricsCollector {
    fn record_request(&self, _operation: &str, _outcome: OutcomeKind, _latency: Duration) {}

    fn record_admission_wait(&self, _waited: Duration) {}

    fn record_retry(&self, _operation: &str) {}

    fn get_metrics(&self) -> RequestMetrics {
        RequestMetrics::default()
    }

    fn reset(&self) {}
}
