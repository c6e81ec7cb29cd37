//! Observability module for the Brawlhalla client.
//!
//! Provides `tracing` subscriber setup, credential redaction for logged URLs,
//! and request outcome metrics.

mod logging;
mod metrics;

pub use logging::{redact_credentials, LogFormat, LogLevel, LoggingConfig};
pub use metrics::{
    DefaultMetricsCollector, MetricsCollector, NoopMetricsCollector, OutcomeKind, RequestMetrics,
};

use std::time::{Duration, Instant};

/// Request timer for measuring dispatch latency.
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
    operation: &'static str,
}

impl RequestTimer {
    /// Starts a timer for `operation`.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Returns the elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}
