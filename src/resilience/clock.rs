//! Monotonic time source for the admission controller.

use std::time::Duration;

/// Monotonic clock abstraction.
///
/// `now` returns the time elapsed since an arbitrary, fixed origin. Readings
/// from a well-behaved clock never decrease, but the admission controller
/// tolerates ones that do.
pub trait Clock: Send + Sync {
    /// Returns the current reading.
    fn now(&self) -> Duration;
}

/// Clock backed by `tokio::time::Instant`.
///
/// Follows tokio's paused test clock, so admission waits can be exercised with
/// `tokio::time::pause` and `advance`.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    /// Creates a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
