//! Resilience layer for the Brawlhalla client.
//!
//! Provides the client-side admission controller that keeps callers inside the
//! provider's burst and sustained quotas, and the retry policy applied to
//! provider 429 responses.

mod admission;
mod clock;
mod retry;

pub use admission::{
    AdmissionController, RateSnapshot, LONG_WINDOW_SECS, LONG_WINDOW_WAIT, SHORT_WINDOW_WAIT,
};
pub use clock::{Clock, TokioClock};
pub use retry::{RetryConfig, RetryPolicy};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Async front end to an [`AdmissionController`] shared by concurrent callers.
///
/// The check and the commit happen under one lock acquisition, so two tasks
/// can never both spend the last token. The lock is released while a caller
/// sleeps.
pub struct RateLimiter {
    controller: Mutex<AdmissionController>,
}

impl RateLimiter {
    /// Creates a rate limiter with both windows full.
    pub fn new(burst_limit: u32, sustained_limit: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            controller: Mutex::new(AdmissionController::new(
                burst_limit,
                sustained_limit,
                clock,
            )),
        }
    }

    /// Waits until a request is admitted and commits one token from each window.
    ///
    /// Returns the total time spent waiting.
    pub async fn acquire(&self) -> Duration {
        let mut waited = Duration::ZERO;

        loop {
            let wait = {
                let mut controller = self.controller.lock().await;
                match controller.try_admit() {
                    Ok(()) => return waited,
                    Err(wait) => wait,
                }
            };

            tracing::debug!(
                wait_ms = wait.as_millis() as u64,
                waited_ms = waited.as_millis() as u64,
                "Admission deferred, waiting for quota"
            );

            tokio::time::sleep(wait).await;
            waited += wait;
        }
    }

    /// Returns true if a request could be admitted right now.
    pub async fn can_proceed(&self) -> bool {
        self.controller.lock().await.can_proceed()
    }

    /// Returns the current token levels.
    pub async fn snapshot(&self) -> RateSnapshot {
        let mut controller = self.controller.lock().await;
        controller.refill();
        controller.snapshot()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_acquire_within_burst_is_immediate() {
        let limiter = RateLimiter::new(10, 180, Arc::new(TokioClock::new()));
        let start = tokio::time::Instant::now();

        for _ in 0..10 {
            assert_eq!(limiter.acquire().await, Duration::ZERO);
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(!limiter.can_proceed().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_past_burst_waits_for_refill() {
        let limiter = RateLimiter::new(10, 180, Arc::new(TokioClock::new()));
        for _ in 0..10 {
            limiter.acquire().await;
        }

        let start = tokio::time::Instant::now();
        let waited = limiter.acquire().await;

        assert_eq!(waited, SHORT_WINDOW_WAIT);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_past_sustained_limit_waits_coarsely() {
        let limiter = RateLimiter::new(10, 2, Arc::new(TokioClock::new()));
        limiter.acquire().await;
        limiter.acquire().await;

        let start = tokio::time::Instant::now();
        limiter.acquire().await;

        // Two per 900s is one token every 450s.
        assert!(start.elapsed() >= Duration::from_secs(450));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_acquires_never_overspend() {
        let limiter = Arc::new(RateLimiter::new(3, 180, Arc::new(TokioClock::new())));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.acquire().await })
            })
            .collect();

        let mut immediate = 0;
        for handle in handles {
            if handle.await.unwrap() == Duration::ZERO {
                immediate += 1;
            }
        }

        assert_eq!(immediate, 3);
        let snapshot = limiter.snapshot().await;
        assert!(snapshot.short_tokens >= 0.0);
    }
}
