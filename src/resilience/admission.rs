//! Dual-window token bucket gating request dispatch.
//!
//! The short window models the per-second burst allowance and the long window
//! the per-15-minute sustained allowance. Elapsed time is credited only in
//! whole seconds; the sub-second remainder carries over to the next refill.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::clock::Clock;

/// Length of the sustained window, in seconds.
pub const LONG_WINDOW_SECS: f64 = 900.0;

/// Wait reported when the sustained window is exhausted.
pub const LONG_WINDOW_WAIT: Duration = Duration::from_secs(5);

/// Wait reported when only the burst window is exhausted.
pub const SHORT_WINDOW_WAIT: Duration = Duration::from_secs(1);

/// Point-in-time view of both token counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSnapshot {
    /// Tokens left in the burst window.
    pub short_tokens: f64,
    /// Burst window capacity.
    pub short_capacity: f64,
    /// Tokens left in the sustained window.
    pub long_tokens: f64,
    /// Sustained window capacity.
    pub long_capacity: f64,
}

/// Admission decision state for one client.
///
/// Invariant: `0 <= short_tokens <= short_capacity` and
/// `0 <= long_tokens <= long_capacity`.
pub struct AdmissionController {
    short_capacity: f64,
    short_tokens: f64,
    short_rate: f64,
    long_capacity: f64,
    long_tokens: f64,
    long_rate: f64,
    last_refill: Duration,
    carry: Duration,
    clock: Arc<dyn Clock>,
}

impl AdmissionController {
    /// Creates a controller with both windows full.
    ///
    /// `burst_limit` is requests per second, `sustained_limit` requests per
    /// 15 minutes.
    pub fn new(burst_limit: u32, sustained_limit: u32, clock: Arc<dyn Clock>) -> Self {
        let short_capacity = f64::from(burst_limit);
        let long_capacity = f64::from(sustained_limit);

        Self {
            short_capacity,
            short_tokens: short_capacity,
            short_rate: short_capacity,
            long_capacity,
            long_tokens: long_capacity,
            long_rate: long_capacity / LONG_WINDOW_SECS,
            last_refill: clock.now(),
            carry: Duration::ZERO,
            clock,
        }
    }

    /// Credits whole elapsed seconds to both windows.
    ///
    /// A clock reading earlier than the last one counts as zero elapsed time
    /// and does not move the reference point backwards.
    pub fn refill(&mut self) {
        let now = self.clock.now();
        let elapsed = now.checked_sub(self.last_refill).unwrap_or(Duration::ZERO);
        if now > self.last_refill {
            self.last_refill = now;
        }

        self.carry += elapsed;
        let whole_secs = self.carry.as_secs();
        if whole_secs == 0 {
            return;
        }

        self.carry -= Duration::from_secs(whole_secs);
        let whole_secs = whole_secs as f64;

        self.short_tokens = (self.short_tokens + whole_secs * self.short_rate)
            .clamp(0.0, self.short_capacity);
        self.long_tokens =
            (self.long_tokens + whole_secs * self.long_rate).clamp(0.0, self.long_capacity);
    }

    /// Returns true if both windows hold at least one token.
    pub fn can_proceed(&mut self) -> bool {
        self.refill();
        self.has_tokens()
    }

    /// Returns how long to sleep before checking again.
    ///
    /// Zero when a request may go now. The estimate is deliberately coarse:
    /// callers must re-check after sleeping.
    pub fn next_wait(&mut self) -> Duration {
        if self.can_proceed() {
            Duration::ZERO
        } else {
            self.shortfall_wait()
        }
    }

    /// Consumes one token from each window.
    ///
    /// Returns false and leaves the counters untouched if either window is
    /// below one token.
    pub fn commit(&mut self) -> bool {
        if !self.has_tokens() {
            return false;
        }

        self.short_tokens -= 1.0;
        self.long_tokens -= 1.0;
        true
    }

    /// Admits and commits in one step, or reports the wait.
    pub fn try_admit(&mut self) -> Result<(), Duration> {
        if self.can_proceed() && self.commit() {
            Ok(())
        } else {
            Err(self.shortfall_wait())
        }
    }

    /// Returns the current counter levels without refilling.
    pub fn snapshot(&self) -> RateSnapshot {
        RateSnapshot {
            short_tokens: self.short_tokens,
            short_capacity: self.short_capacity,
            long_tokens: self.long_tokens,
            long_capacity: self.long_capacity,
        }
    }

    fn has_tokens(&self) -> bool {
        self.short_tokens >= 1.0 && self.long_tokens >= 1.0
    }

    fn shortfall_wait(&self) -> Duration {
        if self.long_tokens < 1.0 {
            LONG_WINDOW_WAIT
        } else if self.short_tokens < 1.0 {
            SHORT_WINDOW_WAIT
        } else {
            Duration::ZERO
        }
    }
}

impl fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdmissionController")
            .field("short_tokens", &self.short_tokens)
            .field("short_capacity", &self.short_capacity)
            .field("long_tokens", &self.long_tokens)
            .field("long_capacity", &self.long_capacity)
            .field("carry", &self.carry)
            .finish()
    }
}
