//! Client side pacing of calls.

use std::sync::Mutex;
use std::time::Duration;

use log::debug;

use crate::time::DateTime;
use crate::Context;

/// RateLimiter lets at most one call through per `interval`.
///
/// The gate is process-local and best-effort: it spaces out calls made
/// through the same limiter and nothing else. The service still enforces its
/// own limits.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<DateTime>>,
}

impl RateLimiter {
    /// Create a limiter allowing one call per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Create a limiter allowing `n` calls per minute.
    ///
    /// `n == 0` is treated as one call per minute.
    pub fn per_minute(n: u32) -> Self {
        Self::new(Duration::from_secs(60) / n.max(1))
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reserve the next slot and return how long the caller has to wait for it.
    ///
    /// Reservations are made under the lock so concurrent callers queue up
    /// one interval apart.
    pub fn reserve(&self, now: DateTime) -> Duration {
        let interval =
            chrono::TimeDelta::from_std(self.interval).unwrap_or(chrono::TimeDelta::zero());

        let mut next = self.next_slot.lock().expect("lock poisoned");
        let slot = match *next {
            Some(t) if t > now => t,
            _ => now,
        };
        *next = Some(slot + interval);

        (slot - now).to_std().unwrap_or_default()
    }

    /// Wait until the next slot using the clock of `ctx`.
    pub async fn acquire(&self, ctx: &Context) {
        let wait = self.reserve(ctx.now());
        if !wait.is_zero() {
            debug!("rate limiter: waiting {wait:?} before next call");
            ctx.sleep(wait).await;
        }
    }
}
