//! # Exponential Backoff
//!
//! Delay schedule and retry helper for operations that run before the sync
//! workers exist (e.g. selecting the active BigIP device at startup).
//!
//! Sync cycles themselves are never retried here; a failed cycle simply waits
//! for the next tick or trigger.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff schedule
///
/// Yields `initial, initial * factor, initial * factor^2, ...` capped at `max`,
/// for exactly `retries` delays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExponentialBackoff {
    /// First delay
    pub initial: Duration,
    /// Growth factor between consecutive delays
    pub factor: u32,
    /// Upper bound for a single delay
    pub max: Duration,
    /// Number of retries after the first attempt
    pub retries: u32,
}

impl ExponentialBackoff {
    /// Create a doubling schedule
    #[must_use]
    pub fn new(initial: Duration, max: Duration, retries: u32) -> Self {
        Self {
            initial,
            factor: 2,
            max,
            retries,
        }
    }

    /// Delay before retry number `attempt` (0-indexed)
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let multiplier = self.factor.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial
            .checked_mul(multiplier)
            .map_or(self.max, |delay| delay.min(self.max))
    }

    /// All delays of the schedule, in order
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.retries).map(|attempt| self.delay_for(attempt))
    }
}

/// Run `operation` until it succeeds or the schedule is exhausted
///
/// Returns the first `Ok`, or the error of the last attempt.
pub async fn retry<T, E, F, Fut>(mut operation: F, schedule: &ExponentialBackoff) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut delays = schedule.delays();
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => match delays.next() {
                Some(delay) => {
                    warn!(
                        "Attempt {} failed: {}; retrying in {:?}",
                        attempt, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Err(e),
            },
        }
    }
}
