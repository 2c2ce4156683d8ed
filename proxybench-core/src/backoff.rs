//! Failure backoff for publish workers.
//!
//! A worker that keeps failing can optionally slow itself down with an
//! exponential pause, capped at a maximum and reset on the next success.
//! With a zero base interval the backoff is disabled and the worker retries
//! immediately.

use crate::options::LoadOptions;
use std::time::Duration;

/// Per-worker backoff tracker.
///
/// # Example
///
/// ```rust
/// use proxybench_core::backoff::FailureBackoff;
/// use proxybench_core::options::LoadOptions;
/// use std::time::Duration;
///
/// let options = LoadOptions::default()
///     .with_backoff(Duration::from_millis(100), Duration::from_secs(1));
///
/// let mut backoff = FailureBackoff::new(&options);
///
/// assert_eq!(backoff.on_failure(), Some(Duration::from_millis(100)));
/// assert_eq!(backoff.on_failure(), Some(Duration::from_millis(200)));
/// assert_eq!(backoff.on_failure(), Some(Duration::from_millis(400)));
///
/// backoff.on_success();
/// assert_eq!(backoff.on_failure(), Some(Duration::from_millis(100)));
/// ```
#[derive(Debug, Clone)]
pub struct FailureBackoff {
    base_interval: Duration,
    max_interval: Duration,
    /// Consecutive failures since the last success
    failures: u32,
}

impl FailureBackoff {
    pub const fn new(options: &LoadOptions) -> Self {
        Self {
            base_interval: options.backoff_base,
            max_interval: options.backoff_max,
            failures: 0,
        }
    }

    /// Record a failure and return how long to pause, if at all.
    pub fn on_failure(&mut self) -> Option<Duration> {
        let attempt = self.failures;
        self.failures = self.failures.saturating_add(1);

        if self.base_interval.is_zero() {
            return None;
        }

        let delay = self
            .base_interval
            .checked_mul(1_u32 << attempt.min(10))
            .unwrap_or(self.max_interval);
        Some(delay.min(self.max_interval))
    }

    /// Record a success; the next failure starts from the base interval.
    pub fn on_success(&mut self) {
        self.failures = 0;
    }

    #[inline]
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.base_interval.is_zero()
    }

    /// Consecutive failures since the last success.
    #[inline]
    #[must_use]
    pub const fn failures(&self) -> u32 {
        self.failures
    }
}
