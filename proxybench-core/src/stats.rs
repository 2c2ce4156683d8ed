//! Publish counters.
//!
//! Workers share one [`PublishStats`] and bump relaxed atomics after every
//! attempt. A [`PublishSummary`] is a point-in-time copy used for periodic
//! reports and the final result.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// How a single request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 2xx response
    Accepted,
    /// Any other response status
    Rejected(u16),
    /// No response at all
    Failed,
}

impl Outcome {
    /// Classify a response status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        if status >= 200 && status < 300 {
            Self::Accepted
        } else {
            Self::Rejected(status)
        }
    }

    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Shared publish counters.
#[derive(Debug, Default)]
pub struct PublishStats {
    attempts: AtomicU64,
    accepted: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    active_workers: AtomicUsize,
}

impl PublishStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an attempt before it is sent.
    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Accepted => &self.accepted,
            Outcome::Rejected(_) => &self.rejected,
            Outcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn worker_started(&self) {
        self.active_workers.fetch_add(1, Ordering::AcqRel);
    }

    pub fn worker_stopped(&self) {
        self.active_workers.fetch_sub(1, Ordering::AcqRel);
    }

    /// Workers currently inside their publish loop.
    #[must_use]
    pub fn active_workers(&self) -> usize {
        self.active_workers.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn snapshot(&self, elapsed: Duration) -> PublishSummary {
        PublishSummary {
            attempts: self.attempts.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            active_workers: self.active_workers(),
            elapsed,
        }
    }
}

/// Point-in-time copy of [`PublishStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishSummary {
    pub attempts: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub failed: u64,
    pub active_workers: usize,
    pub elapsed: Duration,
}

impl PublishSummary {
    /// Completed requests (any outcome) per second.
    #[must_use]
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            (self.accepted + self.rejected + self.failed) as f64 / secs
        }
    }
}

impl fmt::Display for PublishSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempts, {} accepted, {} rejected, {} failed in {:.1}s ({:.1} req/s, {} workers)",
            self.attempts,
            self.accepted,
            self.rejected,
            self.failed,
            self.elapsed.as_secs_f64(),
            self.throughput(),
            self.active_workers,
        )
    }
}
