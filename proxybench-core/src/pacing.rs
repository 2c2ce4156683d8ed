//! Pacing: `Pacer`
//!
//! Request-rate control for publish workers.
//!
//! Design principle:
//! - Pacing is global: the limit applies to the sum of all workers
//! - Workers ask before every request and never hold a permit across it
//! - Pluggable: `NoOp` (default) → fixed interval
//!
//! Usage:
//! ```rust,ignore
//! pacer.ready().await;
//! transport.send(request).await;
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, Interval, MissedTickBehavior};

/// Rate control trait.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait until one more request may be sent.
    async fn ready(&self);
}

/// No-op implementation.
///
/// Always lets the request through.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPacer;

#[async_trait]
impl Pacer for NoOpPacer {
    async fn ready(&self) {}
}

/// Fixed-interval pacer shared by every worker.
///
/// Ticks are handed out one at a time, so `n` workers together never exceed
/// `rps` requests per second. Missed ticks are not burst back.
#[derive(Debug)]
pub struct IntervalPacer {
    ticker: Mutex<Interval>,
    period: Duration,
}

impl IntervalPacer {
    /// Pacer releasing `rps` requests per second (`rps` of zero is treated as one).
    ///
    /// Rates above one per nanosecond are paced at one per nanosecond.
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn per_second(rps: u32) -> Self {
        let period = (Duration::from_secs(1) / rps.max(1)).max(Duration::from_nanos(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            ticker: Mutex::new(ticker),
            period,
        }
    }

    /// Time between two released requests.
    #[inline]
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn ready(&self) {
        self.ticker.lock().await.tick().await;
    }
}

/// Build the pacer matching an optional rate limit.
#[must_use]
pub fn for_rate(max_rps: Option<u32>) -> Arc<dyn Pacer> {
    match max_rps {
        Some(rps) => Arc::new(IntervalPacer::per_second(rps)),
        None => Arc::new(NoOpPacer),
    }
}
