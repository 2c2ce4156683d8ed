//! Load generator configuration
//!
//! Every knob of a run lives in [`LoadOptions`], which is built once at
//! startup and handed to the runners. Nothing is read from globals.

use crate::endpoint::ProxyEndpoint;
use crate::error::{ProxyBenchError, Result};
use crate::payload::PLACEHOLDER_KEY;
use crate::range::ListenerRange;
use std::fmt;
use std::time::Duration;

/// Default first listener index.
pub const DEFAULT_BASE_HASH: u64 = 0;

/// Default number of listeners in the range.
pub const DEFAULT_LISTENERS: u64 = 8000;

/// Default number of publish workers.
pub const DEFAULT_WORKERS: usize = 240;

/// Default proxy URL for both sides.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8000/";

/// Every `DEFAULT_KEY_STRIDE`-th index unsubscribes with the real device key.
pub const DEFAULT_KEY_STRIDE: u64 = 100;

/// Highest publish rate the pacer can express (one request per nanosecond).
pub const MAX_RPS: u32 = 1_000_000_000;

/// What a sweep does when a request fails at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the failing index and report the error.
    #[default]
    Abort,
    /// Log the failure and move on to the next index.
    Continue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Continue => f.write_str("continue"),
        }
    }
}

/// Load generator options.
///
/// # Examples
///
/// ```
/// use proxybench_core::options::{FailurePolicy, LoadOptions};
/// use std::time::Duration;
///
/// let opts = LoadOptions::default()
///     .with_listeners(300)
///     .with_failure_policy(FailurePolicy::Continue)
///     .with_request_timeout(Duration::from_secs(2));
///
/// assert!(opts.validate().is_ok());
/// assert_eq!(opts.range().len(), 300);
/// ```
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// First listener index of the range
    pub base_hash: u64,

    /// Number of listeners; the range is `[base_hash, base_hash + listeners)`
    pub listeners: u64,

    /// Publish worker count
    pub workers: usize,

    /// Proxy receiving SUBSCRIBE / UNSUBSCRIBE
    pub subscribe_endpoint: ProxyEndpoint,

    /// Proxy receiving POST
    pub publish_endpoint: ProxyEndpoint,

    /// Key sent on unsubscribe for indices that should not match a real device
    pub placeholder_key: String,

    /// Indices divisible by this stride unsubscribe with the real key
    pub key_stride: u64,

    /// Sweep behaviour on transport failure
    pub failure_policy: FailurePolicy,

    /// Per-request timeout
    ///
    /// - `None`: wait forever (default)
    pub request_timeout: Option<Duration>,

    /// Global publish rate across all workers
    ///
    /// - `None`: unlimited (default)
    pub max_rps: Option<u32>,

    /// Initial per-worker pause after a failed publish
    ///
    /// - `Duration::ZERO`: retry immediately (default)
    pub backoff_base: Duration,

    /// Upper bound for the per-worker pause
    pub backoff_max: Duration,

    /// Stop publishing after this long
    ///
    /// - `None`: run until cancelled (default)
    pub run_duration: Option<Duration>,

    /// Interval between counter snapshots in the log
    ///
    /// - `Duration::ZERO`: disabled
    pub report_interval: Duration,

    /// Mark published values as permanent
    pub permanent: bool,

    /// Print one line per request to stdout
    pub echo: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        let proxy = ProxyEndpoint::default();
        Self {
            base_hash: DEFAULT_BASE_HASH,
            listeners: DEFAULT_LISTENERS,
            workers: DEFAULT_WORKERS,
            subscribe_endpoint: proxy.clone(),
            publish_endpoint: proxy,
            placeholder_key: PLACEHOLDER_KEY.to_string(),
            key_stride: DEFAULT_KEY_STRIDE,
            failure_policy: FailurePolicy::Abort,
            request_timeout: None,
            max_rps: None,
            backoff_base: Duration::ZERO,
            backoff_max: Duration::from_secs(5),
            run_duration: None,
            report_interval: Duration::from_secs(5),
            permanent: false,
            echo: true,
        }
    }
}

impl LoadOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the options for values the runners cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.listeners == 0 {
            return Err(ProxyBenchError::config("listeners must be greater than zero"));
        }
        if self.base_hash.checked_add(self.listeners).is_none() {
            return Err(ProxyBenchError::config(format!(
                "base hash {} + listeners {} overflows",
                self.base_hash, self.listeners
            )));
        }
        if self.workers == 0 {
            return Err(ProxyBenchError::config("workers must be greater than zero"));
        }
        if self.key_stride == 0 {
            return Err(ProxyBenchError::config("key stride must be greater than zero"));
        }
        match self.max_rps {
            Some(0) => return Err(ProxyBenchError::config("max rps must be greater than zero")),
            Some(rps) if rps > MAX_RPS => {
                return Err(ProxyBenchError::config(format!(
                    "max rps {rps} exceeds the limit of {MAX_RPS}"
                )))
            }
            _ => {}
        }
        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ProxyBenchError::config("request timeout must be greater than zero"));
        }
        if !self.backoff_base.is_zero() && self.backoff_max < self.backoff_base {
            return Err(ProxyBenchError::config(
                "backoff max must not be smaller than backoff base",
            ));
        }
        Ok(())
    }

    /// The listener range these options describe.
    #[must_use]
    pub const fn range(&self) -> ListenerRange {
        ListenerRange::new(self.base_hash, self.listeners)
    }

    /// Whether unsubscribing listener `index` should carry the real device key.
    #[must_use]
    pub const fn uses_device_key(&self, index: u64) -> bool {
        index % self.key_stride == 0
    }

    /// Key used when unsubscribing listener `index`.
    #[must_use]
    pub fn unsubscribe_key<'a>(&'a self, device_key: &'a str, index: u64) -> &'a str {
        if self.uses_device_key(index) {
            device_key
        } else {
            &self.placeholder_key
        }
    }

    /// Set the first listener index.
    #[must_use]
    pub fn with_base_hash(mut self, base_hash: u64) -> Self {
        self.base_hash = base_hash;
        self
    }

    /// Set the listener count.
    #[must_use]
    pub fn with_listeners(mut self, listeners: u64) -> Self {
        self.listeners = listeners;
        self
    }

    /// Set the publish worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the subscribe-side proxy.
    #[must_use]
    pub fn with_subscribe_endpoint(mut self, endpoint: ProxyEndpoint) -> Self {
        self.subscribe_endpoint = endpoint;
        self
    }

    /// Set the publish-side proxy.
    #[must_use]
    pub fn with_publish_endpoint(mut self, endpoint: ProxyEndpoint) -> Self {
        self.publish_endpoint = endpoint;
        self
    }

    /// Set the placeholder unsubscribe key.
    #[must_use]
    pub fn with_placeholder_key(mut self, key: impl Into<String>) -> Self {
        self.placeholder_key = key.into();
        self
    }

    /// Set the real-key stride for unsubscribe sweeps.
    #[must_use]
    pub fn with_key_stride(mut self, stride: u64) -> Self {
        self.key_stride = stride;
        self
    }

    /// Set the sweep failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Limit the aggregate publish rate.
    #[must_use]
    pub fn with_max_rps(mut self, rps: u32) -> Self {
        self.max_rps = Some(rps);
        self
    }

    /// Set the per-worker failure backoff.
    #[must_use]
    pub fn with_backoff(mut self, base: Duration, max: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_max = max;
        self
    }

    /// Stop the publish run after `duration`.
    #[must_use]
    pub fn with_run_duration(mut self, duration: Duration) -> Self {
        self.run_duration = Some(duration);
        self
    }

    /// Set the counter snapshot interval.
    #[must_use]
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Mark published values as permanent.
    #[must_use]
    pub fn with_permanent(mut self, permanent: bool) -> Self {
        self.permanent = permanent;
        self
    }

    /// Enable or disable the per-request stdout line.
    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}
