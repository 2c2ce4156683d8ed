//! Command-line surface.
//!
//! Every flag can also be set through a `PROXYBENCH_*` environment variable.

use crate::mode::Mode;
use clap::{Parser, ValueEnum};
use proxybench_core::endpoint::{EndpointError, ProxyEndpoint};
use proxybench_core::error::Result;
use proxybench_core::options::{
    FailurePolicy, LoadOptions, DEFAULT_BASE_HASH, DEFAULT_KEY_STRIDE, DEFAULT_LISTENERS,
    DEFAULT_PROXY_URL, DEFAULT_WORKERS,
};
use proxybench_core::payload::PLACEHOLDER_KEY;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnError {
    /// Stop the sweep at the first failed request
    Abort,
    /// Log the failure and keep sweeping
    Continue,
}

impl From<OnError> for FailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => Self::Abort,
            OnError::Continue => Self::Continue,
        }
    }
}

/// Load generator for the SUBSCRIBE / UNSUBSCRIBE / POST fan-out path of a DHT proxy.
///
/// `proxybench c <KEY>` subscribes every listener, `proxybench d <KEY>`
/// unsubscribes them, any other argument shape starts the publish workers.
#[derive(Debug, Parser)]
#[command(name = "proxybench", version)]
pub struct Cli {
    /// `c <KEY>` to subscribe, `d <KEY>` to unsubscribe, anything else (or
    /// nothing) to publish
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// First listener index
    #[arg(long, env = "PROXYBENCH_BASE_HASH", default_value_t = DEFAULT_BASE_HASH)]
    pub base_hash: u64,

    /// Number of listeners
    #[arg(long, env = "PROXYBENCH_LISTENERS", default_value_t = DEFAULT_LISTENERS)]
    pub listeners: u64,

    /// Concurrent publish workers
    #[arg(long, env = "PROXYBENCH_WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Proxy receiving SUBSCRIBE / UNSUBSCRIBE
    #[arg(
        long,
        env = "PROXYBENCH_SUBSCRIBE_URL",
        default_value = DEFAULT_PROXY_URL,
        value_parser = parse_endpoint
    )]
    pub subscribe_url: ProxyEndpoint,

    /// Proxy receiving POST
    #[arg(
        long,
        env = "PROXYBENCH_PUBLISH_URL",
        default_value = DEFAULT_PROXY_URL,
        value_parser = parse_endpoint
    )]
    pub publish_url: ProxyEndpoint,

    /// Key sent on unsubscribe for listeners that should not reach the device
    #[arg(long, env = "PROXYBENCH_PLACEHOLDER_KEY", default_value = PLACEHOLDER_KEY)]
    pub placeholder_key: String,

    /// Unsubscribe with the real key on every N-th listener
    #[arg(long, env = "PROXYBENCH_KEY_STRIDE", default_value_t = DEFAULT_KEY_STRIDE)]
    pub key_stride: u64,

    /// What a sweep does when a request gets no response
    #[arg(long, env = "PROXYBENCH_ON_ERROR", value_enum, default_value_t = OnError::Abort)]
    pub on_error: OnError,

    /// Per-request timeout in milliseconds (none by default)
    #[arg(long, env = "PROXYBENCH_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Aggregate publish rate limit in requests per second
    #[arg(long, env = "PROXYBENCH_MAX_RPS")]
    pub max_rps: Option<u32>,

    /// Initial pause of a worker after a failed publish (0 = retry at once)
    #[arg(long, env = "PROXYBENCH_BACKOFF_MS", default_value_t = 0)]
    pub backoff_ms: u64,

    /// Longest pause of a failing worker
    #[arg(long, env = "PROXYBENCH_BACKOFF_MAX_MS", default_value_t = 5_000)]
    pub backoff_max_ms: u64,

    /// Stop publishing after this many seconds (runs until Ctrl-C otherwise)
    #[arg(long, env = "PROXYBENCH_DURATION_SECS")]
    pub duration_secs: Option<u64>,

    /// Seconds between progress lines in publish mode (0 disables them)
    #[arg(long, env = "PROXYBENCH_REPORT_INTERVAL_SECS", default_value_t = 5)]
    pub report_interval_secs: u64,

    /// Ask the proxy to keep published values alive
    #[arg(long, env = "PROXYBENCH_PERMANENT")]
    pub permanent: bool,

    /// Do not print a line per request
    #[arg(short, long, env = "PROXYBENCH_QUIET")]
    pub quiet: bool,
}

fn parse_endpoint(s: &str) -> std::result::Result<ProxyEndpoint, EndpointError> {
    ProxyEndpoint::parse(s)
}

impl Cli {
    pub fn mode(&self) -> Result<Mode> {
        Mode::from_args(self.args.as_slice())
    }

    /// Validated options for this invocation.
    pub fn load_options(&self) -> Result<LoadOptions> {
        let mut options = LoadOptions::new()
            .with_base_hash(self.base_hash)
            .with_listeners(self.listeners)
            .with_workers(self.workers)
            .with_subscribe_endpoint(self.subscribe_url.clone())
            .with_publish_endpoint(self.publish_url.clone())
            .with_placeholder_key(self.placeholder_key.clone())
            .with_key_stride(self.key_stride)
            .with_failure_policy(self.on_error.into())
            .with_backoff(
                Duration::from_millis(self.backoff_ms),
                Duration::from_millis(self.backoff_max_ms),
            )
            .with_report_interval(Duration::from_secs(self.report_interval_secs))
            .with_permanent(self.permanent)
            .with_echo(!self.quiet);

        if let Some(ms) = self.timeout_ms {
            options = options.with_request_timeout(Duration::from_millis(ms));
        }
        if let Some(rps) = self.max_rps {
            options = options.with_max_rps(rps);
        }
        if let Some(secs) = self.duration_secs {
            options = options.with_run_duration(Duration::from_secs(secs));
        }

        options.validate()?;
        Ok(options)
    }
}
