//! Sequential subscribe / unsubscribe sweeps.
//!
//! A sweep walks the listener range in ascending order with exactly one
//! request in flight. Responses are never parsed: any status counts as an
//! answer, only transport errors go through the [`FailurePolicy`].

use crate::method::ProxyMethod;
use crate::transport::{ProxyRequest, ProxyTransport};
use bytes::Bytes;
use proxybench_core::error::{ProxyBenchError, Result};
use proxybench_core::options::{FailurePolicy, LoadOptions};
use proxybench_core::payload::SubscribeBody;
use proxybench_core::stats::Outcome;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Which sweep to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    Subscribe,
    Unsubscribe,
}

impl SweepKind {
    #[must_use]
    pub const fn method(&self) -> ProxyMethod {
        match self {
            Self::Subscribe => ProxyMethod::Subscribe,
            Self::Unsubscribe => ProxyMethod::Unsubscribe,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
        }
    }
}

/// A listener the sweep skipped past under [`FailurePolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub index: u64,
    pub reason: String,
}

/// What a sweep did.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    /// Requests handed to the transport
    pub attempted: u64,
    /// 2xx responses
    pub accepted: u64,
    /// Non-2xx responses
    pub rejected: u64,
    /// Transport failures, in index order
    pub failures: Vec<SweepFailure>,
    /// The sweep stopped early because it was cancelled
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl fmt::Display for SweepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} accepted, {} rejected, {} failed in {:.1}s{}",
            self.attempted,
            self.accepted,
            self.rejected,
            self.failures.len(),
            self.elapsed.as_secs_f64(),
            if self.cancelled { " (cancelled)" } else { "" },
        )
    }
}

/// Runs sweeps against the subscribe-side proxy.
pub struct SweepRunner<T> {
    transport: Arc<T>,
    options: Arc<LoadOptions>,
}

impl<T: ProxyTransport> SweepRunner<T> {
    pub fn new(transport: Arc<T>, options: Arc<LoadOptions>) -> Result<Self> {
        options.validate()?;
        Ok(Self { transport, options })
    }

    /// SUBSCRIBE every listener with `device_key`.
    pub async fn subscribe(
        &self,
        device_key: &str,
        cancel: &CancellationToken,
    ) -> Result<SweepReport> {
        self.run(SweepKind::Subscribe, device_key, cancel).await
    }

    /// UNSUBSCRIBE every listener; only every `key_stride`-th index carries
    /// `device_key`, the rest carry the placeholder key.
    pub async fn unsubscribe(
        &self,
        device_key: &str,
        cancel: &CancellationToken,
    ) -> Result<SweepReport> {
        self.run(SweepKind::Unsubscribe, device_key, cancel).await
    }

    pub async fn run(
        &self,
        kind: SweepKind,
        device_key: &str,
        cancel: &CancellationToken,
    ) -> Result<SweepReport> {
        if device_key.is_empty() {
            return Err(ProxyBenchError::MissingDeviceKey { mode: kind.name() });
        }

        let options = &self.options;
        let method = kind.method();
        let device_body = SubscribeBody::new(device_key).encode()?;
        let placeholder_body = SubscribeBody::new(&options.placeholder_key).encode()?;

        info!(
            mode = kind.name(),
            range = %options.range(),
            endpoint = %options.subscribe_endpoint,
            policy = %options.failure_policy,
            "starting sweep"
        );

        let start = Instant::now();
        let mut report = SweepReport::default();

        for index in options.range() {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let body = match kind {
                SweepKind::Subscribe => device_body.clone(),
                SweepKind::Unsubscribe if options.uses_device_key(index) => device_body.clone(),
                SweepKind::Unsubscribe => placeholder_body.clone(),
            };

            if options.echo {
                println!("{}", method.echo_line(index));
            }

            let result = self.send_one(method, index, body, cancel).await;
            let Some(result) = result else {
                report.cancelled = true;
                break;
            };
            report.attempted += 1;

            match result {
                Ok(status) => match Outcome::from_status(status) {
                    Outcome::Accepted => report.accepted += 1,
                    _ => {
                        debug!(%method, index, status, "proxy rejected request");
                        report.rejected += 1;
                    }
                },
                Err(err) => match options.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(ProxyBenchError::Aborted {
                            mode: kind.name(),
                            index,
                            source: Box::new(err),
                        });
                    }
                    FailurePolicy::Continue => {
                        warn!(%method, index, error = %err, "request failed, continuing");
                        report.failures.push(SweepFailure {
                            index,
                            reason: err.to_string(),
                        });
                    }
                },
            }
        }

        report.elapsed = start.elapsed();
        info!(mode = kind.name(), %report, "sweep finished");
        Ok(report)
    }

    /// `None` when cancelled before the proxy answered.
    async fn send_one(
        &self,
        method: ProxyMethod,
        index: u64,
        body: Bytes,
        cancel: &CancellationToken,
    ) -> Option<Result<u16>> {
        let url = self.options.subscribe_endpoint.url_for(index);
        let request = ProxyRequest::new(method, index, url, body);
        tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = self.transport.send(request) => Some(result),
        }
    }
}
