//! Runs the selected mode to completion.

use crate::mode::Mode;
use proxybench_core::error::Result;
use proxybench_core::options::LoadOptions;
use proxybench_core::stats::PublishSummary;
use proxybench_http::{ProxyTransport, PublishPool, SweepReport, SweepRunner};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Result of a finished run.
#[derive(Debug, Clone)]
pub enum RunReport {
    Sweep(SweepReport),
    Publish(PublishSummary),
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sweep(report) => report.fmt(f),
            Self::Publish(summary) => summary.fmt(f),
        }
    }
}

/// Execute `mode` with `options` over `transport` until it finishes or
/// `cancel` fires.
pub async fn run<T: ProxyTransport + 'static>(
    mode: Mode,
    options: LoadOptions,
    transport: Arc<T>,
    cancel: CancellationToken,
) -> Result<RunReport> {
    let options = Arc::new(options);

    match mode {
        Mode::Subscribe { device_key } => {
            let runner = SweepRunner::new(transport, options)?;
            let report = runner.subscribe(&device_key, &cancel).await?;
            Ok(RunReport::Sweep(report))
        }
        Mode::Unsubscribe { device_key } => {
            let runner = SweepRunner::new(transport, options)?;
            let report = runner.unsubscribe(&device_key, &cancel).await?;
            Ok(RunReport::Sweep(report))
        }
        Mode::Publish => {
            let pool = PublishPool::new(transport, options)?;
            Ok(RunReport::Publish(pool.run(cancel).await))
        }
    }
}
