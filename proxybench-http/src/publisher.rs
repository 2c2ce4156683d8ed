//! Publish worker pool.
//!
//! A fixed number of workers each loop until cancelled: pick a random
//! listener, POST the publish body to it, count the outcome, repeat. Workers
//! share read-only configuration, the pacer and a set of atomic counters;
//! they never talk to each other.

use crate::method::ProxyMethod;
use crate::transport::{ProxyRequest, ProxyTransport};
use bytes::Bytes;
use proxybench_core::backoff::FailureBackoff;
use proxybench_core::error::Result;
use proxybench_core::options::LoadOptions;
use proxybench_core::pacing::{self, Pacer};
use proxybench_core::payload::PublishBody;
use proxybench_core::stats::{Outcome, PublishStats, PublishSummary};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

struct Shared<T> {
    transport: Arc<T>,
    options: Arc<LoadOptions>,
    stats: Arc<PublishStats>,
    pacer: Arc<dyn Pacer>,
    body: Bytes,
}

/// Publish load generator.
///
/// # Example
///
/// ```rust,no_run
/// use proxybench_core::options::LoadOptions;
/// use proxybench_http::{HttpTransport, PublishPool};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = Arc::new(LoadOptions::default().with_workers(16));
/// let transport = Arc::new(HttpTransport::new(&options)?);
/// let pool = PublishPool::new(transport, options)?;
///
/// let cancel = CancellationToken::new();
/// let summary = pool.run(cancel).await;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
pub struct PublishPool<T> {
    shared: Arc<Shared<T>>,
}

impl<T: ProxyTransport + 'static> PublishPool<T> {
    /// Must be called from within a tokio runtime when `max_rps` is set.
    pub fn new(transport: Arc<T>, options: Arc<LoadOptions>) -> Result<Self> {
        options.validate()?;
        let body = PublishBody::default()
            .with_permanent(options.permanent)
            .encode()?;
        let pacer = pacing::for_rate(options.max_rps);

        Ok(Self {
            shared: Arc::new(Shared {
                transport,
                options,
                stats: Arc::new(PublishStats::new()),
                pacer,
                body,
            }),
        })
    }

    /// Counters updated live by the workers.
    #[must_use]
    pub fn stats(&self) -> Arc<PublishStats> {
        Arc::clone(&self.shared.stats)
    }

    /// Run every worker until `cancel` fires (or `run_duration` elapses) and
    /// return the final counters.
    pub async fn run(&self, cancel: CancellationToken) -> PublishSummary {
        let options = &self.shared.options;
        info!(
            workers = options.workers,
            range = %options.range(),
            endpoint = %options.publish_endpoint,
            max_rps = ?options.max_rps,
            "starting publish workers"
        );

        let start = Instant::now();
        let mut workers = JoinSet::new();
        for id in 0..options.workers {
            workers.spawn(publish_worker(id, Arc::clone(&self.shared), cancel.clone()));
        }

        let mut background = JoinSet::new();
        if let Some(duration) = options.run_duration {
            background.spawn(stop_after(duration, cancel.clone()));
        }
        if !options.report_interval.is_zero() {
            background.spawn(report_periodically(
                options.report_interval,
                start,
                Arc::clone(&self.shared.stats),
                cancel.clone(),
            ));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                warn!("publish worker ended abnormally: {e}");
            }
        }
        background.abort_all();

        let summary = self.shared.stats.snapshot(start.elapsed());
        info!(%summary, "publish workers stopped");
        summary
    }
}

async fn publish_worker<T: ProxyTransport>(
    id: usize,
    shared: Arc<Shared<T>>,
    cancel: CancellationToken,
) {
    shared.stats.worker_started();
    trace!(worker = id, "worker started");

    let options = &shared.options;
    let range = options.range();
    let mut rng = StdRng::from_entropy();
    let mut backoff = FailureBackoff::new(options);

    while let Some(index) = range.sample(&mut rng) {
        if options.echo {
            println!("{}", ProxyMethod::Post.echo_line(index));
        }

        let request = ProxyRequest::new(
            ProxyMethod::Post,
            index,
            options.publish_endpoint.url_for(index),
            shared.body.clone(),
        );
        let attempt = async {
            shared.pacer.ready().await;
            shared.stats.record_attempt();
            shared.transport.send(request).await
        };

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = attempt => result,
        };

        let outcome = match result {
            Ok(status) => Outcome::from_status(status),
            Err(err) => {
                trace!(worker = id, index, error = %err, "publish failed");
                Outcome::Failed
            }
        };
        shared.stats.record(outcome);

        if outcome.is_accepted() {
            backoff.on_success();
        } else if let Some(delay) = backoff.on_failure() {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = time::sleep(delay) => {}
            }
        }

        // An instantly-failing transport never yields on its own.
        tokio::task::yield_now().await;
    }

    shared.stats.worker_stopped();
    trace!(worker = id, "worker stopped");
}

async fn stop_after(duration: Duration, cancel: CancellationToken) {
    tokio::select! {
        () = cancel.cancelled() => {}
        () = time::sleep(duration) => {
            debug!(?duration, "run duration elapsed");
            cancel.cancel();
        }
    }
}

async fn report_periodically(
    period: Duration,
    start: Instant,
    stats: Arc<PublishStats>,
    cancel: CancellationToken,
) {
    let mut ticker = time::interval_at(start + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let summary = stats.snapshot(start.elapsed());
                info!(%summary, "publish progress");
            }
        }
    }
}
