//! Liveness reaper.
//!
//! Workers that crash or lose connectivity stop refreshing their jobs'
//! heartbeats. The reaper periodically scans for bound, non-terminal jobs
//! whose heartbeat is older than the configured window and releases them
//! back to the queue, or marks them `error` once the retry ceiling is
//! reached. It is an ordinary store client: everything it does goes through
//! `job_get_all` and the atomic requeue/status operations, so its writes
//! cannot race unsafely with concurrent claims.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio_util::sync::CancellationToken;

use crate::config::ReaperConfig;
use crate::error::Result;
use crate::model::job::status;
use crate::model::JobFilter;
use crate::store::{Page, Store};

pub struct Reaper {
    store: Arc<dyn Store>,
    config: ReaperConfig,
}

/// Outcome of one reaper sweep.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub requeued: usize,
    pub failed: usize,
}

impl Reaper {
    pub fn new(store: Arc<dyn Store>, config: ReaperConfig) -> Self {
        Self { store, config }
    }

    /// Scan once for stalled jobs, as of `now`.
    ///
    /// A job is stalled when it has a worker bound, is not in a terminal
    /// status, and its heartbeat is older than the expiry window. Stalled
    /// jobs below the retry ceiling are requeued; the rest go to `error`,
    /// keeping the worker binding for audit.
    pub fn sweep(&self, now: DateTime<Utc>) -> Result<SweepStats> {
        let expiry = now
            - ChronoDuration::from_std(self.config.heartbeat_timeout)
                .unwrap_or_else(|_| ChronoDuration::zero());

        let mut stats = SweepStats::default();
        // The store caps every page at its configured limit, so one scan
        // has to chain markers until the table is exhausted. Requeues and
        // status writes do not reorder the table, so the marker from the
        // previous batch stays valid.
        let mut page = Page::all();
        loop {
            let jobs = self.store.job_get_all(&JobFilter::default(), &page)?;
            let last_id = match jobs.last() {
                Some(job) => job.id,
                None => break,
            };
            page = page.with_marker(last_id);

            for job in jobs {
                if job.worker_id.is_none() || job.is_terminal() || job.updated_at > expiry {
                    continue;
                }
                if job.retry_count >= self.config.max_retries {
                    self.store.job_update_status(job.id, status::ERROR)?;
                    tracing::warn!(
                        job_id = %job.id,
                        retry_count = job.retry_count,
                        "Stalled job exceeded retry ceiling, marked error"
                    );
                    stats.failed += 1;
                } else {
                    self.store.job_requeue(job.id)?;
                    stats.requeued += 1;
                }
            }
        }
        if stats.requeued > 0 || stats.failed > 0 {
            tracing::info!(
                requeued = stats.requeued,
                failed = stats.failed,
                "Reaper sweep released stalled jobs"
            );
        }
        Ok(stats)
    }

    /// Run sweeps on the configured interval until `shutdown` fires.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.scan_interval);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(err) = self.sweep(Utc::now()) {
                        tracing::error!(error = %err, "Reaper sweep failed");
                    }
                }
                _ = shutdown.cancelled() => {
                    tracing::info!("Reaper shutting down");
                    break;
                }
            }
        }
    }
}
