//! End-to-end demo: a schedule materialized into jobs, two polling workers
//! claiming and finishing them, and the reaper watching for stalled jobs.
//!
//! Run with `RUST_LOG=info cargo run --example poll_loop`. Ctrl-C stops the
//! workers and the reaper.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use cadence_lite::config::ReaperConfig;
use cadence_lite::model::job::status;
use cadence_lite::model::{NewJob, NewSchedule, NewWorker};
use cadence_lite::reaper::Reaper;
use cadence_lite::shutdown::Shutdown;
use cadence_lite::store::{MemoryStore, Store};

async fn poll_loop(store: Arc<dyn Store>, worker_id: Uuid, action: String) {
    loop {
        match store.claim_next_job(&action, worker_id) {
            Ok(job) => {
                println!("worker {worker_id} picked up job {} ({})", job.id, job.action);
                // Stand-in for doing the actual work.
                tokio::time::sleep(Duration::from_millis(250)).await;
                if let Err(err) = store.job_update_status(job.id, status::DONE) {
                    eprintln!("worker {worker_id} could not finish job: {err}");
                }
            }
            Err(err) if err.is_not_found() => {
                // Nothing to do right now.
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            Err(err) => {
                eprintln!("worker {worker_id} poll failed: {err}");
                break;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let store: Arc<dyn Store> = Arc::new(MemoryStore::default());

    let schedule = store.schedule_create(
        NewSchedule::new("demo-tenant", "snapshot", 30, 2)
            .with_metadata("instance_id", "demo-instance"),
    )?;
    for _ in 0..8 {
        store.job_create(NewJob::from_schedule(schedule.id))?;
    }

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    let reaper = Reaper::new(
        Arc::clone(&store),
        ReaperConfig::default()
            .with_heartbeat_timeout(Duration::from_secs(10))
            .with_scan_interval(Duration::from_secs(2)),
    );
    let reaper_token = shutdown.token();
    let reaper_task = tokio::spawn(async move { reaper.run(reaper_token).await });

    let mut workers = Vec::new();
    for _ in 0..2 {
        let worker = store.worker_create(NewWorker::new("demo-host"))?;
        let store = Arc::clone(&store);
        let token = shutdown.token();
        workers.push(tokio::spawn(async move {
            tokio::select! {
                _ = poll_loop(store, worker.id, "snapshot".to_string()) => {}
                _ = token.cancelled() => {}
            }
        }));
    }

    shutdown.cancelled().await;
    for worker in workers {
        let _ = worker.await;
    }
    let _ = reaper_task.await;

    Ok(())
}
