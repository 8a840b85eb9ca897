//! Store interface and backing implementations.
//!
//! The store is the single source of truth for all entities. Controllers,
//! workers, and the reaper never mutate entities directly, only through the
//! operations here, which is what makes the concurrency guarantees
//! enforceable in one place: every mutating operation is atomic with
//! respect to concurrent callers, and `claim_next_job` hands each queued
//! job to exactly one caller.
//!
//! [`MemoryStore`] is the reference implementation. Production deployments
//! are expected to implement [`Store`] against a transactional backend
//! using single-statement conditional updates for the claim.

pub mod memory;
pub mod pagination;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{
    Job, JobFilter, JobUpdate, Metadata, NewJob, NewMetadata, NewSchedule, NewWorker, Schedule,
    ScheduleFilter, ScheduleUpdate, Worker,
};

pub use memory::MemoryStore;
pub use pagination::Page;

/// The contract every backing store must satisfy.
///
/// All operations are synchronous from the caller's perspective; none of
/// them suspends awaiting an external event. List operations return records
/// in a stable creation order, consistent across calls while the underlying
/// data does not change.
pub trait Store: Send + Sync {
    // Schedules

    fn schedule_create(&self, new: NewSchedule) -> Result<Schedule>;
    fn schedule_get_by_id(&self, schedule_id: Uuid) -> Result<Schedule>;
    fn schedule_get_all(&self, filter: &ScheduleFilter, page: &Page) -> Result<Vec<Schedule>>;
    fn schedule_update(&self, schedule_id: Uuid, update: ScheduleUpdate) -> Result<Schedule>;
    /// Deletes the schedule and its metadata. Jobs created from it are
    /// untouched; they hold a snapshot, not a reference.
    fn schedule_delete(&self, schedule_id: Uuid) -> Result<()>;

    // Schedule metadata, scoped under a schedule id. A missing parent and a
    // missing key both surface as `NotFound`.

    fn schedule_meta_create(&self, schedule_id: Uuid, item: NewMetadata) -> Result<Metadata>;
    fn schedule_meta_get(&self, schedule_id: Uuid, key: &str) -> Result<Metadata>;
    fn schedule_meta_get_all(&self, schedule_id: Uuid) -> Result<Vec<Metadata>>;
    fn schedule_meta_update(&self, schedule_id: Uuid, key: &str, value: &str) -> Result<Metadata>;
    fn schedule_meta_delete(&self, schedule_id: Uuid, key: &str) -> Result<()>;

    // Workers

    fn worker_create(&self, new: NewWorker) -> Result<Worker>;
    fn worker_get_by_id(&self, worker_id: Uuid) -> Result<Worker>;
    fn worker_get_all(&self, page: &Page) -> Result<Vec<Worker>>;
    fn worker_delete(&self, worker_id: Uuid) -> Result<()>;

    // Jobs

    fn job_create(&self, new: NewJob) -> Result<Job>;
    fn job_get_by_id(&self, job_id: Uuid) -> Result<Job>;
    fn job_get_all(&self, filter: &JobFilter, page: &Page) -> Result<Vec<Job>>;
    fn job_update(&self, job_id: Uuid, update: JobUpdate) -> Result<Job>;
    fn job_delete(&self, job_id: Uuid) -> Result<()>;

    // Job metadata

    fn job_meta_create(&self, job_id: Uuid, item: NewMetadata) -> Result<Metadata>;
    fn job_meta_get(&self, job_id: Uuid, key: &str) -> Result<Metadata>;
    fn job_meta_get_all(&self, job_id: Uuid) -> Result<Vec<Metadata>>;
    fn job_meta_update(&self, job_id: Uuid, key: &str, value: &str) -> Result<Metadata>;
    fn job_meta_delete(&self, job_id: Uuid, key: &str) -> Result<()>;

    // Assignment engine

    /// Atomically bind the oldest unbound queued job for `action` to
    /// `worker_id`, refreshing `updated_at` as the initial heartbeat. Under
    /// concurrent callers each queued job is returned to exactly one of
    /// them; a job stays ineligible until requeued, even if its status is
    /// still `queued`.
    /// `NotFound` when no eligible job exists; pollers treat that as idle.
    ///
    /// The worker is not required to pre-exist; registration is a
    /// deployment convention, not a checked precondition.
    fn claim_next_job(&self, action: &str, worker_id: Uuid) -> Result<Job>;

    /// Atomically release a job back to the pool: clear `worker_id`, set
    /// status to `queued`, and increment `retry_count` by exactly one.
    fn job_requeue(&self, job_id: Uuid) -> Result<Job>;

    // Heartbeat and status. Both writes are unconditional, gated only on
    // the job existing; transition validation is caller policy.

    fn job_heartbeat(&self, job_id: Uuid) -> Result<DateTime<Utc>>;
    fn job_update_heartbeat(&self, job_id: Uuid, heartbeat: DateTime<Utc>) -> Result<Job>;
    fn job_status(&self, job_id: Uuid) -> Result<String>;
    fn job_update_status(&self, job_id: Uuid, status: &str) -> Result<Job>;

    /// Clears all state. Testing and administrative hook only.
    fn reset(&self);
}
