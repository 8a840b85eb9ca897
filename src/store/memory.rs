//! In-memory reference store.
//!
//! One process-wide set of tables behind a single mutex. Every operation
//! takes the lock once and does all of its reads and writes inside that
//! critical section, which is what makes the claim and the requeue atomic
//! and keeps multi-field updates free of torn reads. Listing order is
//! insertion order, which is creation order since the store stamps
//! `created_at` itself.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::config::PagingConfig;
use crate::error::{CadenceError, Result};
use crate::model::job::status;
use crate::model::{
    Job, JobFilter, JobUpdate, Metadata, NewJob, NewMetadata, NewSchedule, NewWorker, Schedule,
    ScheduleFilter, ScheduleUpdate, Worker,
};
use crate::store::pagination::{paginate, Page};
use crate::store::Store;

#[derive(Debug, Default)]
struct Tables {
    schedules: Vec<Schedule>,
    workers: Vec<Worker>,
    jobs: Vec<Job>,
}

#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    paging: PagingConfig,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(PagingConfig::default())
    }
}

impl MemoryStore {
    pub fn new(paging: PagingConfig) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            paging,
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A poisoned lock only means another caller panicked mid-operation;
        // the tables themselves are still usable.
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> CadenceError {
    CadenceError::NotFound(format!("{kind} {id} could not be found"))
}

fn duplicate(kind: &str, id: impl std::fmt::Display) -> CadenceError {
    CadenceError::Duplicate(format!("{kind} {id} already exists"))
}

/// Materialize metadata input, rejecting duplicate keys so a create that
/// carries metadata fails as a whole before anything is stored.
fn build_metadata(kind: &str, items: Vec<NewMetadata>) -> Result<Vec<Metadata>> {
    let now = Utc::now();
    let mut built: Vec<Metadata> = Vec::with_capacity(items.len());
    for item in items {
        if built.iter().any(|existing| existing.key == item.key) {
            return Err(duplicate(kind, format!("metadata key {}", item.key)));
        }
        built.push(Metadata::new(item.key, item.value, now));
    }
    Ok(built)
}

fn meta_create_in(
    metadata: &mut Vec<Metadata>,
    kind: &str,
    item: NewMetadata,
) -> Result<Metadata> {
    if metadata.iter().any(|existing| existing.key == item.key) {
        return Err(duplicate(kind, format!("metadata key {}", item.key)));
    }
    let created = Metadata::new(item.key, item.value, Utc::now());
    metadata.push(created.clone());
    Ok(created)
}

fn meta_get_in(metadata: &[Metadata], kind: &str, key: &str) -> Result<Metadata> {
    metadata
        .iter()
        .find(|item| item.key == key)
        .cloned()
        .ok_or_else(|| not_found(kind, format!("metadata key {key}")))
}

fn meta_update_in(
    metadata: &mut [Metadata],
    kind: &str,
    key: &str,
    value: &str,
) -> Result<Metadata> {
    let item = metadata
        .iter_mut()
        .find(|item| item.key == key)
        .ok_or_else(|| not_found(kind, format!("metadata key {key}")))?;
    item.value = value.to_string();
    item.updated_at = Utc::now();
    Ok(item.clone())
}

fn meta_delete_in(metadata: &mut Vec<Metadata>, kind: &str, key: &str) -> Result<()> {
    let index = metadata
        .iter()
        .position(|item| item.key == key)
        .ok_or_else(|| not_found(kind, format!("metadata key {key}")))?;
    metadata.remove(index);
    Ok(())
}

impl Tables {
    fn schedule_mut(&mut self, schedule_id: Uuid) -> Result<&mut Schedule> {
        self.schedules
            .iter_mut()
            .find(|schedule| schedule.id == schedule_id)
            .ok_or_else(|| not_found("Schedule", schedule_id))
    }

    fn job_mut(&mut self, job_id: Uuid) -> Result<&mut Job> {
        self.jobs
            .iter_mut()
            .find(|job| job.id == job_id)
            .ok_or_else(|| not_found("Job", job_id))
    }
}

impl Store for MemoryStore {
    fn schedule_create(&self, new: NewSchedule) -> Result<Schedule> {
        let mut tables = self.tables();
        let id = new.id.unwrap_or_else(Uuid::new_v4);
        if tables.schedules.iter().any(|schedule| schedule.id == id) {
            return Err(duplicate("Schedule", id));
        }
        let metadata = build_metadata("Schedule", new.metadata)?;
        let now = Utc::now();
        let schedule = Schedule {
            id,
            tenant_id: new.tenant_id,
            action: new.action,
            minute: new.minute,
            hour: new.hour,
            next_run: new.next_run,
            created_at: now,
            updated_at: now,
            metadata,
        };
        tables.schedules.push(schedule.clone());
        tracing::debug!(schedule_id = %id, action = %schedule.action, "Schedule created");
        Ok(schedule)
    }

    fn schedule_get_by_id(&self, schedule_id: Uuid) -> Result<Schedule> {
        let tables = self.tables();
        tables
            .schedules
            .iter()
            .find(|schedule| schedule.id == schedule_id)
            .cloned()
            .ok_or_else(|| not_found("Schedule", schedule_id))
    }

    fn schedule_get_all(&self, filter: &ScheduleFilter, page: &Page) -> Result<Vec<Schedule>> {
        let tables = self.tables();
        let matching: Vec<Schedule> = tables
            .schedules
            .iter()
            .filter(|schedule| filter.matches(schedule))
            .cloned()
            .collect();
        paginate(&matching, page, &self.paging, |schedule| schedule.id)
    }

    fn schedule_update(&self, schedule_id: Uuid, update: ScheduleUpdate) -> Result<Schedule> {
        let mut tables = self.tables();
        let schedule = tables.schedule_mut(schedule_id)?;
        if let Some(tenant_id) = update.tenant_id {
            schedule.tenant_id = tenant_id;
        }
        if let Some(action) = update.action {
            schedule.action = action;
        }
        if let Some(minute) = update.minute {
            schedule.minute = minute;
        }
        if let Some(hour) = update.hour {
            schedule.hour = hour;
        }
        if let Some(next_run) = update.next_run {
            schedule.next_run = Some(next_run);
        }
        schedule.updated_at = Utc::now();
        Ok(schedule.clone())
    }

    fn schedule_delete(&self, schedule_id: Uuid) -> Result<()> {
        let mut tables = self.tables();
        let index = tables
            .schedules
            .iter()
            .position(|schedule| schedule.id == schedule_id)
            .ok_or_else(|| not_found("Schedule", schedule_id))?;
        tables.schedules.remove(index);
        Ok(())
    }

    fn schedule_meta_create(&self, schedule_id: Uuid, item: NewMetadata) -> Result<Metadata> {
        let mut tables = self.tables();
        let schedule = tables.schedule_mut(schedule_id)?;
        meta_create_in(&mut schedule.metadata, "Schedule", item)
    }

    fn schedule_meta_get(&self, schedule_id: Uuid, key: &str) -> Result<Metadata> {
        let tables = self.tables();
        let schedule = tables
            .schedules
            .iter()
            .find(|schedule| schedule.id == schedule_id)
            .ok_or_else(|| not_found("Schedule", schedule_id))?;
        meta_get_in(&schedule.metadata, "Schedule", key)
    }

    fn schedule_meta_get_all(&self, schedule_id: Uuid) -> Result<Vec<Metadata>> {
        let tables = self.tables();
        Ok(tables
            .schedules
            .iter()
            .find(|schedule| schedule.id == schedule_id)
            .map(|schedule| schedule.metadata.clone())
            .unwrap_or_default())
    }

    fn schedule_meta_update(&self, schedule_id: Uuid, key: &str, value: &str) -> Result<Metadata> {
        let mut tables = self.tables();
        let schedule = tables.schedule_mut(schedule_id)?;
        meta_update_in(&mut schedule.metadata, "Schedule", key, value)
    }

    fn schedule_meta_delete(&self, schedule_id: Uuid, key: &str) -> Result<()> {
        let mut tables = self.tables();
        let schedule = tables.schedule_mut(schedule_id)?;
        meta_delete_in(&mut schedule.metadata, "Schedule", key)
    }

    fn worker_create(&self, new: NewWorker) -> Result<Worker> {
        let mut tables = self.tables();
        let id = new.id.unwrap_or_else(Uuid::new_v4);
        if tables.workers.iter().any(|worker| worker.id == id) {
            return Err(duplicate("Worker", id));
        }
        let now = Utc::now();
        let worker = Worker {
            id,
            host: new.host,
            created_at: now,
            updated_at: now,
        };
        tables.workers.push(worker.clone());
        tracing::info!(worker_id = %id, host = %worker.host, "Worker registered");
        Ok(worker)
    }

    fn worker_get_by_id(&self, worker_id: Uuid) -> Result<Worker> {
        let tables = self.tables();
        tables
            .workers
            .iter()
            .find(|worker| worker.id == worker_id)
            .cloned()
            .ok_or_else(|| not_found("Worker", worker_id))
    }

    fn worker_get_all(&self, page: &Page) -> Result<Vec<Worker>> {
        let tables = self.tables();
        paginate(&tables.workers, page, &self.paging, |worker| worker.id)
    }

    fn worker_delete(&self, worker_id: Uuid) -> Result<()> {
        let mut tables = self.tables();
        let index = tables
            .workers
            .iter()
            .position(|worker| worker.id == worker_id)
            .ok_or_else(|| not_found("Worker", worker_id))?;
        tables.workers.remove(index);
        tracing::info!(worker_id = %worker_id, "Worker deregistered");
        Ok(())
    }

    fn job_create(&self, new: NewJob) -> Result<Job> {
        let mut tables = self.tables();
        let id = new.id.unwrap_or_else(Uuid::new_v4);
        if tables.jobs.iter().any(|job| job.id == id) {
            return Err(duplicate("Job", id));
        }

        // The schedule is only consulted at creation time; a schedule_id
        // that resolves to nothing is kept as-is on the job.
        let origin = new
            .schedule_id
            .and_then(|sid| tables.schedules.iter().find(|s| s.id == sid))
            .cloned();

        let tenant_id = new
            .tenant_id
            .or_else(|| origin.as_ref().map(|s| s.tenant_id.clone()));
        let action = new
            .action
            .or_else(|| origin.as_ref().map(|s| s.action.clone()))
            .ok_or_else(|| {
                CadenceError::BadRequest("job requires an action or a resolvable schedule".to_string())
            })?;
        let inherited: Vec<NewMetadata> = if new.metadata.is_empty() {
            origin
                .as_ref()
                .map(|s| {
                    s.metadata
                        .iter()
                        .map(|m| NewMetadata::new(m.key.clone(), m.value.clone()))
                        .collect()
                })
                .unwrap_or_default()
        } else {
            new.metadata
        };
        let metadata = build_metadata("Job", inherited)?;

        let now = Utc::now();
        let job = Job {
            id,
            schedule_id: new.schedule_id,
            tenant_id,
            worker_id: new.worker_id,
            action,
            status: new.status.unwrap_or_else(|| status::QUEUED.to_string()),
            retry_count: new.retry_count.unwrap_or(0),
            created_at: now,
            updated_at: now,
            metadata,
        };
        tables.jobs.push(job.clone());
        tracing::debug!(job_id = %id, action = %job.action, status = %job.status, "Job created");
        Ok(job)
    }

    fn job_get_by_id(&self, job_id: Uuid) -> Result<Job> {
        let tables = self.tables();
        tables
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .cloned()
            .ok_or_else(|| not_found("Job", job_id))
    }

    fn job_get_all(&self, filter: &JobFilter, page: &Page) -> Result<Vec<Job>> {
        let tables = self.tables();
        let matching: Vec<Job> = tables
            .jobs
            .iter()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        paginate(&matching, page, &self.paging, |job| job.id)
    }

    fn job_update(&self, job_id: Uuid, update: JobUpdate) -> Result<Job> {
        let mut tables = self.tables();
        let job = tables.job_mut(job_id)?;
        if let Some(status) = update.status {
            job.status = status;
        }
        if let Some(retry_count) = update.retry_count {
            job.retry_count = retry_count;
        }
        if let Some(worker_id) = update.worker_id {
            job.worker_id = worker_id;
        }
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    fn job_delete(&self, job_id: Uuid) -> Result<()> {
        let mut tables = self.tables();
        let index = tables
            .jobs
            .iter()
            .position(|job| job.id == job_id)
            .ok_or_else(|| not_found("Job", job_id))?;
        tables.jobs.remove(index);
        Ok(())
    }

    fn job_meta_create(&self, job_id: Uuid, item: NewMetadata) -> Result<Metadata> {
        let mut tables = self.tables();
        let job = tables.job_mut(job_id)?;
        meta_create_in(&mut job.metadata, "Job", item)
    }

    fn job_meta_get(&self, job_id: Uuid, key: &str) -> Result<Metadata> {
        let tables = self.tables();
        let job = tables
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .ok_or_else(|| not_found("Job", job_id))?;
        meta_get_in(&job.metadata, "Job", key)
    }

    fn job_meta_get_all(&self, job_id: Uuid) -> Result<Vec<Metadata>> {
        let tables = self.tables();
        Ok(tables
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .map(|job| job.metadata.clone())
            .unwrap_or_default())
    }

    fn job_meta_update(&self, job_id: Uuid, key: &str, value: &str) -> Result<Metadata> {
        let mut tables = self.tables();
        let job = tables.job_mut(job_id)?;
        meta_update_in(&mut job.metadata, "Job", key, value)
    }

    fn job_meta_delete(&self, job_id: Uuid, key: &str) -> Result<()> {
        let mut tables = self.tables();
        let job = tables.job_mut(job_id)?;
        meta_delete_in(&mut job.metadata, "Job", key)
    }

    fn claim_next_job(&self, action: &str, worker_id: Uuid) -> Result<Job> {
        let mut tables = self.tables();
        // Selection and binding happen under the same lock, so a job racing
        // claimers goes to exactly one of them. FIFO by creation time, id
        // as a deterministic tiebreak.
        let job = tables
            .jobs
            .iter_mut()
            .filter(|job| {
                job.status == status::QUEUED && job.worker_id.is_none() && job.action == action
            })
            .min_by_key(|job| (job.created_at, job.id))
            .ok_or_else(|| {
                CadenceError::NotFound(format!("No available jobs found for action {action}"))
            })?;
        job.worker_id = Some(worker_id);
        job.updated_at = Utc::now();
        let claimed = job.clone();
        tracing::info!(job_id = %claimed.id, worker_id = %worker_id, action, "Job claimed");
        Ok(claimed)
    }

    fn job_requeue(&self, job_id: Uuid) -> Result<Job> {
        let mut tables = self.tables();
        let job = tables.job_mut(job_id)?;
        job.worker_id = None;
        job.status = status::QUEUED.to_string();
        job.retry_count += 1;
        job.updated_at = Utc::now();
        let requeued = job.clone();
        tracing::info!(job_id = %job_id, retry_count = requeued.retry_count, "Job requeued");
        Ok(requeued)
    }

    fn job_heartbeat(&self, job_id: Uuid) -> Result<chrono::DateTime<Utc>> {
        let tables = self.tables();
        tables
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .map(|job| job.updated_at)
            .ok_or_else(|| not_found("Job", job_id))
    }

    fn job_update_heartbeat(
        &self,
        job_id: Uuid,
        heartbeat: chrono::DateTime<Utc>,
    ) -> Result<Job> {
        let mut tables = self.tables();
        let job = tables.job_mut(job_id)?;
        // Caller-supplied liveness report, stored verbatim rather than "now".
        job.updated_at = heartbeat;
        Ok(job.clone())
    }

    fn job_status(&self, job_id: Uuid) -> Result<String> {
        let tables = self.tables();
        tables
            .jobs
            .iter()
            .find(|job| job.id == job_id)
            .map(|job| job.status.clone())
            .ok_or_else(|| not_found("Job", job_id))
    }

    fn job_update_status(&self, job_id: Uuid, status: &str) -> Result<Job> {
        if status.trim().is_empty() {
            return Err(CadenceError::BadRequest(
                "status must not be empty".to_string(),
            ));
        }
        let mut tables = self.tables();
        let job = tables.job_mut(job_id)?;
        job.status = status.to_string();
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    fn reset(&self) {
        let mut tables = self.tables();
        *tables = Tables::default();
    }
}
