use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::metadata::{Metadata, NewMetadata};

/// Well-known job statuses.
///
/// The store treats the status space as an open set of strings and only
/// requires non-empty values; these constants name the values the engine
/// and the reaper themselves depend on. `QUEUED` gates the claim.
pub mod status {
    pub const QUEUED: &str = "queued";
    pub const PROCESSING: &str = "processing";
    pub const DONE: &str = "done";
    pub const ERROR: &str = "error";
}

/// One concrete unit of work, usually materialized from a schedule.
///
/// `updated_at` doubles as the heartbeat timestamp: the claim, explicit
/// heartbeat writes, and status changes all refresh it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    /// Back-reference only; the schedule may since have been deleted.
    pub schedule_id: Option<Uuid>,
    pub tenant_id: Option<String>,
    /// Set while the job is claimed by a worker, cleared on requeue.
    pub worker_id: Option<Uuid>,
    pub action: String,
    pub status: String,
    pub retry_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub metadata: Vec<Metadata>,
}

impl Job {
    /// True when the job has finished, successfully or not. The reaper
    /// never touches terminal jobs.
    pub fn is_terminal(&self) -> bool {
        self.status == status::DONE || self.status == status::ERROR
    }
}

/// Input for job creation.
///
/// When `schedule_id` resolves to an existing schedule, `tenant_id`,
/// `action`, and metadata not supplied here are inherited from it as a
/// snapshot. `status` defaults to `queued` and `retry_count` to 0.
#[derive(Debug, Clone, Default)]
pub struct NewJob {
    pub id: Option<Uuid>,
    pub schedule_id: Option<Uuid>,
    pub tenant_id: Option<String>,
    pub worker_id: Option<Uuid>,
    pub action: Option<String>,
    pub status: Option<String>,
    pub retry_count: Option<u32>,
    pub metadata: Vec<NewMetadata>,
}

impl NewJob {
    pub fn from_schedule(schedule_id: Uuid) -> Self {
        Self {
            schedule_id: Some(schedule_id),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push(NewMetadata::new(key, value));
        self
    }
}

/// Partial update for a job. Fields left as `None` are untouched;
/// `worker_id: Some(None)` clears the worker binding.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<String>,
    pub retry_count: Option<u32>,
    pub worker_id: Option<Option<Uuid>>,
}

/// Filter for job listing; empty matches everything.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub schedule_id: Option<Uuid>,
    pub worker_id: Option<Uuid>,
    pub status: Option<String>,
    pub action: Option<String>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(schedule_id) = self.schedule_id {
            if job.schedule_id != Some(schedule_id) {
                return false;
            }
        }
        if let Some(worker_id) = self.worker_id {
            if job.worker_id != Some(worker_id) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &job.status != status {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if &job.action != action {
                return false;
            }
        }
        true
    }
}
