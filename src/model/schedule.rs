use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::metadata::{Metadata, NewMetadata};

/// A tenant-owned recurring definition that periodically produces jobs.
///
/// The cron fields (`minute`, `hour`) and `next_run` are stored as given;
/// evaluating them is the materializer's concern, not the store's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub tenant_id: String,
    pub action: String,
    pub minute: i32,
    pub hour: i32,
    pub next_run: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub metadata: Vec<Metadata>,
}

/// Input for schedule creation. An explicit `id` collides with an existing
/// record as `Duplicate`; without one a random UUID is assigned.
#[derive(Debug, Clone, Default)]
pub struct NewSchedule {
    pub id: Option<Uuid>,
    pub tenant_id: String,
    pub action: String,
    pub minute: i32,
    pub hour: i32,
    pub next_run: Option<DateTime<Utc>>,
    pub metadata: Vec<NewMetadata>,
}

impl NewSchedule {
    pub fn new(tenant_id: impl Into<String>, action: impl Into<String>, minute: i32, hour: i32) -> Self {
        Self {
            id: None,
            tenant_id: tenant_id.into(),
            action: action.into(),
            minute,
            hour,
            next_run: None,
            metadata: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_next_run(mut self, next_run: DateTime<Utc>) -> Self {
        self.next_run = Some(next_run);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push(NewMetadata::new(key, value));
        self
    }
}

/// Partial update for a schedule. Fields left as `None` are untouched.
#[derive(Debug, Clone, Default)]
pub struct ScheduleUpdate {
    pub tenant_id: Option<String>,
    pub action: Option<String>,
    pub minute: Option<i32>,
    pub hour: Option<i32>,
    pub next_run: Option<DateTime<Utc>>,
}

/// Filter for schedule listing; empty matches everything.
#[derive(Debug, Clone, Default)]
pub struct ScheduleFilter {
    pub tenant_id: Option<String>,
    pub action: Option<String>,
}

impl ScheduleFilter {
    pub fn matches(&self, schedule: &Schedule) -> bool {
        if let Some(tenant_id) = &self.tenant_id {
            if &schedule.tenant_id != tenant_id {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if &schedule.action != action {
                return false;
            }
        }
        true
    }
}
