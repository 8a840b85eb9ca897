use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One key/value metadata item attached to a schedule or a job.
///
/// Keys are unique per parent record. Job metadata is copied from the
/// originating schedule at creation time and never tracks it afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    pub fn new(key: String, value: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
            value,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Metadata input for create operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMetadata {
    pub key: String,
    pub value: String,
}

impl NewMetadata {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
