use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered poller process, identified by the host it runs on.
///
/// Workers are created on registration and deleted on deregistration;
/// there is no update operation and no metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: Uuid,
    pub host: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for worker registration.
#[derive(Debug, Clone, Default)]
pub struct NewWorker {
    pub id: Option<Uuid>,
    pub host: String,
}

impl NewWorker {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            id: None,
            host: host.into(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }
}
