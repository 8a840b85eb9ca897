//! Job-scheduling store and assignment engine.
//!
//! Tenants register recurring schedules; a materializer turns due schedules
//! into jobs; workers poll [`Store::claim_next_job`] for work matching an
//! action and report liveness through heartbeats and status updates. The
//! store guarantees each queued job is handed to at most one worker at a
//! time, and the [`reaper`] returns jobs whose heartbeat has expired to the
//! queue.
//!
//! [`Store::claim_next_job`]: store::Store::claim_next_job

pub mod config;
pub mod error;
pub mod heartbeat;
pub mod model;
pub mod reaper;
pub mod shutdown;
pub mod store;

pub use error::{CadenceError, Result};
pub use store::{MemoryStore, Page, Store};
