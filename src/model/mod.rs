//! Entity model: schedules, jobs, workers, and their metadata.
//!
//! Entities are plain structs owned exclusively by the store; callers only
//! ever see copies returned from store operations. Creation inputs
//! (`NewSchedule`, `NewJob`, `NewWorker`) and partial updates
//! (`ScheduleUpdate`, `JobUpdate`) are separate types so that "field not
//! supplied" is explicit rather than a missing key.

pub mod job;
pub mod metadata;
pub mod schedule;
pub mod worker;

pub use job::{Job, JobFilter, JobUpdate, NewJob};
pub use metadata::{Metadata, NewMetadata};
pub use schedule::{NewSchedule, Schedule, ScheduleFilter, ScheduleUpdate};
pub use worker::{NewWorker, Worker};
