//! Domain records consumed and produced by the engine.
//!
//! Tasks and profiles are created and mutated by the surrounding CRUD
//! layer; the engine reads them and writes back computed fields only.

mod ledger;
mod profile;
mod rates;
mod task;

pub use ledger::XpEntry;
pub use profile::{Profile, Project, VacationRecord};
pub use rates::{HourlyRateTable, RoleMinimumConfig};
pub use task::{
    Priority, Task, TaskChanges, TrackEvent, TrackStatus, Tracking, WorkCounters,
};

/// Profile identifier as stored on upstream records.
pub type ProfileId = String;
