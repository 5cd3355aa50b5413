//! # Worktrack Core Library
//!
//! Work-time and performance aggregation engine for a project/task
//! tracking platform. It reconstructs how much time a worker spent on a
//! task from a semi-structured event log, converts that into payout and
//! XP adjustments, and rolls per-profile XP deltas up over arbitrary date
//! ranges while pro-rating minimum-earning targets against approved
//! vacation.
//!
//! The surrounding platform (CRUD, auth, notification delivery) is an
//! external collaborator: the engine consumes Task and Profile records
//! plus configuration tables, and emits computed metrics and ledger
//! entries for those layers to persist and display.
//!
//! ## Key Components
//!
//! - [`worklog::normalize`]: unifies the two tracking payload shapes
//! - [`performance::per_task`]: elapsed seconds per activity state
//! - [`payout::task_values`]: monetary payout and XP value resolution
//! - [`coefficients`]: speed, priority-scarcity and reviewer rules
//! - [`aggregate::aggregate_for_time_range`]: ledger range aggregation
//! - [`Database`]: record persistence and the atomic XP ledger append

pub mod aggregate;
pub mod awards;
pub mod coefficients;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod payout;
pub mod performance;
pub mod priority;
pub mod storage;
pub mod workdays;
pub mod worklog;

pub use aggregate::{aggregate_for_time_range, monthly_minimum_check, PerformanceReport, TimeRange};
pub use awards::{apply_awards, delivery_awards, XpAward};
pub use config::Config;
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use model::{
    HourlyRateTable, Priority, Profile, ProfileId, Project, RoleMinimumConfig, Task, TaskChanges,
    TrackEvent, TrackStatus, Tracking, VacationRecord, WorkCounters, XpEntry,
};
pub use payout::{task_values, TaskValues};
pub use performance::{per_task, TaskPerformance};
pub use storage::Database;
