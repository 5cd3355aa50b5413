//! Task record and its dual time-tracking payload.
//!
//! A task carries its tracking state in one of two shapes: a per-assignee
//! map of pre-summed counters (current writers) or an ordered status-event
//! history (legacy writers). Deserialization picks the variant by payload
//! shape so consumers never branch on it directly.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::ProfileId;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Pre-summed per-assignee counters (live-counters shape).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkCounters {
    /// Total seconds spent working.
    #[serde(default)]
    pub worked_seconds: i64,
    /// Total seconds spent paused.
    #[serde(default)]
    pub paused_seconds: i64,
    /// Total seconds spent waiting in QA.
    #[serde(default)]
    pub qa_seconds: i64,
    /// Total seconds spent blocked.
    #[serde(default)]
    pub blocked_seconds: i64,
    /// Timestamp of the last tracked event; the open interval runs from
    /// here to "now" for the current owner.
    #[serde(default)]
    pub last_event_at: i64,
    /// When this profile was assigned.
    #[serde(default)]
    pub assigned_at: i64,
    /// Cumulative QA review seconds across all rounds, when tracked.
    #[serde(default)]
    pub qa_total_seconds: Option<i64>,
    /// QA rounds that ended in a failure.
    #[serde(default)]
    pub failed_qa_rounds: u32,
    /// Set when the profile was removed from the task; such an entry keeps
    /// its accumulated seconds but is no longer the current owner.
    #[serde(default)]
    pub removed_at: Option<i64>,
}

/// Status carried by a legacy tracking event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    Assigned,
    Claimed,
    Paused,
    Resumed,
    SubmittedForQa,
    QaInProgress,
    QaFailed,
    QaSuccess,
    Blocked,
    Unblocked,
    Removed,
}

/// One entry of the legacy ordered event history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEvent {
    pub status: TrackStatus,
    pub profile_id: ProfileId,
    /// Unix timestamp, 10- or 13-digit.
    pub timestamp: i64,
}

/// Time-tracking payload, one of two shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tracking {
    /// Map from profile id to accumulated counters.
    Counters(BTreeMap<ProfileId, WorkCounters>),
    /// Ordered list of raw status-change events.
    History(Vec<TrackEvent>),
}

/// A unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub project_id: Option<String>,
    /// Owning profile id; empty string means unassigned.
    #[serde(default)]
    pub owner: ProfileId,
    #[serde(default)]
    pub priority: Priority,
    /// Due date as a Unix timestamp (10- or 13-digit accepted).
    #[serde(default)]
    pub due_date: i64,
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub skillset: BTreeSet<String>,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub submitted_for_qa: bool,
    #[serde(default)]
    pub qa_in_progress: bool,
    #[serde(default)]
    pub passed_qa: bool,
    #[serde(default)]
    pub ready: bool,
    /// Suppresses payout regardless of skillset and hours.
    #[serde(default)]
    pub no_payout: bool,
    /// Unix timestamp of delivery, set when QA passes.
    #[serde(default)]
    pub time_finished: Option<i64>,
    #[serde(default)]
    pub tracking: Option<Tracking>,
}

impl Task {
    pub fn is_unassigned(&self) -> bool {
        self.owner.is_empty()
    }
}

/// Dirty-field delta of a task update.
///
/// XP awards must key off the fields that changed in the triggering update,
/// not the task's current state, so a retried update cannot double-apply a
/// ledger entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskChanges {
    /// New value of `passed_qa`, if the update changed it.
    #[serde(default)]
    pub passed_qa: Option<bool>,
}

impl TaskChanges {
    /// True only when this update flipped `passed_qa` to true.
    pub fn qa_just_passed(&self) -> bool {
        self.passed_qa == Some(true)
    }
}
