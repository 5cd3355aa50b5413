//! Per-task performance reconstruction.
//!
//! Walks the normalized work logs of a task and produces, for every
//! profile that ever held it, elapsed seconds per activity state along
//! with completion and ownership facts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{ProfileId, Task};
use crate::worklog::{self, WorkLog, WorkState};

/// Performance facts for one profile on one task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPerformance {
    /// Seconds actively worked, including the open interval for the owner.
    pub work_seconds: i64,
    pub pause_seconds: i64,
    /// Seconds waiting in QA.
    pub qa_seconds: i64,
    /// Elapsed seconds of the current, still-open QA review interval.
    /// Judges reviewer tardiness; zero once the round closes.
    pub qa_progress_seconds: i64,
    /// Cumulative QA review seconds across all rounds.
    pub qa_progress_total_seconds: i64,
    pub total_number_failed_qa: u32,
    pub blocked_seconds: i64,
    /// Timestamp of the profile's last tracked event.
    pub work_track_timestamp: i64,
    /// True iff this profile is the current, non-removed owner.
    pub task_last_owner: bool,
    /// True iff the task's `passed_qa` flag is set.
    pub task_completed: bool,
}

/// Compute performance facts per profile for a task, as of `now`.
///
/// A task with no tracking payload yields a single all-zero record for the
/// (possibly empty) current owner slot.
///
/// # Errors
/// Fails with a 400-class error on a malformed tracking timestamp.
pub fn per_task(
    task: &Task,
    now: i64,
) -> Result<BTreeMap<ProfileId, TaskPerformance>, ValidationError> {
    let logs = worklog::normalize(task)?;

    if logs.is_empty() {
        let mut out = BTreeMap::new();
        out.insert(
            task.owner.clone(),
            TaskPerformance {
                work_track_timestamp: now,
                task_last_owner: true,
                task_completed: task.passed_qa,
                ..Default::default()
            },
        );
        return Ok(out);
    }

    Ok(logs
        .iter()
        .map(|(profile_id, log)| (profile_id.clone(), from_log(task, log, now)))
        .collect())
}

fn from_log(task: &Task, log: &WorkLog, now: i64) -> TaskPerformance {
    let mut perf = TaskPerformance {
        work_seconds: log.worked_seconds,
        pause_seconds: log.paused_seconds,
        qa_seconds: log.qa_seconds,
        qa_progress_seconds: 0,
        qa_progress_total_seconds: log.qa_review_seconds,
        total_number_failed_qa: log.failed_qa_rounds,
        blocked_seconds: log.blocked_seconds,
        work_track_timestamp: log.last_event_at,
        task_last_owner: log.current_owner,
        task_completed: task.passed_qa,
    };

    // Only the current owner accrues open-interval time.
    if log.current_owner {
        if let Some(open) = log.open {
            let elapsed = (now - open.since).max(0);
            match open.state {
                WorkState::Working => perf.work_seconds += elapsed,
                WorkState::Paused => perf.pause_seconds += elapsed,
                WorkState::InQa => perf.qa_seconds += elapsed,
                WorkState::Blocked => perf.blocked_seconds += elapsed,
                WorkState::QaReview => {
                    perf.qa_progress_seconds = elapsed;
                    perf.qa_progress_total_seconds += elapsed;
                }
            }
        }
    }

    perf
}
