//! Work-log normalization.
//!
//! Unifies the two tracking payload shapes behind one [`WorkLog`] summary
//! per profile: accumulated seconds per activity state, the trailing open
//! interval, QA round bookkeeping, and the current-owner flag. Consumers
//! never see which shape the task carried.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::input::parse_unix_timestamp;
use crate::model::{ProfileId, Task, TrackEvent, TrackStatus, Tracking, WorkCounters};

/// Activity state of a tracked interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkState {
    /// Actively being worked.
    Working,
    /// Paused by the assignee.
    Paused,
    /// Submitted and waiting for QA.
    InQa,
    /// QA review round in progress.
    QaReview,
    /// Blocked on something external.
    Blocked,
}

/// The still-open trailing interval of a work log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OpenInterval {
    pub state: WorkState,
    /// Unix seconds when the interval opened.
    pub since: i64,
}

/// Normalized per-profile work summary for one task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkLog {
    /// Closed working seconds.
    pub worked_seconds: i64,
    /// Closed paused seconds.
    pub paused_seconds: i64,
    /// Closed waiting-in-QA seconds.
    pub qa_seconds: i64,
    /// Closed QA review seconds across all finished rounds.
    pub qa_review_seconds: i64,
    /// Closed blocked seconds.
    pub blocked_seconds: i64,
    /// QA rounds that ended in failure.
    pub failed_qa_rounds: u32,
    /// When the profile was assigned, if known.
    pub assigned_at: i64,
    /// Timestamp of the last tracked event for the profile.
    pub last_event_at: i64,
    /// Trailing interval that has not been closed by a later event.
    pub open: Option<OpenInterval>,
    /// True iff this profile is the current, non-removed owner.
    pub current_owner: bool,
}

impl WorkLog {
    fn close(&mut self, state: WorkState, start: i64, end: i64) {
        let elapsed = (end - start).max(0);
        match state {
            WorkState::Working => self.worked_seconds += elapsed,
            WorkState::Paused => self.paused_seconds += elapsed,
            WorkState::InQa => self.qa_seconds += elapsed,
            WorkState::QaReview => self.qa_review_seconds += elapsed,
            WorkState::Blocked => self.blocked_seconds += elapsed,
        }
    }
}

/// Open-interval state implied by a task's current status flags.
///
/// Used for the counters shape, which stores totals but no interval
/// boundaries: whatever time passed since the last event belongs to the
/// state the task is in right now.
fn state_from_flags(task: &Task) -> WorkState {
    if task.qa_in_progress {
        WorkState::QaReview
    } else if task.submitted_for_qa {
        WorkState::InQa
    } else if task.blocked {
        WorkState::Blocked
    } else if task.paused {
        WorkState::Paused
    } else {
        WorkState::Working
    }
}

/// Normalize a task's tracking payload into per-profile work logs.
///
/// Tracking timestamps pass through the 10-/13-digit rule so millisecond
/// writers and second writers read the same. A task with no payload
/// yields an empty map; the performance layer synthesizes the zeroed
/// current-owner slot.
///
/// # Errors
/// Fails with a 400-class error on a timestamp of any other width.
pub fn normalize(task: &Task) -> Result<BTreeMap<ProfileId, WorkLog>, ValidationError> {
    match &task.tracking {
        None => Ok(BTreeMap::new()),
        Some(Tracking::Counters(map)) => normalize_counters(task, map),
        Some(Tracking::History(events)) => normalize_history(events),
    }
}

/// Zero means the writer never set the field; anything else must be a
/// recognizable timestamp.
fn normalize_timestamp(raw: i64) -> Result<i64, ValidationError> {
    if raw == 0 {
        return Ok(0);
    }
    parse_unix_timestamp(raw)
}

fn normalize_counters(
    task: &Task,
    counters: &BTreeMap<ProfileId, WorkCounters>,
) -> Result<BTreeMap<ProfileId, WorkLog>, ValidationError> {
    let mut out = BTreeMap::new();
    for (profile_id, c) in counters {
        let last_event_at = normalize_timestamp(c.last_event_at)?;
        let assigned_at = normalize_timestamp(c.assigned_at)?;
        let current_owner = c.removed_at.is_none();
        // Accumulation stops once the task passed QA or the assignee was
        // removed; otherwise the gap since the last event is still open.
        let open = if current_owner && !task.passed_qa {
            Some(OpenInterval {
                state: state_from_flags(task),
                since: last_event_at,
            })
        } else {
            None
        };
        out.insert(
            profile_id.clone(),
            WorkLog {
                worked_seconds: c.worked_seconds,
                paused_seconds: c.paused_seconds,
                qa_seconds: c.qa_seconds,
                qa_review_seconds: c.qa_total_seconds.unwrap_or(0),
                blocked_seconds: c.blocked_seconds,
                failed_qa_rounds: c.failed_qa_rounds,
                assigned_at,
                last_event_at,
                open,
                current_owner,
            },
        );
    }
    Ok(out)
}

fn normalize_history(
    events: &[TrackEvent],
) -> Result<BTreeMap<ProfileId, WorkLog>, ValidationError> {
    let mut out: BTreeMap<ProfileId, WorkLog> = BTreeMap::new();

    for event in events {
        let at = parse_unix_timestamp(event.timestamp)?;
        let log = out.entry(event.profile_id.clone()).or_default();
        if let Some(open) = log.open.take() {
            log.close(open.state, open.since, at);
        }
        log.last_event_at = at;

        match event.status {
            TrackStatus::Assigned | TrackStatus::Claimed => {
                log.assigned_at = at;
                log.current_owner = true;
                log.open = Some(OpenInterval {
                    state: WorkState::Working,
                    since: at,
                });
            }
            TrackStatus::Resumed | TrackStatus::Unblocked => {
                log.open = Some(OpenInterval {
                    state: WorkState::Working,
                    since: at,
                });
            }
            TrackStatus::Paused => {
                log.open = Some(OpenInterval {
                    state: WorkState::Paused,
                    since: at,
                });
            }
            TrackStatus::Blocked => {
                log.open = Some(OpenInterval {
                    state: WorkState::Blocked,
                    since: at,
                });
            }
            TrackStatus::SubmittedForQa => {
                log.open = Some(OpenInterval {
                    state: WorkState::InQa,
                    since: at,
                });
            }
            TrackStatus::QaInProgress => {
                log.open = Some(OpenInterval {
                    state: WorkState::QaReview,
                    since: at,
                });
            }
            TrackStatus::QaFailed => {
                log.failed_qa_rounds += 1;
                // A failed round hands the task back to the assignee.
                log.open = Some(OpenInterval {
                    state: WorkState::Working,
                    since: at,
                });
            }
            TrackStatus::QaSuccess => {
                // Terminal: nothing stays open.
            }
            TrackStatus::Removed => {
                log.current_owner = false;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn event(status: TrackStatus, profile: &str, at: i64) -> TrackEvent {
        TrackEvent {
            status,
            profile_id: profile.to_string(),
            timestamp: at,
        }
    }

    fn task_with_history(events: Vec<TrackEvent>) -> Task {
        Task {
            id: "t1".into(),
            title: "task".into(),
            project_id: None,
            owner: "p1".into(),
            priority: Priority::Medium,
            due_date: 1_500_000_000,
            estimated_hours: 1.0,
            skillset: Default::default(),
            paused: false,
            blocked: false,
            submitted_for_qa: false,
            qa_in_progress: false,
            passed_qa: false,
            ready: true,
            no_payout: false,
            time_finished: None,
            tracking: Some(Tracking::History(events)),
        }
    }

    #[test]
    fn empty_payload_yields_empty_map() {
        let mut task = task_with_history(vec![]);
        task.tracking = None;
        assert!(normalize(&task).unwrap().is_empty());
    }

    #[test]
    fn assignment_opens_working_interval() {
        let t0 = 1_500_000_000;
        let task = task_with_history(vec![event(TrackStatus::Assigned, "p1", t0)]);
        let logs = normalize(&task).unwrap();
        let log = &logs["p1"];
        assert!(log.current_owner);
        assert_eq!(log.assigned_at, t0);
        let open = log.open.unwrap();
        assert_eq!(open.state, WorkState::Working);
        assert_eq!(open.since, t0);
        assert_eq!(log.worked_seconds, 0);
    }

    #[test]
    fn pause_closes_working_interval() {
        let t0 = 1_500_000_000;
        let task = task_with_history(vec![
            event(TrackStatus::Assigned, "p1", t0),
            event(TrackStatus::Paused, "p1", t0 + 600),
            event(TrackStatus::Resumed, "p1", t0 + 900),
        ]);
        let log = &normalize(&task).unwrap()["p1"];
        assert_eq!(log.worked_seconds, 600);
        assert_eq!(log.paused_seconds, 300);
        assert_eq!(log.open.unwrap().state, WorkState::Working);
    }

    #[test]
    fn qa_round_lifecycle() {
        let t0 = 1_500_000_000;
        let task = task_with_history(vec![
            event(TrackStatus::Assigned, "p1", t0),
            event(TrackStatus::SubmittedForQa, "p1", t0 + 3600),
            event(TrackStatus::QaInProgress, "p1", t0 + 4000),
            event(TrackStatus::QaFailed, "p1", t0 + 4500),
            event(TrackStatus::SubmittedForQa, "p1", t0 + 5000),
            event(TrackStatus::QaInProgress, "p1", t0 + 5200),
            event(TrackStatus::QaSuccess, "p1", t0 + 5500),
        ]);
        let log = &normalize(&task).unwrap()["p1"];
        assert_eq!(log.worked_seconds, 3600 + 500);
        assert_eq!(log.qa_seconds, 400 + 200);
        assert_eq!(log.qa_review_seconds, 500 + 300);
        assert_eq!(log.failed_qa_rounds, 1);
        assert!(log.open.is_none());
    }

    #[test]
    fn removed_profile_keeps_seconds_but_loses_ownership() {
        let t0 = 1_500_000_000;
        let task = task_with_history(vec![
            event(TrackStatus::Assigned, "p1", t0),
            event(TrackStatus::Removed, "p1", t0 + 1200),
            event(TrackStatus::Assigned, "p2", t0 + 1300),
        ]);
        let logs = normalize(&task).unwrap();
        assert!(!logs["p1"].current_owner);
        assert_eq!(logs["p1"].worked_seconds, 1200);
        assert!(logs["p2"].current_owner);
    }

    #[test]
    fn counters_shape_passes_totals_through() {
        let mut counters = BTreeMap::new();
        counters.insert(
            "p1".to_string(),
            WorkCounters {
                worked_seconds: 300,
                paused_seconds: 60,
                qa_seconds: 30,
                blocked_seconds: 0,
                last_event_at: 1_500_000_000,
                assigned_at: 1_499_999_000,
                qa_total_seconds: Some(1800),
                failed_qa_rounds: 2,
                removed_at: None,
            },
        );
        let mut task = task_with_history(vec![]);
        task.tracking = Some(Tracking::Counters(counters));
        let log = &normalize(&task).unwrap()["p1"];
        assert_eq!(log.worked_seconds, 300);
        assert_eq!(log.qa_review_seconds, 1800);
        assert_eq!(log.failed_qa_rounds, 2);
        assert_eq!(log.open.unwrap().state, WorkState::Working);
    }

    #[test]
    fn counters_open_state_follows_task_flags() {
        let mut counters = BTreeMap::new();
        counters.insert("p1".to_string(), WorkCounters::default());
        let mut task = task_with_history(vec![]);
        task.qa_in_progress = true;
        task.tracking = Some(Tracking::Counters(counters));
        assert_eq!(normalize(&task).unwrap()["p1"].open.unwrap().state, WorkState::QaReview);
    }

    #[test]
    fn counters_removed_marker_closes_everything() {
        let mut counters = BTreeMap::new();
        counters.insert(
            "p1".to_string(),
            WorkCounters {
                worked_seconds: 500,
                removed_at: Some(1_500_000_000),
                ..Default::default()
            },
        );
        let mut task = task_with_history(vec![]);
        task.tracking = Some(Tracking::Counters(counters));
        let log = &normalize(&task).unwrap()["p1"];
        assert!(!log.current_owner);
        assert!(log.open.is_none());
    }

    #[test]
    fn millisecond_event_timestamps_are_normalized() {
        let t0 = 1_500_000_000;
        let task = task_with_history(vec![event(TrackStatus::Assigned, "p1", (t0 - 300) * 1000)]);
        let log = &normalize(&task).unwrap()["p1"];
        assert_eq!(log.assigned_at, t0 - 300);
        assert_eq!(log.open.unwrap().since, t0 - 300);
    }

    #[test]
    fn unrecognized_timestamp_width_is_rejected() {
        let task = task_with_history(vec![event(TrackStatus::Assigned, "p1", 1_500_000)]);
        assert!(matches!(
            normalize(&task),
            Err(ValidationError::BadTimestamp(_))
        ));
    }

    #[test]
    fn millisecond_counter_fields_are_normalized() {
        let mut counters = BTreeMap::new();
        counters.insert(
            "p1".to_string(),
            WorkCounters {
                last_event_at: 1_500_000_000_000,
                assigned_at: 1_499_999_000_000,
                ..Default::default()
            },
        );
        let mut task = task_with_history(vec![]);
        task.tracking = Some(Tracking::Counters(counters));
        let log = &normalize(&task).unwrap()["p1"];
        assert_eq!(log.assigned_at, 1_499_999_000);
        assert_eq!(log.open.unwrap().since, 1_500_000_000);
    }
}
