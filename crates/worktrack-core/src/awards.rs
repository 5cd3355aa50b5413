//! Delivery XP workflow.
//!
//! Runs when a task update flips `passed_qa` to true and turns the task's
//! performance facts into signed XP awards for the task owner and the
//! reviewing project owner. The caller persists the awards through
//! [`Database::append_xp`]; invoking this against an update whose dirty
//! delta does not contain the flip is a no-op, so a retried update cannot
//! double-apply ledger entries.
//!
//! Performance facts should be computed on the task view that triggered
//! the update, before the now-closed QA interval is lost.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coefficients::{
    delivery_verdict, priority_coefficient, reviewer_xp, speed_coefficient, DeliveryVerdict,
    REVIEW_DEADLINE_SECONDS,
};
use crate::error::Result;
use crate::model::{Profile, ProfileId, Project, Task, TaskChanges};
use crate::payout::TaskValues;
use crate::performance::TaskPerformance;
use crate::storage::Database;

/// One signed XP adjustment produced by the delivery workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpAward {
    pub profile_id: ProfileId,
    pub xp: f64,
    pub details: String,
}

/// Compute XP awards for a task that just passed QA.
///
/// Returns an empty list unless `changes` carries the `passed_qa` flip.
/// The owner's award follows the banded delivery rule scaled by the
/// priority-scarcity coefficient; the project owner's award follows the
/// review deadline. A neutral owner verdict produces no entry.
pub fn delivery_awards(
    task: &Task,
    changes: &TaskChanges,
    owner: &Profile,
    values: &TaskValues,
    performance: &BTreeMap<ProfileId, TaskPerformance>,
    project: Option<&Project>,
    sibling_tasks: &[Task],
) -> Vec<XpAward> {
    if !changes.qa_just_passed() {
        return Vec::new();
    }

    let Some(perf) = performance.values().find(|p| p.task_last_owner) else {
        return Vec::new();
    };

    let mut awards = Vec::new();

    let speed = speed_coefficient(perf.work_seconds, task.estimated_hours);
    let coefficient = priority_coefficient(owner, task, sibling_tasks);
    let verdict = delivery_verdict(speed, values.active_xp, coefficient);

    match verdict {
        DeliveryVerdict::Early(xp) if xp != 0.0 => awards.push(XpAward {
            profile_id: owner.id.clone(),
            xp,
            details: format!("Task delivered ahead of estimate: {}", task.title),
        }),
        DeliveryVerdict::Late(xp) => awards.push(XpAward {
            profile_id: owner.id.clone(),
            xp,
            details: format!("Late task delivery: {}", task.title),
        }),
        _ => {}
    }

    if let Some(project) = project {
        if !project.owner.is_empty() && project.owner != owner.id {
            let xp = reviewer_xp(perf.qa_progress_seconds);
            let details = if perf.qa_progress_seconds > REVIEW_DEADLINE_SECONDS {
                format!("Failed to review in time: {}", task.title)
            } else {
                format!("Review completed in time: {}", task.title)
            };
            awards.push(XpAward {
                profile_id: project.owner.clone(),
                xp,
                details,
            });
        }
    }

    awards
}

/// Persist a batch of awards through the ledger, all stamped at `now_ms`.
pub fn apply_awards(db: &mut Database, awards: &[XpAward], now_ms: i64) -> Result<()> {
    for award in awards {
        db.append_xp(&award.profile_id, award.xp, &award.details, now_ms)?;
    }
    Ok(())
}
