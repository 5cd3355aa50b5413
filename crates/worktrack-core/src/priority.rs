//! Due-date priority escalation for unassigned tasks.
//!
//! Tasks due inside seven days are bumped to High; tasks due in seven to
//! fourteen days are bumped from Low to Medium. Escalation never lowers a
//! priority and never touches assigned tasks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::input::parse_unix_timestamp;
use crate::model::{Priority, Task};

const SEVEN_DAYS: i64 = 7 * 24 * 60 * 60;
const FOURTEEN_DAYS: i64 = 14 * 24 * 60 * 60;

/// Per-project escalation counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BumpCounts {
    pub to_high: u32,
    pub to_medium: u32,
}

/// Escalate priorities in place; returns bump counts keyed by project id.
///
/// # Errors
/// Fails on a malformed due-date timestamp.
pub fn escalate_priorities(
    tasks: &mut [Task],
    now: i64,
) -> Result<BTreeMap<String, BumpCounts>, ValidationError> {
    let mut bumped: BTreeMap<String, BumpCounts> = BTreeMap::new();

    for task in tasks.iter_mut() {
        if !task.is_unassigned() {
            continue;
        }
        let due = parse_unix_timestamp(task.due_date)?;
        let project = task.project_id.clone().unwrap_or_default();

        if due >= now && due <= now + SEVEN_DAYS && task.priority != Priority::High {
            task.priority = Priority::High;
            bumped.entry(project).or_default().to_high += 1;
        } else if due > now + SEVEN_DAYS
            && due <= now + FOURTEEN_DAYS
            && task.priority == Priority::Low
        {
            task.priority = Priority::Medium;
            bumped.entry(project).or_default().to_medium += 1;
        }
    }

    Ok(bumped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, owner: &str, priority: Priority, due: i64) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            project_id: Some("proj".into()),
            owner: owner.into(),
            priority,
            due_date: due,
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
            tracking: None,
        }
    }

    const NOW: i64 = 1_500_000_000;

    #[test]
    fn due_within_seven_days_goes_high() {
        let mut tasks = vec![task("t1", "", Priority::Low, NOW + 3 * 86_400)];
        let bumps = escalate_priorities(&mut tasks, NOW).unwrap();
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(bumps["proj"].to_high, 1);
    }

    #[test]
    fn due_within_fourteen_days_goes_medium() {
        let mut tasks = vec![task("t1", "", Priority::Low, NOW + 10 * 86_400)];
        let bumps = escalate_priorities(&mut tasks, NOW).unwrap();
        assert_eq!(tasks[0].priority, Priority::Medium);
        assert_eq!(bumps["proj"].to_medium, 1);
    }

    #[test]
    fn never_downgrades() {
        let mut tasks = vec![task("t1", "", Priority::High, NOW + 10 * 86_400)];
        let bumps = escalate_priorities(&mut tasks, NOW).unwrap();
        assert_eq!(tasks[0].priority, Priority::High);
        assert!(bumps.is_empty());
    }

    #[test]
    fn assigned_tasks_untouched() {
        let mut tasks = vec![task("t1", "someone", Priority::Low, NOW + 3 * 86_400)];
        escalate_priorities(&mut tasks, NOW).unwrap();
        assert_eq!(tasks[0].priority, Priority::Low);
    }

    #[test]
    fn overdue_tasks_untouched() {
        let mut tasks = vec![task("t1", "", Priority::Low, NOW - 86_400)];
        escalate_priorities(&mut tasks, NOW).unwrap();
        assert_eq!(tasks[0].priority, Priority::Low);
    }

    #[test]
    fn millisecond_due_dates_accepted() {
        let mut tasks = vec![task("t1", "", Priority::Low, (NOW + 3 * 86_400) * 1000)];
        escalate_priorities(&mut tasks, NOW).unwrap();
        assert_eq!(tasks[0].priority, Priority::High);
    }
}
