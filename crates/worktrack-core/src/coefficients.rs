//! Incentive coefficients scaling delivery XP.

use serde::{Deserialize, Serialize};

use crate::input::round2;
use crate::model::{Priority, Profile, Task};

/// Open QA review time beyond which the reviewer is judged late.
pub const REVIEW_DEADLINE_SECONDS: i64 = 30 * 60;

/// XP deducted from a reviewer who missed the deadline.
pub const REVIEW_LATE_XP: f64 = -3.0;

/// XP awarded to a reviewer who closed the round in time.
pub const REVIEW_ON_TIME_XP: f64 = 0.25;

/// Ratio of worked seconds to estimated seconds.
///
/// An estimate of zero is treated as one second so the ratio stays finite.
pub fn speed_coefficient(work_seconds: i64, estimated_hours: f64) -> f64 {
    work_seconds as f64 / (estimated_hours * 3600.0).max(1.0)
}

/// Outcome of the banded delivery rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "xp_diff")]
pub enum DeliveryVerdict {
    /// Finished well under estimate; rewarded.
    Early(f64),
    /// Within the neutral band; no XP change.
    OnTime,
    /// Over estimate; fixed deduction by band.
    Late(f64),
}

impl DeliveryVerdict {
    pub fn xp_diff(&self) -> f64 {
        match self {
            DeliveryVerdict::Early(xp) | DeliveryVerdict::Late(xp) => *xp,
            DeliveryVerdict::OnTime => 0.0,
        }
    }
}

/// Evaluate the delivery rule for a completed task.
///
/// Bands over the speed coefficient:
/// below 0.75 the reward is `task_xp x (1 - speed) x priority_coefficient`;
/// 0.75 to 1.0 is neutral; above that, fixed deductions of -1, -2 and -3
/// at the 1.1 and 1.25 boundaries.
pub fn delivery_verdict(speed: f64, task_xp: f64, priority_coefficient: f64) -> DeliveryVerdict {
    if speed < 0.75 {
        let duration_coefficient = 1.0 - speed;
        DeliveryVerdict::Early(round2(task_xp * duration_coefficient * priority_coefficient))
    } else if speed <= 1.0 {
        DeliveryVerdict::OnTime
    } else if speed <= 1.1 {
        DeliveryVerdict::Late(-1.0)
    } else if speed <= 1.25 {
        DeliveryVerdict::Late(-2.0)
    } else {
        DeliveryVerdict::Late(-3.0)
    }
}

/// Priority-scarcity coefficient.
///
/// Scans the profile's claimable unassigned sibling tasks (skill overlap
/// required) and discounts the delivered task's XP when higher-priority
/// work sat unclaimed: 0.5 for a Low task next to Medium/High work, 0.8
/// for a Medium task next to High work, 1.0 otherwise.
pub fn priority_coefficient(profile: &Profile, task: &Task, candidates: &[Task]) -> f64 {
    let highest_claimable = candidates
        .iter()
        .filter(|t| t.id != task.id && t.is_unassigned())
        .filter(|t| t.skillset.iter().any(|s| profile.skills.contains(s)))
        .map(|t| t.priority)
        .max();

    match (task.priority, highest_claimable) {
        (Priority::Low, Some(p)) if p >= Priority::Medium => 0.5,
        (Priority::Medium, Some(Priority::High)) => 0.8,
        _ => 1.0,
    }
}

/// Reviewer verdict: XP delta for the project owner based on how long the
/// current QA review round has been open.
pub fn reviewer_xp(qa_progress_seconds: i64) -> f64 {
    if qa_progress_seconds > REVIEW_DEADLINE_SECONDS {
        REVIEW_LATE_XP
    } else {
        REVIEW_ON_TIME_XP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn profile_with_skills(skills: &[&str]) -> Profile {
        Profile {
            id: "p1".into(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn unassigned(id: &str, priority: Priority, skills: &[&str]) -> Task {
        Task {
            id: id.into(),
            title: id.into(),
            project_id: Some("proj".into()),
            owner: String::new(),
            priority,
            due_date: 1_500_000_000,
            estimated_hours: 1.0,
            skillset: skills.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
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

    #[test]
    fn speed_is_worked_over_estimated() {
        assert!((speed_coefficient(3600, 2.0) - 0.5).abs() < 1e-9);
        assert!((speed_coefficient(7200, 1.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_estimate_does_not_divide_by_zero() {
        assert_eq!(speed_coefficient(10, 0.0), 10.0);
    }

    #[test]
    fn delivery_bands() {
        assert_eq!(delivery_verdict(0.9, 4.0, 1.0), DeliveryVerdict::OnTime);
        assert_eq!(delivery_verdict(1.0, 4.0, 1.0), DeliveryVerdict::OnTime);
        assert_eq!(delivery_verdict(1.05, 4.0, 1.0), DeliveryVerdict::Late(-1.0));
        assert_eq!(delivery_verdict(1.2, 4.0, 1.0), DeliveryVerdict::Late(-2.0));
        assert_eq!(delivery_verdict(2.0, 4.0, 1.0), DeliveryVerdict::Late(-3.0));
    }

    #[test]
    fn early_delivery_scales_with_time_saved() {
        let verdict = delivery_verdict(0.5, 4.0, 1.0);
        assert_eq!(verdict, DeliveryVerdict::Early(2.0));
        let discounted = delivery_verdict(0.5, 4.0, 0.5);
        assert_eq!(discounted, DeliveryVerdict::Early(1.0));
    }

    #[test]
    fn no_claimable_higher_priority_work_means_no_discount() {
        let profile = profile_with_skills(&["PHP"]);
        let low = unassigned("low", Priority::Low, &["PHP", "Planning", "React"]);
        let candidates = vec![
            low.clone(),
            unassigned("med", Priority::Medium, &["React", "DevOps"]),
            unassigned("high", Priority::High, &["React", "DevOps"]),
        ];
        assert_eq!(priority_coefficient(&profile, &low, &candidates), 1.0);
    }

    #[test]
    fn low_task_next_to_claimable_medium_is_halved() {
        let profile = profile_with_skills(&["PHP"]);
        let low = unassigned("low", Priority::Low, &["PHP", "Planning", "React"]);
        let candidates = vec![
            low.clone(),
            unassigned("med", Priority::Medium, &["PHP", "Planning", "React"]),
            unassigned("high", Priority::High, &["React", "DevOps"]),
        ];
        assert_eq!(priority_coefficient(&profile, &low, &candidates), 0.5);
    }

    #[test]
    fn medium_task_next_to_claimable_high_is_discounted() {
        let profile = profile_with_skills(&["PHP"]);
        let medium = unassigned("med", Priority::Medium, &["React", "DevOps"]);
        let candidates = vec![
            unassigned("low", Priority::Low, &["React", "DevOps"]),
            medium.clone(),
            unassigned("high", Priority::High, &["PHP", "Planning", "React"]),
        ];
        assert_eq!(priority_coefficient(&profile, &medium, &candidates), 0.8);
    }

    #[test]
    fn assigned_siblings_are_ignored() {
        let profile = profile_with_skills(&["PHP"]);
        let low = unassigned("low", Priority::Low, &["PHP"]);
        let mut high = unassigned("high", Priority::High, &["PHP"]);
        high.owner = "someone".into();
        assert_eq!(priority_coefficient(&profile, &low, &[low.clone(), high]), 1.0);
    }

    #[test]
    fn reviewer_deadline() {
        assert_eq!(reviewer_xp(1800), REVIEW_ON_TIME_XP);
        assert_eq!(reviewer_xp(1801), REVIEW_LATE_XP);
    }
}
