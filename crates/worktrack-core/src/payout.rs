//! Payout and XP value resolution for a task.
//!
//! Combines a task's skillset with the hourly-rate table and the owning
//! profile's seniority into the monetary payout, the profile-facing
//! estimate, and the XP quantities used by the delivery workflow.

use serde::{Deserialize, Serialize};

use crate::input::round2;
use crate::model::{HourlyRateTable, Priority, Profile, Task};

/// Cumulative XP above which incentive growth flattens: tasks are worth a
/// flat nominal XP and the workload factor no longer applies.
pub const SENIOR_XP_THRESHOLD: f64 = 200.0;

/// Flat per-task XP for profiles past the threshold.
pub const SENIOR_FLAT_XP: f64 = 1.0;

/// Profile-facing estimate multiplier for profiles at or below the
/// threshold.
const JUNIOR_WORKLOAD_FACTOR: f64 = 5.0;

/// Monetary and XP values of one task for one profile.
///
/// `base_xp` is the computed task value; `active_xp` is the doubled figure
/// actually written to the ledger. They are deliberately kept as two named
/// quantities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskValues {
    /// Mean hourly rate over the skills priced in the rate table.
    pub hourly_rate: f64,
    /// `hourly_rate x estimated_hours`, zero when the task is non-paying.
    pub payout: f64,
    /// Estimate adjusted by the profile's workload factor.
    pub estimate: f64,
    pub base_xp: f64,
    pub active_xp: f64,
    /// Half of `base_xp`, reported alongside the payout figures.
    pub xp_deduction: f64,
}

fn priority_weight(priority: Priority) -> f64 {
    match priority {
        Priority::Low => 1.0,
        Priority::Medium => 1.5,
        Priority::High => 2.0,
    }
}

/// Workload factor by seniority: juniors get a padded profile-facing
/// estimate, seniors the raw one.
pub fn workload_factor(profile_xp: f64) -> f64 {
    if profile_xp <= SENIOR_XP_THRESHOLD {
        JUNIOR_WORKLOAD_FACTOR
    } else {
        1.0
    }
}

/// Resolve the task's values for the given profile.
///
/// All outputs are rounded to 2 decimals, half away from zero.
pub fn task_values(profile: &Profile, task: &Task, rates: &HourlyRateTable) -> TaskValues {
    let hourly_rate = rates.mean_rate(&task.skillset);

    let payout = if task.no_payout {
        0.0
    } else {
        hourly_rate * task.estimated_hours
    };

    let estimate = task.estimated_hours * workload_factor(profile.xp);

    let base_xp = if profile.xp > SENIOR_XP_THRESHOLD {
        SENIOR_FLAT_XP
    } else {
        task.estimated_hours * priority_weight(task.priority)
    };

    TaskValues {
        hourly_rate: round2(hourly_rate),
        payout: round2(payout),
        estimate: round2(estimate),
        base_xp: round2(base_xp),
        active_xp: round2(base_xp * 2.0),
        xp_deduction: round2(base_xp / 2.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rates_500() -> HourlyRateTable {
        let mut rates = BTreeMap::new();
        for skill in ["PHP", "React", "DevOps", "Node", "Planning", "Management"] {
            rates.insert(skill.to_string(), 500.0);
        }
        HourlyRateTable { rates }
    }

    fn profile(xp: f64) -> Profile {
        Profile {
            id: "p1".into(),
            xp,
            ..Default::default()
        }
    }

    fn task(skills: &[&str], hours: f64) -> Task {
        Task {
            id: "t1".into(),
            title: "task".into(),
            project_id: None,
            owner: "p1".into(),
            priority: Priority::Medium,
            due_date: 1_500_000_000,
            estimated_hours: hours,
            skillset: skills.iter().map(|s| s.to_string()).collect(),
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
    fn payout_from_single_skill() {
        let values = task_values(&profile(200.0), &task(&["PHP"], 2.0), &rates_500());
        assert_eq!(values.hourly_rate, 500.0);
        assert_eq!(values.payout, 1000.0);
    }

    #[test]
    fn payout_averages_mixed_rates() {
        let mut rates = rates_500();
        rates.rates.insert("PHP".into(), 240.0);
        rates.rates.insert("React".into(), 380.0);
        let values = task_values(&profile(200.0), &task(&["PHP", "Node", "React"], 3.0), &rates);
        let mean = (240.0 + 500.0 + 380.0) / 3.0;
        assert_eq!(values.hourly_rate, crate::input::round2(mean));
        assert_eq!(values.payout, crate::input::round2(mean * 3.0));
    }

    #[test]
    fn empty_skillset_pays_nothing() {
        let values = task_values(&profile(200.0), &task(&[], 3.0), &rates_500());
        assert_eq!(values.hourly_rate, 0.0);
        assert_eq!(values.payout, 0.0);
    }

    #[test]
    fn no_payout_flag_wins() {
        let mut t = task(&["PHP"], 3.0);
        t.no_payout = true;
        let values = task_values(&profile(200.0), &t, &rates_500());
        assert_eq!(values.payout, 0.0);
        assert!(values.hourly_rate > 0.0);
    }

    #[test]
    fn junior_estimate_is_padded() {
        let values = task_values(&profile(200.0), &task(&["PHP"], 1.0), &rates_500());
        assert_eq!(values.estimate, 5.0);
    }

    #[test]
    fn senior_estimate_is_raw() {
        let values = task_values(&profile(201.0), &task(&["PHP"], 1.0), &rates_500());
        assert_eq!(values.estimate, 1.0);
    }

    #[test]
    fn senior_xp_flattens_to_nominal() {
        let values = task_values(&profile(350.0), &task(&["PHP"], 8.0), &rates_500());
        assert_eq!(values.base_xp, SENIOR_FLAT_XP);
        assert_eq!(values.active_xp, SENIOR_FLAT_XP * 2.0);
    }

    #[test]
    fn junior_xp_scales_with_hours_and_priority() {
        let mut t = task(&["PHP"], 2.0);
        t.priority = Priority::High;
        let values = task_values(&profile(50.0), &t, &rates_500());
        assert_eq!(values.base_xp, 4.0);
        assert_eq!(values.active_xp, 8.0);
        assert_eq!(values.xp_deduction, 2.0);
    }
}
