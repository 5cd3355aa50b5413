//! Range aggregation over the XP ledger and touched tasks.
//!
//! Builds the per-profile performance report consumed by reporting and
//! notification collaborators: ledger XP delta, payout/hour totals for
//! tasks the profile touched inside the window, and the pro-rated role
//! minimum.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ValidationError};
use crate::input::round2;
use crate::model::Profile;
use crate::payout::task_values;
use crate::storage::Database;
use crate::workdays::role_minimum;
use crate::worklog;

/// Validated inclusive aggregation window in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: i64,
    end: i64,
}

impl TimeRange {
    /// # Errors
    /// Fails with a 400-class error when the bounds are inverted.
    pub fn new(start: i64, end: i64) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range from loosely-typed JSON bounds.
    ///
    /// Both bounds must already be integers; numeric strings are rejected
    /// rather than coerced.
    pub fn from_json(start: &Value, end: &Value) -> Result<Self, ValidationError> {
        let (Some(start), Some(end)) = (start.as_i64(), end.as_i64()) else {
            return Err(ValidationError::NonIntegerRange);
        };
        Self::new(start, end)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, unix: i64) -> bool {
        self.start <= unix && unix <= self.end
    }
}

/// Aggregated performance facts for one profile over one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Sum of ledger entries inside the window.
    pub xp_diff: f64,
    /// Profile-adjusted estimated hours of touched tasks.
    pub estimated_hours: f64,
    /// Profile-adjusted hours of tasks actually delivered.
    pub hours_delivered: f64,
    /// Would-be payout of all touched billable tasks.
    pub total_payout_external: f64,
    /// Payout of delivered billable tasks.
    pub real_payout_external: f64,
    /// Would-be value of all touched non-billable tasks.
    pub total_payout_internal: f64,
    /// Value of delivered non-billable tasks.
    pub real_payout_internal: f64,
    /// Delivered external plus internal value.
    pub real_payout_combined: f64,
    /// Hours spent in QA review rounds.
    pub hours_doing_qa: f64,
    /// Pro-rated minimum for the month of the range start.
    pub role_minimum: f64,
}

/// Aggregate a profile's performance over an inclusive time range.
///
/// Touched tasks are those where the profile's last tracked event falls
/// inside the window.
pub fn aggregate_for_time_range(
    db: &Database,
    profile: &Profile,
    range: TimeRange,
) -> Result<PerformanceReport> {
    let mut report = PerformanceReport::default();

    for entry in db.xp_entries_in_range(&profile.id, range.start, range.end)? {
        report.xp_diff += entry.xp;
    }
    report.xp_diff = round2(report.xp_diff);

    let rates = db.hourly_rates()?;

    for task in db.tasks()? {
        let logs = worklog::normalize(&task)?;
        let Some(log) = logs.get(&profile.id) else {
            continue;
        };
        if !range.contains(log.last_event_at) {
            continue;
        }

        let values = task_values(profile, &task, &rates);
        // Non-billable work is valued at the rate it would have earned.
        let internal_value = if task.no_payout {
            values.hourly_rate * task.estimated_hours
        } else {
            0.0
        };

        report.estimated_hours += values.estimate;
        if task.no_payout {
            report.total_payout_internal += internal_value;
        } else {
            report.total_payout_external += values.payout;
        }

        if task.passed_qa {
            report.hours_delivered += values.estimate;
            if task.no_payout {
                report.real_payout_internal += internal_value;
            } else {
                report.real_payout_external += values.payout;
            }
        }

        let qa_review_seconds = log.qa_review_seconds;
        report.hours_doing_qa += qa_review_seconds as f64 / 3600.0;
    }

    report.estimated_hours = round2(report.estimated_hours);
    report.hours_delivered = round2(report.hours_delivered);
    report.total_payout_external = round2(report.total_payout_external);
    report.real_payout_external = round2(report.real_payout_external);
    report.total_payout_internal = round2(report.total_payout_internal);
    report.real_payout_internal = round2(report.real_payout_internal);
    report.real_payout_combined =
        round2(report.real_payout_external + report.real_payout_internal);
    report.hours_doing_qa = round2(report.hours_doing_qa);

    let base = db.role_minimums()?.base_minimum(&profile.employee_role);
    let vacations = db.vacations(&profile.id)?;
    report.role_minimum = role_minimum(base, &vacations, range.start);

    Ok(report)
}

/// Outcome of a monthly minimum-earning check for one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumOutcome {
    pub profile_id: String,
    pub name: String,
    pub required_minimum: f64,
    pub real_payout_combined: f64,
    /// How far below target the profile landed.
    pub missed_by: f64,
    /// Lifetime count after this check.
    pub minimums_missed: u32,
}

/// Prior-month minimum compliance check across all employee profiles.
///
/// Compares each employee's delivered value against the un-pro-rated base
/// minimum for their role, bumps `minimums_missed` on the stored profile,
/// and returns the under-target outcomes for the notification layer.
pub fn monthly_minimum_check(db: &Database, now: i64) -> Result<Vec<MinimumOutcome>> {
    let (start, end) = previous_month_bounds(now);
    let range = TimeRange::new(start, end).map_err(crate::error::CoreError::Validation)?;
    let minimums = db.role_minimums()?;

    let mut outcomes = Vec::new();
    for mut profile in db.profiles()? {
        if !profile.employee {
            continue;
        }

        let report = aggregate_for_time_range(db, &profile, range)?;
        let required = minimums.base_minimum(&profile.employee_role);
        if report.real_payout_combined >= required {
            continue;
        }

        profile.minimums_missed += 1;
        db.upsert_profile(&profile)?;

        outcomes.push(MinimumOutcome {
            profile_id: profile.id.clone(),
            name: profile.name.clone(),
            required_minimum: required,
            real_payout_combined: report.real_payout_combined,
            missed_by: round2(required - report.real_payout_combined),
            minimums_missed: profile.minimums_missed,
        });
    }
    Ok(outcomes)
}

/// First and last second of the calendar month before the one containing
/// `now`.
fn previous_month_bounds(now: i64) -> (i64, i64) {
    let today = DateTime::<Utc>::from_timestamp(now, 0)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
        .date_naive();
    let first_of_this = today.with_day(1).unwrap_or(today);
    let last_of_prev = first_of_this - Duration::days(1);
    let first_of_prev = last_of_prev.with_day(1).unwrap_or(last_of_prev);

    let start = first_of_prev.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
    let end = last_of_prev.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc().timestamp());
    (start.unwrap_or(0), end.unwrap_or(0))
}

/// Work-day date helper used by reporting callers.
pub fn date_of(unix: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(unix, 0).map(|dt| dt.date_naive())
}
