//! Worker and project records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ProfileId;

/// Worker/admin record.
///
/// `xp` is adjusted only through ledger deltas; the running total and the
/// ledger must never diverge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub xp: f64,
    #[serde(default)]
    pub employee_role: String,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub slack: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub employee: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Monthly minimum-earning checks the profile has failed.
    #[serde(default)]
    pub minimums_missed: u32,
    /// Back-reference to the profile's XP ledger, created lazily.
    #[serde(default)]
    pub ledger_id: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Project membership record, read-only to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Profile id of the project owner (reviews delivered tasks).
    #[serde(default)]
    pub owner: ProfileId,
    #[serde(default)]
    pub members: Vec<ProfileId>,
}

/// One approved leave range for a profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VacationRecord {
    /// Unix timestamp of the first day of leave.
    pub date_from: i64,
    /// Unix timestamp of the last day of leave.
    pub date_to: i64,
}
