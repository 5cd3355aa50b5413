//! Rate and minimum-earning configuration tables.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Singleton table mapping skill name to hourly rate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlyRateTable {
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl HourlyRateTable {
    /// Arithmetic mean of the rates for skills present in both the given
    /// skillset and this table. Skills without a rate are ignored; an
    /// empty intersection yields 0.
    pub fn mean_rate(&self, skillset: &BTreeSet<String>) -> f64 {
        let matched: Vec<f64> = skillset
            .iter()
            .filter_map(|skill| self.rates.get(skill).copied())
            .collect();
        if matched.is_empty() {
            return 0.0;
        }
        matched.iter().sum::<f64>() / matched.len() as f64
    }
}

/// Mapping from employee role to required minimum monthly earning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleMinimumConfig {
    #[serde(default)]
    pub minimums: BTreeMap<String, f64>,
}

impl RoleMinimumConfig {
    /// Base minimum for a role; unknown roles owe nothing.
    pub fn base_minimum(&self, role: &str) -> f64 {
        self.minimums.get(role).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, f64)]) -> HourlyRateTable {
        HourlyRateTable {
            rates: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn skills(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_matching_skill() {
        let t = table(&[("PHP", 500.0), ("React", 500.0)]);
        assert_eq!(t.mean_rate(&skills(&["PHP"])), 500.0);
    }

    #[test]
    fn mean_over_matched_skills() {
        let t = table(&[("PHP", 240.0), ("React", 380.0), ("Node", 500.0)]);
        let rate = t.mean_rate(&skills(&["PHP", "React", "Node"]));
        assert!((rate - (240.0 + 380.0 + 500.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unmatched_skills_ignored() {
        let t = table(&[("PHP", 500.0)]);
        assert_eq!(t.mean_rate(&skills(&["PHP", "Basketweaving"])), 500.0);
    }

    #[test]
    fn empty_intersection_is_zero() {
        let t = table(&[("PHP", 500.0)]);
        assert_eq!(t.mean_rate(&skills(&["Basketweaving"])), 0.0);
        assert_eq!(t.mean_rate(&skills(&[])), 0.0);
    }

    #[test]
    fn unknown_role_has_no_minimum() {
        let m = RoleMinimumConfig::default();
        assert_eq!(m.base_minimum("Apprentice"), 0.0);
    }
}
