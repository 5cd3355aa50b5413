//! TOML-based engine configuration.
//!
//! Holds the hourly-rate table and role minimum-earning table. The file
//! is the operator-edited source; `seed_database` copies it into the
//! tables that aggregation reads.
//!
//! Stored at `~/.config/worktrack/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::model::{HourlyRateTable, RoleMinimumConfig};
use crate::storage::{data_dir, Database};

/// Engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Skill name to hourly rate.
    #[serde(default)]
    pub rates: HourlyRateTable,
    /// Employee role to required minimum monthly earning.
    #[serde(default)]
    pub minimums: RoleMinimumConfig,
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/worktrack"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Copy rates and minimums into the database tables aggregation reads.
    pub fn seed_database(&self, db: &Database) -> Result<()> {
        for (skill, rate) in &self.rates.rates {
            db.set_hourly_rate(skill, *rate)?;
        }
        for (role, minimum) in &self.minimums.minimums {
            db.set_role_minimum(role, *minimum)?;
        }
        Ok(())
    }
}
