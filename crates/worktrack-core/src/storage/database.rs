//! SQLite-backed persistence for engine records.
//!
//! Tasks, profiles and projects arrive from the surrounding CRUD layer as
//! documents, so they are stored as JSON payload columns with indexed
//! identity columns. XP ledger entries, rate tables, minimums and
//! vacations get typed columns.
//!
//! The one genuinely shared mutable resource is a profile's ledger plus
//! its running `xp` counter; `append_xp` wraps both writes in a single
//! transaction so concurrent XP events serialize per profile.

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::data_dir;
use crate::error::{CoreError, DatabaseError, Result};
use crate::model::{
    HourlyRateTable, Profile, Project, RoleMinimumConfig, Task, VacationRecord, XpEntry,
};

/// SQLite database holding engine records.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/worktrack/worktrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()
            .map_err(|e| CoreError::Custom(e.to_string()))?
            .join("worktrack.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &std::path::Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and dry runs).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS profiles (
                    id      TEXT PRIMARY KEY,
                    payload TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS tasks (
                    id         TEXT PRIMARY KEY,
                    project_id TEXT,
                    owner      TEXT NOT NULL DEFAULT '',
                    payload    TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS projects (
                    id      TEXT PRIMARY KEY,
                    payload TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS xp_entries (
                    id           INTEGER PRIMARY KEY AUTOINCREMENT,
                    ledger_id    TEXT NOT NULL,
                    profile_id   TEXT NOT NULL,
                    xp           REAL NOT NULL,
                    details      TEXT NOT NULL,
                    timestamp_ms INTEGER NOT NULL
                );

                CREATE TABLE IF NOT EXISTS hourly_rates (
                    skill TEXT PRIMARY KEY,
                    rate  REAL NOT NULL
                );

                CREATE TABLE IF NOT EXISTS role_minimums (
                    role    TEXT PRIMARY KEY,
                    minimum REAL NOT NULL
                );

                CREATE TABLE IF NOT EXISTS vacations (
                    id         INTEGER PRIMARY KEY AUTOINCREMENT,
                    profile_id TEXT NOT NULL,
                    date_from  INTEGER NOT NULL,
                    date_to    INTEGER NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_xp_entries_profile ON xp_entries(profile_id, timestamp_ms);
                CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
                CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner);
                CREATE INDEX IF NOT EXISTS idx_vacations_profile ON vacations(profile_id);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // ── Profiles ─────────────────────────────────────────────────────

    pub fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        let payload = serde_json::to_string(profile)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO profiles (id, payload) VALUES (?1, ?2)",
            params![profile.id, payload],
        )?;
        Ok(())
    }

    pub fn get_profile(&self, id: &str) -> Result<Profile> {
        let payload: String = self
            .conn
            .query_row(
                "SELECT payload FROM profiles WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CoreError::Database(DatabaseError::NotFound {
                        kind: "profile",
                        id: id.to_string(),
                    })
                }
                other => other.into(),
            })?;
        Ok(serde_json::from_str(&payload)?)
    }

    pub fn profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self.conn.prepare("SELECT payload FROM profiles ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(serde_json::from_str(&row?)?);
        }
        Ok(out)
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn upsert_task(&self, task: &Task) -> Result<()> {
        let payload = serde_json::to_string(task)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO tasks (id, project_id, owner, payload) VALUES (?1, ?2, ?3, ?4)",
            params![task.id, task.project_id, task.owner, payload],
        )?;
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        let payload: String = self
            .conn
            .query_row(
                "SELECT payload FROM tasks WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CoreError::Database(DatabaseError::NotFound {
                        kind: "task",
                        id: id.to_string(),
                    })
                }
                other => other.into(),
            })?;
        Ok(serde_json::from_str(&payload)?)
    }

    pub fn tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare("SELECT payload FROM tasks ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(serde_json::from_str(&row?)?);
        }
        Ok(out)
    }

    /// Tasks belonging to any of the given projects.
    pub fn tasks_in_projects(&self, project_ids: &[String]) -> Result<Vec<Task>> {
        let mut out = Vec::new();
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM tasks WHERE project_id = ?1 ORDER BY id")?;
        for project_id in project_ids {
            let rows = stmt.query_map(params![project_id], |row| row.get::<_, String>(0))?;
            for row in rows {
                out.push(serde_json::from_str::<Task>(&row?)?);
            }
        }
        Ok(out)
    }

    // ── Projects ─────────────────────────────────────────────────────

    pub fn upsert_project(&self, project: &Project) -> Result<()> {
        let payload = serde_json::to_string(project)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO projects (id, payload) VALUES (?1, ?2)",
            params![project.id, payload],
        )?;
        Ok(())
    }

    pub fn get_project(&self, id: &str) -> Result<Project> {
        let payload: String = self
            .conn
            .query_row(
                "SELECT payload FROM projects WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CoreError::Database(DatabaseError::NotFound {
                        kind: "project",
                        id: id.to_string(),
                    })
                }
                other => other.into(),
            })?;
        Ok(serde_json::from_str(&payload)?)
    }

    /// Projects the given profile is a member of.
    pub fn projects_with_member(&self, profile_id: &str) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare("SELECT payload FROM projects ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            let project: Project = serde_json::from_str(&row?)?;
            if project.members.iter().any(|m| m == profile_id) || project.owner == profile_id {
                out.push(project);
            }
        }
        Ok(out)
    }

    // ── XP ledger ────────────────────────────────────────────────────

    /// Append a signed XP entry to the profile's ledger and bump the
    /// profile's running `xp` by the same delta in one transaction.
    ///
    /// Creates the ledger lazily on first use. The running total and the
    /// ledger never diverge: either both writes land, or neither.
    pub fn append_xp(
        &mut self,
        profile_id: &str,
        xp: f64,
        details: &str,
        timestamp_ms: i64,
    ) -> Result<XpEntry> {
        let tx = self.conn.transaction().map_err(DatabaseError::from)?;

        let payload: String = tx
            .query_row(
                "SELECT payload FROM profiles WHERE id = ?1",
                params![profile_id],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    CoreError::Database(DatabaseError::NotFound {
                        kind: "profile",
                        id: profile_id.to_string(),
                    })
                }
                other => other.into(),
            })?;
        let mut profile: Profile = serde_json::from_str(&payload)?;

        let ledger_id = match &profile.ledger_id {
            Some(id) => id.clone(),
            None => {
                let id = Uuid::new_v4().to_string();
                profile.ledger_id = Some(id.clone());
                id
            }
        };

        tx.execute(
            "INSERT INTO xp_entries (ledger_id, profile_id, xp, details, timestamp_ms)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![ledger_id, profile_id, xp, details, timestamp_ms],
        )?;

        profile.xp += xp;
        tx.execute(
            "UPDATE profiles SET payload = ?2 WHERE id = ?1",
            params![profile_id, serde_json::to_string(&profile)?],
        )?;

        tx.commit().map_err(DatabaseError::from)?;
        Ok(XpEntry {
            xp,
            details: details.to_string(),
            timestamp_ms,
        })
    }

    /// All ledger entries for a profile, oldest first. An absent ledger
    /// reads as empty rather than failing.
    pub fn xp_entries(&self, profile_id: &str) -> Result<Vec<XpEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT xp, details, timestamp_ms FROM xp_entries
             WHERE profile_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![profile_id], |row| {
            Ok(XpEntry {
                xp: row.get(0)?,
                details: row.get(1)?,
                timestamp_ms: row.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Ledger entries whose second-normalized timestamp falls inside
    /// `[start, end]` inclusive.
    pub fn xp_entries_in_range(
        &self,
        profile_id: &str,
        start_secs: i64,
        end_secs: i64,
    ) -> Result<Vec<XpEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT xp, details, timestamp_ms FROM xp_entries
             WHERE profile_id = ?1 AND timestamp_ms / 1000 BETWEEN ?2 AND ?3
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![profile_id, start_secs, end_secs], |row| {
            Ok(XpEntry {
                xp: row.get(0)?,
                details: row.get(1)?,
                timestamp_ms: row.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    // ── Configuration tables ─────────────────────────────────────────

    pub fn set_hourly_rate(&self, skill: &str, rate: f64) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO hourly_rates (skill, rate) VALUES (?1, ?2)",
            params![skill, rate],
        )?;
        Ok(())
    }

    pub fn hourly_rates(&self) -> Result<HourlyRateTable> {
        let mut stmt = self.conn.prepare("SELECT skill, rate FROM hourly_rates")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;
        let mut table = HourlyRateTable::default();
        for row in rows {
            let (skill, rate) = row?;
            table.rates.insert(skill, rate);
        }
        Ok(table)
    }

    pub fn set_role_minimum(&self, role: &str, minimum: f64) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO role_minimums (role, minimum) VALUES (?1, ?2)",
            params![role, minimum],
        )?;
        Ok(())
    }

    pub fn role_minimums(&self) -> Result<RoleMinimumConfig> {
        let mut stmt = self.conn.prepare("SELECT role, minimum FROM role_minimums")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;
        let mut config = RoleMinimumConfig::default();
        for row in rows {
            let (role, minimum) = row?;
            config.minimums.insert(role, minimum);
        }
        Ok(config)
    }

    // ── Vacations ────────────────────────────────────────────────────

    pub fn add_vacation(&self, profile_id: &str, record: VacationRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO vacations (profile_id, date_from, date_to) VALUES (?1, ?2, ?3)",
            params![profile_id, record.date_from, record.date_to],
        )?;
        Ok(())
    }

    pub fn vacations(&self, profile_id: &str) -> Result<Vec<VacationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT date_from, date_to FROM vacations WHERE profile_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![profile_id], |row| {
            Ok(VacationRecord {
                date_from: row.get(0)?,
                date_to: row.get(1)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
