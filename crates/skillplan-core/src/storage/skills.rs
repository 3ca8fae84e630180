//! SQLite-backed skill store.
//!
//! The store owns persistence; the planner only ever sees a
//! [`SkillSnapshot`] taken from a [`Skill`] right before the call.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{data_dir, migrations};
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::skill::{SkillSnapshot, POMODORO_MINUTES};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MIN_PREFIX_LEN: usize = 4;

/// A stored skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub state: SkillSnapshot,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Skill {
    /// Planner input for this skill.
    pub fn snapshot(&self) -> SkillSnapshot {
        self.state.clone()
    }
}

/// Input for [`SkillStore::create`].
#[derive(Debug, Clone)]
pub struct NewSkill {
    pub name: String,
    pub state: SkillSnapshot,
}

/// Work recorded against a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Minutes(u32),
    /// Completed sessions; also credited as 25 minutes each
    Pomodoros(u32),
}

impl Progress {
    fn minutes(&self) -> u64 {
        match *self {
            Progress::Minutes(m) => u64::from(m),
            Progress::Pomodoros(p) => u64::from(p) * u64::from(POMODORO_MINUTES),
        }
    }

    fn pomodoros(&self) -> u32 {
        match *self {
            Progress::Minutes(_) => 0,
            Progress::Pomodoros(p) => p,
        }
    }
}

/// One row of the progress log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: i64,
    pub skill_id: String,
    pub minutes: u32,
    pub pomodoros: u32,
    pub logged_at: DateTime<Utc>,
}

/// Raw column values, converted outside the rusqlite row closure.
struct SkillRow {
    id: String,
    name: String,
    goal_type: String,
    goal_minutes: u32,
    current_minutes: u32,
    goal_pomodoros: u32,
    pomodoros_completed: u32,
    deadline: Option<String>,
    distribution: String,
    exponential_intensity: f64,
    excluded_weekdays: String,
    created_at: String,
    updated_at: String,
}

impl SkillRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            goal_type: row.get(2)?,
            goal_minutes: row.get(3)?,
            current_minutes: row.get(4)?,
            goal_pomodoros: row.get(5)?,
            pomodoros_completed: row.get(6)?,
            deadline: row.get(7)?,
            distribution: row.get(8)?,
            exponential_intensity: row.get(9)?,
            excluded_weekdays: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> CoreError {
    DatabaseError::QueryFailed(format!("invalid stored {field}: {err}")).into()
}

fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(field, e))
}

impl TryFrom<SkillRow> for Skill {
    type Error = CoreError;

    fn try_from(row: SkillRow) -> Result<Self> {
        let deadline = row
            .deadline
            .as_deref()
            .map(|d| NaiveDate::parse_from_str(d, DATE_FORMAT))
            .transpose()
            .map_err(|e| corrupt("deadline", e))?;

        let state = SkillSnapshot {
            goal_type: row.goal_type.parse().map_err(|e| corrupt("goal_type", e))?,
            goal_minutes: row.goal_minutes,
            current_minutes: row.current_minutes,
            goal_pomodoros: row.goal_pomodoros,
            pomodoros_completed: row.pomodoros_completed,
            deadline,
            distribution: row
                .distribution
                .parse()
                .map_err(|e| corrupt("distribution", e))?,
            exponential_intensity: row.exponential_intensity,
            excluded_weekdays: serde_json::from_str(&row.excluded_weekdays)
                .map_err(|e| corrupt("excluded_weekdays", e))?,
        };

        Ok(Skill {
            id: row.id,
            name: row.name,
            state,
            created_at: parse_timestamp("created_at", &row.created_at)?,
            updated_at: parse_timestamp("updated_at", &row.updated_at)?,
        })
    }
}

const SELECT_SKILL: &str = "SELECT id, name, goal_type, goal_minutes, current_minutes,
        goal_pomodoros, pomodoros_completed, deadline, distribution,
        exponential_intensity, excluded_weekdays, created_at, updated_at
    FROM skills";

fn validate(name: &str, state: &SkillSnapshot) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".into(),
            message: "skill name must not be empty".into(),
        });
    }
    state.validate()
}

/// SQLite database of skills and their progress log.
pub struct SkillStore {
    conn: Connection,
}

impl SkillStore {
    /// Open the store at `~/.config/skillplan/skillplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("skillplan.db"))
    }

    /// Open the store at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Insert a new skill.
    ///
    /// # Errors
    /// Returns an error if validation or the insert fails.
    pub fn create(&self, new: NewSkill) -> Result<Skill> {
        validate(&new.name, &new.state)?;
        let now = Utc::now();
        let skill = Skill {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            state: new.state,
            created_at: now,
            updated_at: now,
        };

        let s = &skill.state;
        self.conn.execute(
            "INSERT INTO skills (id, name, goal_type, goal_minutes, current_minutes,
                goal_pomodoros, pomodoros_completed, deadline, distribution,
                exponential_intensity, excluded_weekdays, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                skill.id,
                skill.name,
                s.goal_type.to_string(),
                s.goal_minutes,
                s.current_minutes,
                s.goal_pomodoros,
                s.pomodoros_completed,
                s.deadline.map(|d| d.format(DATE_FORMAT).to_string()),
                s.distribution.to_string(),
                s.exponential_intensity,
                serde_json::to_string(&s.excluded_weekdays)?,
                skill.created_at.to_rfc3339(),
                skill.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::info!(id = %skill.id, name = %skill.name, "skill created");
        Ok(skill)
    }

    /// Fetch a skill by exact id.
    ///
    /// # Errors
    /// Returns an error if the query fails or the row is corrupt.
    pub fn get(&self, id: &str) -> Result<Option<Skill>> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_SKILL} WHERE id = ?1"),
                params![id],
                SkillRow::from_row,
            )
            .optional()?;
        row.map(Skill::try_from).transpose()
    }

    /// Find a skill by exact id, unique id prefix, or case-insensitive name.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] when nothing (or more than one skill) matches.
    pub fn resolve(&self, key: &str) -> Result<Skill> {
        if let Some(skill) = self.get(key)? {
            return Ok(skill);
        }

        let skills = self.list()?;
        let by_prefix: Vec<&Skill> = if key.len() >= MIN_PREFIX_LEN {
            skills.iter().filter(|s| s.id.starts_with(key)).collect()
        } else {
            Vec::new()
        };
        let matches = if by_prefix.is_empty() {
            skills
                .iter()
                .filter(|s| s.name.eq_ignore_ascii_case(key.trim()))
                .collect()
        } else {
            by_prefix
        };

        match matches.as_slice() {
            [only] => Ok((*only).clone()),
            _ => Err(CoreError::NotFound { id: key.to_string() }),
        }
    }

    /// All skills ordered by name.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row is corrupt.
    pub fn list(&self) -> Result<Vec<Skill>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_SKILL} ORDER BY name COLLATE NOCASE, created_at"))?;
        let rows = stmt.query_map([], SkillRow::from_row)?;

        let mut skills = Vec::new();
        for row in rows {
            skills.push(Skill::try_from(row?)?);
        }
        Ok(skills)
    }

    /// Overwrite a skill's name and state.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] for unknown ids, or a validation or
    /// database error.
    pub fn update(&self, skill: &Skill) -> Result<Skill> {
        validate(&skill.name, &skill.state)?;
        let updated_at = Utc::now();
        let s = &skill.state;

        let changed = self.conn.execute(
            "UPDATE skills SET name = ?2, goal_type = ?3, goal_minutes = ?4,
                current_minutes = ?5, goal_pomodoros = ?6, pomodoros_completed = ?7,
                deadline = ?8, distribution = ?9, exponential_intensity = ?10,
                excluded_weekdays = ?11, updated_at = ?12
             WHERE id = ?1",
            params![
                skill.id,
                skill.name.trim(),
                s.goal_type.to_string(),
                s.goal_minutes,
                s.current_minutes,
                s.goal_pomodoros,
                s.pomodoros_completed,
                s.deadline.map(|d| d.format(DATE_FORMAT).to_string()),
                s.distribution.to_string(),
                s.exponential_intensity,
                serde_json::to_string(&s.excluded_weekdays)?,
                updated_at.to_rfc3339(),
            ],
        )?;

        if changed == 0 {
            return Err(CoreError::NotFound {
                id: skill.id.clone(),
            });
        }
        tracing::info!(id = %skill.id, "skill updated");
        self.require(&skill.id)
    }

    /// Remove a skill and its progress log. Returns whether it existed.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM skills WHERE id = ?1", params![id])?;
        if changed > 0 {
            tracing::info!(id, "skill deleted");
        }
        Ok(changed > 0)
    }

    /// Add completed work to a skill and log it.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] for unknown ids,
    /// [`ValidationError::OutOfRange`] if a counter would pass `u32::MAX`
    /// (nothing is written then), or a database error.
    pub fn record_progress(&self, id: &str, progress: Progress) -> Result<Skill> {
        let skill = self.require(id)?;
        let current = skill.state.current_minutes;
        let current_minutes = add_counter("current_minutes", current, progress.minutes())?;
        let pomodoros_completed = add_counter(
            "pomodoros_completed",
            skill.state.pomodoros_completed,
            u64::from(progress.pomodoros()),
        )?;
        let logged_minutes = current_minutes - current;

        let now = Utc::now().to_rfc3339();
        let tx = self.conn.unchecked_transaction()?;

        let changed = tx.execute(
            "UPDATE skills SET
                current_minutes = ?2,
                pomodoros_completed = ?3,
                updated_at = ?4
             WHERE id = ?1",
            params![id, current_minutes, pomodoros_completed, now],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound { id: id.to_string() });
        }

        tx.execute(
            "INSERT INTO progress_log (skill_id, minutes, pomodoros, logged_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![id, logged_minutes, progress.pomodoros(), now],
        )?;
        tx.commit()?;

        tracing::info!(id, ?progress, "progress recorded");
        self.require(id)
    }

    /// Progress log of a skill, oldest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn history(&self, id: &str) -> Result<Vec<ProgressEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, skill_id, minutes, pomodoros, logged_at
             FROM progress_log WHERE skill_id = ?1 ORDER BY logged_at, id",
        )?;
        let rows = stmt.query_map(params![id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (entry_id, skill_id, minutes, pomodoros, logged_at) = row?;
            entries.push(ProgressEntry {
                id: entry_id,
                skill_id,
                minutes,
                pomodoros,
                logged_at: parse_timestamp("logged_at", &logged_at)?,
            });
        }
        Ok(entries)
    }

    fn require(&self, id: &str) -> Result<Skill> {
        self.get(id)?
            .ok_or_else(|| CoreError::NotFound { id: id.to_string() })
    }
}

/// `current + added`, or an error if the sum does not fit a stored counter.
fn add_counter(field: &str, current: u32, added: u64) -> Result<u32> {
    let total = u64::from(current) + added;
    u32::try_from(total).map_err(|_| {
        ValidationError::OutOfRange {
            field: field.to_string(),
            value: total as f64,
            min: 0.0,
            max: f64::from(u32::MAX),
        }
        .into()
    })
}
