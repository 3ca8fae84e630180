//! Database schema migrations for the skill store.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    tracing::debug!(version, "schema migrated");
    Ok(())
}

/// Migration v1: skills table.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS skills (
            id                    TEXT PRIMARY KEY,
            name                  TEXT NOT NULL,
            goal_type             TEXT NOT NULL DEFAULT 'time',
            goal_minutes          INTEGER NOT NULL DEFAULT 0,
            current_minutes       INTEGER NOT NULL DEFAULT 0,
            goal_pomodoros        INTEGER NOT NULL DEFAULT 0,
            pomodoros_completed   INTEGER NOT NULL DEFAULT 0,
            deadline              TEXT,
            distribution          TEXT NOT NULL DEFAULT 'linear',
            exponential_intensity REAL NOT NULL DEFAULT 0.5,
            excluded_weekdays     TEXT NOT NULL DEFAULT '[]',
            created_at            TEXT NOT NULL,
            updated_at            TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_skills_name ON skills(name);",
    )?;
    set_schema_version(conn, 1)
}

/// Migration v2: per-skill progress log.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS progress_log (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            skill_id   TEXT NOT NULL REFERENCES skills(id) ON DELETE CASCADE,
            minutes    INTEGER NOT NULL DEFAULT 0,
            pomodoros  INTEGER NOT NULL DEFAULT 0,
            logged_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_progress_log_skill ON progress_log(skill_id, logged_at);",
    )?;
    set_schema_version(conn, 2)
}
