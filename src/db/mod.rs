pub mod migrations;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// Open (or create) the Memory Lane database at the given path, with schema
/// initialized and migrations applied.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // WAL lets readers proceed while a writer holds the lock
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(std::time::Duration::from_millis(5000))?;

    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Open a fully migrated in-memory database.
pub fn open_memory_database() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    migrations::run_migrations(&conn).context("failed to run migrations")?;
    Ok(conn)
}

/// Result of [`check_database_health`].
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub schema_version: u32,
    pub sqlite_version: String,
    pub integrity_ok: bool,
    pub integrity_details: String,
    pub album_count: u64,
    pub timeline_count: u64,
    pub story_count: u64,
    pub playlist_count: u64,
    pub song_count: u64,
    pub media_count: u64,
    pub log_count: u64,
}

/// Run `PRAGMA integrity_check` and collect row counts for every table.
pub fn check_database_health(conn: &Connection) -> Result<HealthReport> {
    let schema_version = migrations::get_schema_version(conn)?;
    let sqlite_version: String = conn.query_row("SELECT sqlite_version()", [], |r| r.get(0))?;

    let integrity_details: String =
        conn.query_row("PRAGMA integrity_check", [], |r| r.get(0))?;
    let integrity_ok = integrity_details == "ok";

    let count = |table: &str| -> Result<u64> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        Ok(n as u64)
    };

    Ok(HealthReport {
        schema_version,
        sqlite_version,
        integrity_ok,
        integrity_details,
        album_count: count("albums")?,
        timeline_count: count("timeline_events")?,
        story_count: count("stories")?,
        playlist_count: count("playlists")?,
        song_count: count("songs")?,
        media_count: count("media")?,
        log_count: count("activity_log")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_database_is_migrated() {
        let conn = open_memory_database().unwrap();
        assert_eq!(
            migrations::get_schema_version(&conn).unwrap(),
            migrations::CURRENT_SCHEMA_VERSION
        );
    }

    #[test]
    fn health_report_on_empty_db() {
        let conn = open_memory_database().unwrap();
        let report = check_database_health(&conn).unwrap();
        assert!(report.integrity_ok);
        assert_eq!(report.album_count, 0);
        assert_eq!(report.media_count, 0);
        assert!(!report.sqlite_version.is_empty());
    }
}
