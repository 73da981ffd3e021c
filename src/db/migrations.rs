//! Forward-only schema migrations.
//!
//! The version lives in `schema_meta`; [`run_migrations`] walks [`STEPS`] until the
//! database reaches [`CURRENT_SCHEMA_VERSION`].

use rusqlite::{Connection, OptionalExtension};

/// Version this build migrates databases up to.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

type Step = fn(&Connection) -> rusqlite::Result<()>;

/// Each entry upgrades the database to the paired version from the one before it.
const STEPS: &[(u32, Step)] = &[(2, migrate_v1_to_v2)];

/// Current schema version. A database without a recorded version reads as 0.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value.and_then(|v| v.parse().ok()).unwrap_or(0))
}

/// Whether `table` currently has a column named `column`.
pub fn has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|n| n == column))
}

/// Apply every step above the stored version, each in its own transaction together
/// with the version bump.
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let current = get_schema_version(conn)?;
    tracing::debug!(
        schema_version = current,
        target = CURRENT_SCHEMA_VERSION,
        "checking migrations"
    );

    for &(target, step) in STEPS.iter().filter(|(target, _)| *target > current) {
        tracing::info!(to = target, "running migration");
        let tx = conn.unchecked_transaction()?;
        step(&tx)?;
        tx.execute(
            "INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
            [target.to_string()],
        )?;
        tx.commit()?;
    }

    Ok(())
}

/// v2: uploads carry a SHA-256 digest of their bytes.
fn migrate_v1_to_v2(conn: &Connection) -> rusqlite::Result<()> {
    if !has_column(conn, "media", "sha256")? {
        conn.execute("ALTER TABLE media ADD COLUMN sha256 TEXT", [])?;
    }
    Ok(())
}
