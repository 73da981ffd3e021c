//! Audit trail of record mutations.

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::Result;

/// One row of `activity_log`.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub operation: String,
    pub entity: String,
    pub entity_id: String,
    pub details: Option<serde_json::Value>,
    pub created_at: String,
}

/// Append an entry to `activity_log`. `operation` is one of
/// `create`, `update`, `delete`, `upload`.
pub(crate) fn write_activity(
    conn: &Connection,
    operation: &str,
    entity: &str,
    entity_id: &str,
    details: Option<&serde_json::Value>,
) -> Result<()> {
    let details_json = details.map(|d| d.to_string());
    conn.execute(
        "INSERT INTO activity_log (operation, entity, entity_id, details, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![operation, entity, entity_id, details_json, super::now()],
    )?;
    Ok(())
}

/// Most recent entries first.
pub fn recent_activity(conn: &Connection, limit: usize) -> Result<Vec<ActivityEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, operation, entity, entity_id, details, created_at \
         FROM activity_log ORDER BY id DESC LIMIT ?1",
    )?;
    let entries = stmt
        .query_map(params![limit as i64], |row| {
            let details: Option<String> = row.get(4)?;
            Ok(ActivityEntry {
                id: row.get(0)?,
                operation: row.get(1)?,
                entity: row.get(2)?,
                entity_id: row.get(3)?,
                details: details.and_then(|s| serde_json::from_str(&s).ok()),
                created_at: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entries)
}
