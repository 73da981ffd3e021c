use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use super::media::MediaStore;
use crate::error::Result;

/// Response from [`lane_stats`].
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub albums: u64,
    pub timeline_events: u64,
    pub stories: u64,
    pub playlists: u64,
    pub songs: u64,
    pub song_memories: u64,
    pub media_by_category: HashMap<String, u64>,
    pub media_bytes: u64,
    pub db_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
}

/// Compute record counts and storage usage.
///
/// `db_path` is used for file size calculation; pass None for in-memory databases.
pub fn lane_stats(conn: &Connection, db_path: Option<&Path>) -> Result<StatsResponse> {
    let count = |table: &str| -> Result<u64> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
        Ok(n as u64)
    };

    let mut media_by_category = HashMap::new();
    for category in super::types::MediaCategory::all() {
        media_by_category.insert(category.as_str().to_string(), 0);
    }
    let mut stmt = conn.prepare("SELECT category, COUNT(*) FROM media GROUP BY category")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for (category, n) in rows {
        media_by_category.insert(category, n as u64);
    }

    let (earliest_year, latest_year): (Option<i32>, Option<i32>) = conn.query_row(
        "SELECT MIN(year), MAX(year) FROM timeline_events",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let last_activity: Option<String> = conn.query_row(
        "SELECT MAX(created_at) FROM activity_log",
        [],
        |row| row.get(0),
    )?;

    let db_size_bytes = db_path
        .and_then(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .unwrap_or(0);

    Ok(StatsResponse {
        albums: count("albums")?,
        timeline_events: count("timeline_events")?,
        stories: count("stories")?,
        playlists: count("playlists")?,
        songs: count("songs")?,
        song_memories: count("song_memories")?,
        media_by_category,
        media_bytes: MediaStore::total_bytes(conn)?,
        db_size_bytes,
        earliest_year,
        latest_year,
        last_activity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::timeline::create_event;
    use crate::lane::types::TimelineInput;

    #[test]
    fn empty_database_has_zero_counts() {
        let conn = crate::db::open_memory_database().unwrap();
        let stats = lane_stats(&conn, None).unwrap();
        assert_eq!(stats.albums, 0);
        assert_eq!(stats.media_by_category["photo"], 0);
        assert_eq!(stats.media_bytes, 0);
        assert!(stats.earliest_year.is_none());
        assert!(stats.last_activity.is_none());
    }

    #[test]
    fn year_range_spans_timeline() {
        let mut conn = crate::db::open_memory_database().unwrap();
        for year in [1962, 1948, 2010] {
            create_event(
                &mut conn,
                &TimelineInput {
                    title: format!("Event {year}"),
                    year,
                    month: None,
                    day: None,
                    description: String::new(),
                    category: None,
                    tags: vec![],
                },
            )
            .unwrap();
        }
        let stats = lane_stats(&conn, None).unwrap();
        assert_eq!(stats.timeline_events, 3);
        assert_eq!(stats.earliest_year, Some(1948));
        assert_eq!(stats.latest_year, Some(2010));
        assert!(stats.last_activity.is_some());
    }
}
