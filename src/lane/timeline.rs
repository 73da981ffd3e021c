//! Life timeline events.
//!
//! Events are kept in chronological order: listings sort by year, then month, then day,
//! with undated months or days first within their year. Listings are paginated with a
//! fixed page size supplied by the caller.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::activity::write_activity;
use super::types::{TimelineEvent, TimelineInput, TimelinePage};
use crate::error::{LaneError, Result};

const EVENT_COLUMNS: &str =
    "id, title, year, month, day, description, category, tags, created_at";

const CHRONOLOGICAL: &str = "ORDER BY year ASC, month ASC, day ASC, created_at ASC";

fn event_from_row(row: &Row) -> rusqlite::Result<TimelineEvent> {
    let tags: String = row.get(7)?;
    Ok(TimelineEvent {
        id: row.get(0)?,
        title: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        day: row.get(4)?,
        description: row.get(5)?,
        category: row.get(6)?,
        tags: serde_json::from_str(&tags).unwrap_or_default(),
        created_at: row.get(8)?,
    })
}

fn validate(input: &TimelineInput) -> Result<String> {
    let title = super::required("title", &input.title)?;
    if !(1..=9999).contains(&input.year) {
        return Err(LaneError::invalid(format!("year out of range: {}", input.year)));
    }
    if let Some(month) = input.month {
        if !(1..=12).contains(&month) {
            return Err(LaneError::invalid(format!("month out of range: {month}")));
        }
    }
    if let Some(day) = input.day {
        if !(1..=31).contains(&day) {
            return Err(LaneError::invalid(format!("day out of range: {day}")));
        }
        if input.month.is_none() {
            return Err(LaneError::invalid("day requires a month"));
        }
    }
    Ok(title)
}

/// One page of events in chronological order. `page` is 1-based; values below 1
/// are treated as the first page.
pub fn list_timeline(
    conn: &Connection,
    page: usize,
    per_page: usize,
    category: Option<&str>,
) -> Result<TimelinePage> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    // a page past what SQLite can address is simply empty
    let offset = (page - 1)
        .checked_mul(per_page)
        .and_then(|o| i64::try_from(o).ok());
    let limit = i64::try_from(per_page).unwrap_or(i64::MAX);

    let (where_clause, filter) = match category {
        Some(c) => ("WHERE category = ?1", Some(c.to_string())),
        None => ("", None),
    };

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM timeline_events {where_clause}"),
        rusqlite::params_from_iter(filter.iter()),
        |row| row.get(0),
    )?;

    let sql = if filter.is_some() {
        format!(
            "SELECT {EVENT_COLUMNS} FROM timeline_events {where_clause} {CHRONOLOGICAL} LIMIT ?2 OFFSET ?3"
        )
    } else {
        format!("SELECT {EVENT_COLUMNS} FROM timeline_events {CHRONOLOGICAL} LIMIT ?1 OFFSET ?2")
    };

    let events = match offset {
        Some(offset) => {
            let mut stmt = conn.prepare(&sql)?;
            let rows = match &filter {
                Some(c) => stmt.query_map(params![c, limit, offset], event_from_row)?,
                None => stmt.query_map(params![limit, offset], event_from_row)?,
            };
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        }
        None => Vec::new(),
    };

    let total = total as u64;
    let has_more = offset.is_some_and(|o| (o as u64) + (events.len() as u64) < total);

    Ok(TimelinePage {
        events,
        page,
        per_page,
        total,
        has_more,
    })
}

/// Every event in chronological order. Used by export.
pub fn all_events(conn: &Connection) -> Result<Vec<TimelineEvent>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM timeline_events {CHRONOLOGICAL}"
    ))?;
    let events = stmt
        .query_map([], event_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(events)
}

pub fn get_event(conn: &Connection, id: &str) -> Result<TimelineEvent> {
    conn.query_row(
        &format!("SELECT {EVENT_COLUMNS} FROM timeline_events WHERE id = ?1"),
        params![id],
        event_from_row,
    )
    .optional()?
    .ok_or_else(|| LaneError::not_found("timeline event", id))
}

pub fn create_event(conn: &mut Connection, input: &TimelineInput) -> Result<TimelineEvent> {
    let title = validate(input)?;
    let tags: Vec<String> = input
        .tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    let id = super::new_id();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO timeline_events (id, title, year, month, day, description, category, tags, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            title,
            input.year,
            input.month,
            input.day,
            input.description,
            super::category_or_default(input.category.as_deref()),
            serde_json::to_string(&tags)?,
            super::now(),
        ],
    )?;
    write_activity(
        &tx,
        "create",
        "timeline_event",
        &id,
        Some(&serde_json::json!({"year": input.year})),
    )?;
    tx.commit()?;

    get_event(conn, &id)
}

pub fn delete_event(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    let rows = tx.execute("DELETE FROM timeline_events WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(LaneError::not_found("timeline event", id));
    }
    write_activity(&tx, "delete", "timeline_event", id, None)?;
    tx.commit()?;
    Ok(())
}
