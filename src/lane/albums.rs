//! Album storage.
//!
//! Albums group photos. Updates replace name, description and category wholesale;
//! deleting an album leaves its media in place with `album_id` cleared.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::activity::write_activity;
use super::types::{Album, AlbumInput};
use crate::error::{LaneError, Result};

const ALBUM_COLUMNS: &str = "a.id, a.name, a.description, a.category, a.created_at, a.updated_at, \
     (SELECT COUNT(*) FROM media m WHERE m.album_id = a.id AND m.category = 'photo')";

fn album_from_row(row: &Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        photo_count: row.get(6)?,
    })
}

/// All albums, newest first.
pub fn list_albums(conn: &Connection) -> Result<Vec<Album>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ALBUM_COLUMNS} FROM albums a ORDER BY a.created_at DESC, a.id DESC"
    ))?;
    let albums = stmt
        .query_map([], album_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(albums)
}

pub fn get_album(conn: &Connection, id: &str) -> Result<Album> {
    conn.query_row(
        &format!("SELECT {ALBUM_COLUMNS} FROM albums a WHERE a.id = ?1"),
        params![id],
        album_from_row,
    )
    .optional()?
    .ok_or_else(|| LaneError::not_found("album", id))
}

pub(crate) fn album_exists(conn: &Connection, id: &str) -> Result<bool> {
    Ok(conn.query_row(
        "SELECT COUNT(*) > 0 FROM albums WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?)
}

pub fn create_album(conn: &mut Connection, input: &AlbumInput) -> Result<Album> {
    let name = super::required("name", &input.name)?;
    let category = super::category_or_default(input.category.as_deref());
    let id = super::new_id();
    let now = super::now();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO albums (id, name, description, category, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![id, name, input.description, category, now],
    )?;
    write_activity(&tx, "create", "album", &id, None)?;
    tx.commit()?;

    tracing::debug!(id = %id, name = %name, "album created");
    get_album(conn, &id)
}

/// Replace an album's name, description and category. The id and creation time are kept.
pub fn update_album(conn: &mut Connection, id: &str, input: &AlbumInput) -> Result<Album> {
    let name = super::required("name", &input.name)?;
    let category = super::category_or_default(input.category.as_deref());

    let tx = conn.transaction()?;
    let rows = tx.execute(
        "UPDATE albums SET name = ?1, description = ?2, category = ?3, updated_at = ?4 WHERE id = ?5",
        params![name, input.description, category, super::now(), id],
    )?;
    if rows == 0 {
        return Err(LaneError::not_found("album", id));
    }
    write_activity(&tx, "update", "album", id, None)?;
    tx.commit()?;

    get_album(conn, id)
}

pub fn delete_album(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    let rows = tx.execute("DELETE FROM albums WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(LaneError::not_found("album", id));
    }
    write_activity(&tx, "delete", "album", id, None)?;
    tx.commit()?;
    Ok(())
}
