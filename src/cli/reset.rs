//! CLI `reset` command: delete all records and uploaded files after user confirmation.

use anyhow::{bail, Result};
use rusqlite::Connection;
use std::io::Write;

use crate::config::LaneConfig;
use crate::lane::media::{list_media, MediaFilter, MediaStore};

/// Delete all records and their media files after user confirmation.
pub fn reset(config: &LaneConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    println!("WARNING: This will permanently delete ALL albums, timeline events, stories,");
    println!("playlists, uploaded media, and the activity log.");
    println!("Database: {}", db_path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let conn = super::open(config)?;
    let store = MediaStore::new(config.resolved_media_dir(), config.api.max_upload_bytes);
    let media = list_media(&conn, &MediaFilter::default())?;

    clear_records(&conn)?;

    let mut removed = 0usize;
    for m in &media {
        let path = store.path_for(m.category, &m.filename);
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => eprintln!("Warning: failed to remove {}: {e}", path.display()),
        }
    }

    println!("All records deleted; {removed} media files removed. Reset complete.");
    Ok(())
}

/// Delete every row in one transaction, children first for FK constraints.
fn clear_records(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "DELETE FROM song_memories;
         DELETE FROM songs;
         DELETE FROM playlists;
         DELETE FROM media;
         DELETE FROM albums;
         DELETE FROM timeline_events;
         DELETE FROM stories;
         DELETE FROM activity_log;",
    )?;
    tx.commit()?;
    Ok(())
}
