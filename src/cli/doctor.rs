//! CLI `doctor` command: run database diagnostics and print a health report.

use anyhow::{Context, Result};

use crate::config::LaneConfig;
use crate::db;
use crate::lane::media::{list_media, MediaFilter, MediaStore};

/// Run database diagnostics and print a health report.
pub fn doctor(config: &LaneConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `memory-lane serve` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Memory Lane Health Report");
    println!("=========================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", super::format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!("SQLite:            v{}", report.sqlite_version);
    println!();
    println!("Row counts:");
    println!("  Albums:          {}", report.album_count);
    println!("  Timeline:        {}", report.timeline_count);
    println!("  Stories:         {}", report.story_count);
    println!("  Playlists:       {}", report.playlist_count);
    println!("  Songs:           {}", report.song_count);
    println!("  Media:           {}", report.media_count);
    println!("  Activity log:    {}", report.log_count);
    println!();

    // every media row should point at a file on disk
    let store = MediaStore::new(config.resolved_media_dir(), config.api.max_upload_bytes);
    let media = list_media(&conn, &MediaFilter::default())?;
    let missing: Vec<_> = media
        .iter()
        .filter(|m| !store.path_for(m.category, &m.filename).exists())
        .collect();
    println!("Media folder:      {}", store.root().display());
    if missing.is_empty() {
        println!("Media files:       OK ({} present)", media.len());
    } else {
        println!("Media files:       {} of {} MISSING", missing.len(), media.len());
        for m in missing.iter().take(10) {
            println!("  - {} ({})", m.filename, m.category);
        }
    }
    println!();

    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup: cp backup.db {}", db_path.display());
        println!("  2. Or export from a good copy and reimport:");
        println!("     memory-lane export > backup.json");
        println!("     memory-lane reset && memory-lane import backup.json");
    }

    Ok(())
}
