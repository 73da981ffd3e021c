use anyhow::{Context, Result};
use std::path::Path;

use crate::config::LaneConfig;
use crate::lane::snapshot::{restore_snapshot, RestoreReport, Snapshot, Tally};

/// Import records from a JSON file produced by `export`.
///
/// Records whose id already exists in the database are skipped.
pub fn import(config: &LaneConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&json).context("failed to parse import JSON")?;

    let mut conn = super::open(config)?;
    println!("Importing {} records...", snapshot.record_count());

    let report = restore_snapshot(&mut conn, &snapshot)?;
    print_report(&report);
    Ok(())
}

pub(crate) fn print_report(report: &RestoreReport) {
    println!("Import complete:");
    let rows: [(&str, Tally); 7] = [
        ("Albums", report.albums),
        ("Timeline events", report.timeline_events),
        ("Stories", report.stories),
        ("Playlists", report.playlists),
        ("Songs", report.songs),
        ("Song memories", report.song_memories),
        ("Media", report.media),
    ];
    for (label, tally) in rows {
        if tally.skipped > 0 {
            println!(
                "  {label:<16} {} imported, {} skipped (already exist)",
                tally.imported, tally.skipped
            );
        } else {
            println!("  {label:<16} {} imported", tally.imported);
        }
    }
}
