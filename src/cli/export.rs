use anyhow::Result;

use crate::config::LaneConfig;

/// Export every record as JSON to stdout.
pub fn export(config: &LaneConfig) -> Result<()> {
    let conn = super::open(config)?;
    let snapshot = crate::lane::snapshot::take_snapshot(&conn)?;

    let json = serde_json::to_string_pretty(&snapshot)?;
    println!("{json}");

    eprintln!(
        "Exported {} albums, {} timeline events, {} stories, {} playlists, {} media records.",
        snapshot.albums.len(),
        snapshot.timeline.len(),
        snapshot.stories.len(),
        snapshot.playlists.len(),
        snapshot.media.len(),
    );
    eprintln!(
        "Media files are not embedded; copy {} alongside the export.",
        config.resolved_media_dir().display()
    );

    Ok(())
}
