use anyhow::Result;

use crate::config::LaneConfig;

/// Display record counts and storage usage in the terminal.
pub fn stats(config: &LaneConfig) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = super::open(config)?;

    let response = crate::lane::stats::lane_stats(&conn, Some(&db_path))?;

    println!("Memory Lane Statistics");
    println!("{}", "=".repeat(40));
    println!("  Albums:              {}", response.albums);
    println!("  Timeline events:     {}", response.timeline_events);
    println!("  Stories:             {}", response.stories);
    println!("  Playlists:           {}", response.playlists);
    println!("  Songs:               {}", response.songs);
    println!("  Song memories:       {}", response.song_memories);
    println!();

    println!("Media:");
    for category in crate::lane::types::MediaCategory::all() {
        let count = response
            .media_by_category
            .get(category.as_str())
            .copied()
            .unwrap_or(0);
        println!("  {:<12} {}", category.as_str(), count);
    }
    println!("  {:<12} {}", "on disk", super::format_bytes(response.media_bytes));
    println!();

    println!("Database size:         {}", super::format_bytes(response.db_size_bytes));
    if let (Some(earliest), Some(latest)) = (response.earliest_year, response.latest_year) {
        println!("Timeline spans:        {earliest} to {latest}");
    }
    if let Some(ref last) = response.last_activity {
        println!("Last activity:         {last}");
    }

    Ok(())
}
