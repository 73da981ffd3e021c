//! Whole-database snapshots for export and import.
//!
//! A [`Snapshot`] holds every record with its original id. Restoring one inserts records
//! whose ids are not present yet and skips the rest, all inside one transaction. Media
//! rows are metadata only; the files themselves are copied separately.

use rusqlite::{params, Connection, Transaction};
use serde::{Deserialize, Serialize};

use super::activity::write_activity;
use super::media::{insert_media_row, list_media, MediaFilter};
use super::types::{Album, Media, Playlist, Story, TimelineEvent};
use crate::error::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub exported_at: Option<String>,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default)]
    pub stories: Vec<Story>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
    #[serde(default)]
    pub media: Vec<Media>,
}

impl Snapshot {
    pub fn record_count(&self) -> usize {
        self.albums.len()
            + self.timeline.len()
            + self.stories.len()
            + self.playlists.len()
            + self.media.len()
    }
}

/// Imported vs. skipped count for one record kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub imported: u64,
    pub skipped: u64,
}

impl Tally {
    fn add(&mut self, rows: usize) {
        if rows > 0 {
            self.imported += 1;
        } else {
            self.skipped += 1;
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct RestoreReport {
    pub albums: Tally,
    pub timeline_events: Tally,
    pub stories: Tally,
    pub playlists: Tally,
    pub songs: Tally,
    pub song_memories: Tally,
    pub media: Tally,
}

/// Read every record into a [`Snapshot`].
pub fn take_snapshot(conn: &Connection) -> Result<Snapshot> {
    Ok(Snapshot {
        exported_at: Some(super::now()),
        albums: super::albums::list_albums(conn)?,
        timeline: super::timeline::all_events(conn)?,
        stories: super::stories::list_stories(conn)?,
        playlists: super::music::list_playlists(conn)?,
        media: list_media(conn, &MediaFilter::default())?,
    })
}

/// Insert every record from `snapshot` whose id is not already present.
pub fn restore_snapshot(conn: &mut Connection, snapshot: &Snapshot) -> Result<RestoreReport> {
    let mut report = RestoreReport::default();
    let tx = conn.transaction()?;

    for album in &snapshot.albums {
        report.albums.add(tx.execute(
            "INSERT OR IGNORE INTO albums (id, name, description, category, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                album.id,
                album.name,
                album.description,
                album.category,
                album.created_at,
                album.updated_at
            ],
        )?);
    }

    for event in &snapshot.timeline {
        report.timeline_events.add(tx.execute(
            "INSERT OR IGNORE INTO timeline_events \
             (id, title, year, month, day, description, category, tags, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                event.id,
                event.title,
                event.year,
                event.month,
                event.day,
                event.description,
                event.category,
                serde_json::to_string(&event.tags)?,
                event.created_at,
            ],
        )?);
    }

    for story in &snapshot.stories {
        report.stories.add(tx.execute(
            "INSERT OR IGNORE INTO stories (id, title, type, content, category, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                story.id,
                story.title,
                story.story_type.as_str(),
                story.content,
                story.category,
                story.created_at,
                story.updated_at,
            ],
        )?);
    }

    for playlist in &snapshot.playlists {
        restore_playlist(&tx, playlist, &mut report)?;
    }

    for media in &snapshot.media {
        let mut media = media.clone();
        if let Some(ref album_id) = media.album_id {
            if !super::albums::album_exists(&tx, album_id)? {
                media.album_id = None;
            }
        }
        report.media.add(insert_media_row(&tx, &media)?);
    }

    write_activity(
        &tx,
        "create",
        "snapshot",
        "import",
        Some(&serde_json::to_value(&report)?),
    )?;
    tx.commit()?;

    Ok(report)
}

fn restore_playlist(tx: &Transaction, playlist: &Playlist, report: &mut RestoreReport) -> Result<()> {
    report.playlists.add(tx.execute(
        "INSERT OR IGNORE INTO playlists (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            playlist.id,
            playlist.name,
            playlist.description,
            playlist.created_at
        ],
    )?);

    for (position, song) in playlist.songs.iter().enumerate() {
        report.songs.add(tx.execute(
            "INSERT OR IGNORE INTO songs (id, playlist_id, title, artist, year, position, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                song.id,
                playlist.id,
                song.title,
                song.artist,
                song.year,
                position as i64,
                playlist.created_at,
            ],
        )?);

        if let Some(ref memory) = song.memory {
            report.song_memories.add(tx.execute(
                "INSERT OR IGNORE INTO song_memories (song_id, memory, updated_at) VALUES (?1, ?2, ?3)",
                params![song.id, memory, super::now()],
            )?);
        }
    }
    Ok(())
}
