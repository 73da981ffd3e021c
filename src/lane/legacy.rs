//! Reader for the flat-file layout used before the SQLite store.
//!
//! That layout kept one JSON file per resource (`albums.json`, `timeline.json`,
//! `stories.json`, `playlists.json`, `song_memories.json`) with loosely typed fields:
//! numeric or string ids, years as strings, month names, tags as either a list or a
//! comma-separated string. [`load_legacy_dir`] normalizes all of it into a
//! [`Snapshot`] that can be restored like any export. Missing files are skipped.

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use super::snapshot::Snapshot;
use super::types::{Album, Playlist, Song, Story, StoryType, TimelineEvent, DEFAULT_CATEGORY};
use crate::error::Result;

/// Result of [`load_legacy_dir`].
#[derive(Debug, Default)]
pub struct LegacyImport {
    pub snapshot: Snapshot,
    /// Records that could not be converted, one line each.
    pub warnings: Vec<String>,
}

pub fn load_legacy_dir(dir: &Path) -> Result<LegacyImport> {
    let mut import = LegacyImport::default();

    if let Some(records) = read_records(dir, "albums.json", &["albums"])? {
        for record in &records {
            match album_from(record) {
                Some(album) => import.snapshot.albums.push(album),
                None => import.warnings.push(format!("albums.json: skipped record without a name: {record}")),
            }
        }
    }

    if let Some(records) = read_records(dir, "timeline.json", &["events", "timeline"])? {
        for record in &records {
            match event_from(record) {
                Some(event) => import.snapshot.timeline.push(event),
                None => import
                    .warnings
                    .push(format!("timeline.json: skipped record without title or valid year: {record}")),
            }
        }
    }

    if let Some(records) = read_records(dir, "stories.json", &["stories"])? {
        for record in &records {
            match story_from(record) {
                Some(story) => import.snapshot.stories.push(story),
                None => import.warnings.push(format!("stories.json: skipped record without a title: {record}")),
            }
        }
    }

    if let Some(records) = read_records(dir, "playlists.json", &["playlists"])? {
        for record in &records {
            match playlist_from(record) {
                Some(playlist) => import.snapshot.playlists.push(playlist),
                None => import
                    .warnings
                    .push(format!("playlists.json: skipped record without a name: {record}")),
            }
        }
    }

    let path = dir.join("song_memories.json");
    if path.exists() {
        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        let memories = song_memories_from(&value);
        attach_song_memories(&mut import, memories);
    }

    tracing::info!(
        dir = %dir.display(),
        records = import.snapshot.record_count(),
        warnings = import.warnings.len(),
        "legacy files loaded"
    );
    Ok(import)
}

/// Read `file` as a list of records. Accepts a bare array, an object wrapping the
/// array under one of `keys`, or an object keyed by id.
fn read_records(dir: &Path, file: &str, keys: &[&str]) -> Result<Option<Vec<Value>>> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            match keys.iter().find_map(|k| map.remove(*k)) {
                Some(Value::Array(items)) => items,
                _ => map
                    .into_iter()
                    .filter_map(|(id, mut v)| {
                        let obj = v.as_object_mut()?;
                        obj.entry("id").or_insert(Value::String(id));
                        Some(v)
                    })
                    .collect(),
            }
        }
        _ => Vec::new(),
    };
    Ok(Some(records))
}

fn text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match record.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn integer(record: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| match record.get(*k)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn id_of(record: &Value) -> String {
    text(record, &["id"]).unwrap_or_else(super::new_id)
}

fn created_of(record: &Value) -> String {
    text(record, &["created_at", "created", "date_added"]).unwrap_or_else(super::now)
}

fn category_of(record: &Value) -> String {
    text(record, &["category"]).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

fn album_from(record: &Value) -> Option<Album> {
    let name = text(record, &["name", "title"])?;
    let created_at = created_of(record);
    Some(Album {
        id: id_of(record),
        name,
        description: text(record, &["description"]).unwrap_or_default(),
        category: category_of(record),
        updated_at: text(record, &["updated_at", "updated"]).unwrap_or_else(|| created_at.clone()),
        created_at,
        photo_count: 0,
    })
}

fn month_of(record: &Value) -> Option<u8> {
    if let Some(n) = integer(record, &["month"]) {
        return u8::try_from(n).ok().filter(|m| (1..=12).contains(m));
    }
    let name = text(record, &["month"])?.to_ascii_lowercase();
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    MONTHS
        .iter()
        .position(|m| name.starts_with(m))
        .map(|i| (i + 1) as u8)
}

fn tags_of(record: &Value) -> Vec<String> {
    match record.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|t| t.as_str())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn event_from(record: &Value) -> Option<TimelineEvent> {
    let title = text(record, &["title", "name"])?;
    let year = integer(record, &["year"])
        .and_then(|y| i32::try_from(y).ok())
        .filter(|y| (1..=9999).contains(y))?;
    let month = month_of(record);
    let day = month.and_then(|_| {
        integer(record, &["day"])
            .and_then(|d| u8::try_from(d).ok())
            .filter(|d| (1..=31).contains(d))
    });
    Some(TimelineEvent {
        id: id_of(record),
        title,
        year,
        month,
        day,
        description: text(record, &["description"]).unwrap_or_default(),
        category: category_of(record),
        tags: tags_of(record),
        created_at: created_of(record),
    })
}

fn story_from(record: &Value) -> Option<Story> {
    let title = text(record, &["title"])?;
    let story_type = match text(record, &["type"]).as_deref() {
        Some("audio") | Some("voice") => StoryType::Audio,
        Some("video") => StoryType::Video,
        _ => StoryType::Written,
    };
    let created_at = created_of(record);
    Some(Story {
        id: id_of(record),
        title,
        story_type,
        content: text(record, &["content", "text", "audio_data", "video_data"]).unwrap_or_default(),
        category: category_of(record),
        updated_at: text(record, &["updated_at", "updated"]).unwrap_or_else(|| created_at.clone()),
        created_at,
    })
}

fn playlist_from(record: &Value) -> Option<Playlist> {
    let name = text(record, &["name", "title"])?;
    let id = id_of(record);
    let songs = match record.get("songs") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|song| match song {
                Value::String(title) if !title.trim().is_empty() => Some(Song {
                    id: super::new_id(),
                    playlist_id: id.clone(),
                    title: title.trim().to_string(),
                    artist: None,
                    year: None,
                    memory: None,
                }),
                Value::Object(_) => Some(Song {
                    id: id_of(song),
                    playlist_id: id.clone(),
                    title: text(song, &["title", "name"])?,
                    artist: text(song, &["artist"]),
                    year: integer(song, &["year"]).and_then(|y| i32::try_from(y).ok()),
                    memory: text(song, &["memory"]),
                }),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Some(Playlist {
        id,
        name,
        description: text(record, &["description"]).unwrap_or_default(),
        created_at: created_of(record),
        songs,
    })
}

/// `{ "<song id>": "text" | {"memory": "text"} }` or `[{"song_id", "memory"}]`.
fn song_memories_from(value: &Value) -> HashMap<String, String> {
    let mut memories = HashMap::new();
    match value {
        Value::Object(map) => {
            for (song_id, entry) in map {
                let memory = match entry {
                    Value::String(s) => Some(s.trim().to_string()),
                    other => text(other, &["memory", "text"]),
                };
                if let Some(memory) = memory.filter(|m| !m.is_empty()) {
                    memories.insert(song_id.clone(), memory);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if let (Some(song_id), Some(memory)) =
                    (text(item, &["song_id", "id"]), text(item, &["memory", "text"]))
                {
                    memories.insert(song_id, memory);
                }
            }
        }
        _ => {}
    }
    memories
}

fn attach_song_memories(import: &mut LegacyImport, mut memories: HashMap<String, String>) {
    for playlist in &mut import.snapshot.playlists {
        for song in &mut playlist.songs {
            if let Some(memory) = memories.remove(&song.id) {
                song.memory = Some(memory);
            }
        }
    }
    let mut orphaned: Vec<String> = memories.into_keys().collect();
    orphaned.sort();
    for song_id in orphaned {
        import
            .warnings
            .push(format!("song_memories.json: no song with id {song_id}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn month_names_are_understood() {
        assert_eq!(month_of(&json!({"month": "March"})), Some(3));
        assert_eq!(month_of(&json!({"month": 11})), Some(11));
        assert_eq!(month_of(&json!({"month": "13"})), None);
        assert_eq!(month_of(&json!({})), None);
    }

    #[test]
    fn string_year_and_comma_tags() {
        let event = event_from(&json!({
            "id": 7,
            "title": "Bought the farm",
            "year": "1972",
            "tags": "home, family ,",
        }))
        .unwrap();
        assert_eq!(event.id, "7");
        assert_eq!(event.year, 1972);
        assert_eq!(event.tags, vec!["home", "family"]);
    }

    #[test]
    fn event_without_year_is_skipped() {
        assert!(event_from(&json!({"title": "Someday"})).is_none());
    }

    #[test]
    fn day_is_dropped_without_month() {
        let event = event_from(&json!({"title": "x", "year": 2000, "day": 5})).unwrap();
        assert!(event.day.is_none());
    }

    #[test]
    fn playlist_accepts_plain_song_titles() {
        let playlist = playlist_from(&json!({
            "name": "Church hymns",
            "songs": ["Amazing Grace", {"title": "How Great Thou Art", "artist": "Elvis"}],
        }))
        .unwrap();
        assert_eq!(playlist.songs.len(), 2);
        assert_eq!(playlist.songs[1].artist.as_deref(), Some("Elvis"));
    }

    #[test]
    fn song_memories_accept_both_shapes() {
        let from_map = song_memories_from(&json!({"s1": "Prom night", "s2": {"memory": "Road trip"}}));
        assert_eq!(from_map["s1"], "Prom night");
        assert_eq!(from_map["s2"], "Road trip");

        let from_list = song_memories_from(&json!([{"song_id": "s3", "memory": "Kitchen radio"}]));
        assert_eq!(from_list["s3"], "Kitchen radio");
    }
}
