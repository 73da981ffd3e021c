//! Record type definitions.
//!
//! Stored records ([`Album`], [`TimelineEvent`], [`Story`], [`Playlist`], [`Song`],
//! [`SongMemory`], [`Media`]) plus the request payloads that create or replace them.

use serde::{Deserialize, Serialize};

/// Category applied when a payload leaves it out.
pub const DEFAULT_CATEGORY: &str = "general";

/// How a story was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryType {
    /// Recorded narration; content is base64 audio.
    Audio,
    /// Typed text.
    #[default]
    Written,
    /// Recorded video; content is base64 video.
    Video,
}

impl StoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Written => "written",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for StoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(Self::Audio),
            "written" => Ok(Self::Written),
            "video" => Ok(Self::Video),
            _ => Err(format!("unknown story type: {s}")),
        }
    }
}

/// Kind of uploaded media. Selects the storage folder and the extension allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Photo,
    Video,
    Voice,
}

impl MediaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Voice => "voice",
        }
    }

    /// Folder under the media root holding files of this category.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Photo => "photos",
            Self::Video => "videos",
            Self::Voice => "voice_notes",
        }
    }

    /// Lowercase file extensions accepted for this category.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Photo => &["jpg", "jpeg", "png", "gif", "webp", "heic", "bmp"],
            Self::Video => &["mp4", "mov", "webm", "avi", "mkv", "m4v"],
            Self::Voice => &["mp3", "wav", "ogg", "m4a", "webm", "aac"],
        }
    }

    pub fn all() -> [MediaCategory; 3] {
        [Self::Photo, Self::Video, Self::Voice]
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(Self::Photo),
            "video" => Ok(Self::Video),
            "voice" => Ok(Self::Voice),
            _ => Err(format!("unknown media category: {s}")),
        }
    }
}

/// A photo album.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
    /// Number of photos attached to this album. Computed on read.
    #[serde(default)]
    pub photo_count: u32,
}

/// Body of `POST /albums` and `PUT /albums/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
}

/// A dated entry on the life timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: String,
}

/// Body of `POST /timeline`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineInput {
    pub title: String,
    pub year: i32,
    pub month: Option<u8>,
    pub day: Option<u8>,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One page of the timeline listing.
#[derive(Debug, Serialize)]
pub struct TimelinePage {
    pub events: Vec<TimelineEvent>,
    pub page: usize,
    pub per_page: usize,
    pub total: u64,
    pub has_more: bool,
}

/// A life story, written or recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub story_type: StoryType,
    pub content: String,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `POST /stories` and `PUT /stories/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryInput {
    pub title: String,
    #[serde(rename = "type", default)]
    pub story_type: StoryType,
    #[serde(default)]
    pub content: String,
    pub category: Option<String>,
}

/// A named list of songs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    #[serde(default)]
    pub songs: Vec<Song>,
}

/// A song within a playlist, with its attached memory if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub playlist_id: String,
    pub title: String,
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub memory: Option<String>,
}

/// Body of `POST /music/playlists`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub songs: Vec<SongInput>,
}

/// Body of `POST /music/playlists/{id}/songs`, and entries of [`PlaylistInput::songs`].
#[derive(Debug, Clone, Deserialize)]
pub struct SongInput {
    pub title: String,
    pub artist: Option<String>,
    pub year: Option<i32>,
}

/// Memory text attached to a song.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongMemory {
    pub song_id: String,
    pub memory: String,
    pub updated_at: String,
}

/// Metadata for an uploaded media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    pub id: String,
    pub category: MediaCategory,
    /// Sanitized, unique name under the category folder.
    pub filename: String,
    /// Name as supplied by the uploader.
    pub original_filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// Hex SHA-256 of the stored bytes.
    pub sha256: Option<String>,
    pub album_id: Option<String>,
    pub caption: Option<String>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_input_defaults_to_written() {
        let input: StoryInput = serde_json::from_str(r#"{"title": "First day of school"}"#).unwrap();
        assert_eq!(input.story_type, StoryType::Written);
        assert!(input.content.is_empty());
    }

    #[test]
    fn story_serializes_type_field() {
        let story = Story {
            id: "s1".into(),
            title: "Wedding".into(),
            story_type: StoryType::Audio,
            content: "UklGRg==".into(),
            category: "family".into(),
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: "2024-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_value(&story).unwrap();
        assert_eq!(json["type"], "audio");
    }

    #[test]
    fn media_category_round_trips_through_str() {
        for category in MediaCategory::all() {
            assert_eq!(category.as_str().parse::<MediaCategory>().unwrap(), category);
        }
        assert!("document".parse::<MediaCategory>().is_err());
    }

    #[test]
    fn voice_notes_accept_webm() {
        assert!(MediaCategory::Voice.allowed_extensions().contains(&"webm"));
        assert!(!MediaCategory::Photo.allowed_extensions().contains(&"webm"));
    }
}
