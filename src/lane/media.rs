//! Uploaded photo, video and voice-note storage.
//!
//! Files land under `<root>/<category folder>/` with a name built from a fresh id and a
//! sanitized form of the uploader's name, so a stored name never contains path
//! separators or shell-unsafe characters and never collides. Bytes are written to a
//! temporary name and renamed into place; if recording the row fails the file is
//! removed again. Every stored file's SHA-256 is recorded.

use base64::Engine as _;
use rusqlite::{params, Connection, OptionalExtension, Row};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use super::activity::write_activity;
use super::types::{Media, MediaCategory};
use crate::error::{LaneError, Result};

/// Longest sanitized name stem kept on disk, leaving room for the id prefix.
const MAX_STEM_BYTES: usize = 100;
const MAX_EXTENSION_BYTES: usize = 16;

/// An upload on its way to disk.
#[derive(Debug)]
pub struct NewUpload<'a> {
    pub category: MediaCategory,
    /// Name supplied by the client, if any.
    pub original_filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
    pub album_id: Option<&'a str>,
    pub caption: Option<&'a str>,
}

/// Filter for [`list_media`].
#[derive(Debug, Default, Clone)]
pub struct MediaFilter {
    pub category: Option<MediaCategory>,
    pub album_id: Option<String>,
}

/// Media files on disk, rooted at one directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    max_bytes: usize,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the root and every category folder.
    pub fn ensure_dirs(&self) -> Result<()> {
        for category in MediaCategory::all() {
            std::fs::create_dir_all(self.root.join(category.folder()))?;
        }
        Ok(())
    }

    pub fn path_for(&self, category: MediaCategory, filename: &str) -> PathBuf {
        self.root.join(category.folder()).join(filename)
    }

    /// Validate, write, and record an upload.
    pub fn save(&self, conn: &mut Connection, upload: NewUpload<'_>) -> Result<Media> {
        if upload.data.is_empty() {
            return Err(LaneError::invalid("uploaded file is empty"));
        }
        if upload.data.len() > self.max_bytes {
            return Err(LaneError::invalid(format!(
                "uploaded file is {} bytes; limit is {}",
                upload.data.len(),
                self.max_bytes
            )));
        }

        let original = match upload.original_filename.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => fallback_filename(upload.category, upload.content_type),
        };
        let safe = secure_filename(&original);
        let extension = extension_of(&safe).ok_or_else(|| {
            LaneError::invalid(format!("cannot determine file type of '{original}'"))
        })?;
        if !upload.category.allowed_extensions().contains(&extension.as_str()) {
            return Err(LaneError::invalid(format!(
                "'.{extension}' files are not accepted for {} uploads",
                upload.category
            )));
        }

        let album_id = upload.album_id.map(str::trim).filter(|a| !a.is_empty());
        if let Some(album_id) = album_id {
            if !super::albums::album_exists(conn, album_id)? {
                return Err(LaneError::invalid(format!("unknown album: {album_id}")));
            }
        }

        let content_type = upload
            .content_type
            .and_then(|ct| accepted_content_type(upload.category, ct))
            .unwrap_or_else(|| content_type_for(&extension))
            .to_string();
        let sha256 = sha256_hex(upload.data);

        let id = super::new_id();
        let filename = format!("{}_{}", id.replace('-', ""), safe);
        let path = self.path_for(upload.category, &filename);
        write_atomically(&path, upload.data)?;

        let recorded = record_media(
            conn,
            &Media {
                id: id.clone(),
                category: upload.category,
                filename: filename.clone(),
                original_filename: original,
                content_type,
                size_bytes: upload.data.len() as u64,
                sha256: Some(sha256),
                album_id: album_id.map(String::from),
                caption: upload
                    .caption
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from),
                created_at: super::now(),
            },
        );
        if let Err(e) = recorded {
            if let Err(cleanup) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %cleanup, "failed to remove orphaned upload");
            }
            return Err(e);
        }

        tracing::info!(
            id = %id,
            category = %upload.category,
            filename = %filename,
            size = upload.data.len(),
            "media stored"
        );
        get_media(conn, &id)
    }

    /// Metadata and stored bytes for one media item.
    pub fn read(&self, conn: &Connection, id: &str) -> Result<(Media, Vec<u8>)> {
        let media = get_media(conn, id)?;
        let path = self.path_for(media.category, &media.filename);
        let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LaneError::not_found("media file", &media.filename),
            _ => LaneError::Io(e),
        })?;
        Ok((media, bytes))
    }

    /// Remove the row, then the file. A file that is already gone is not an error.
    pub fn delete(&self, conn: &mut Connection, id: &str) -> Result<()> {
        let media = get_media(conn, id)?;

        let tx = conn.transaction()?;
        tx.execute("DELETE FROM media WHERE id = ?1", params![id])?;
        write_activity(
            &tx,
            "delete",
            "media",
            id,
            Some(&serde_json::json!({"filename": media.filename})),
        )?;
        tx.commit()?;

        let path = self.path_for(media.category, &media.filename);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "media file already missing");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Total bytes of recorded media, per the database.
    pub fn total_bytes(conn: &Connection) -> Result<u64> {
        let total: i64 =
            conn.query_row("SELECT COALESCE(SUM(size_bytes), 0) FROM media", [], |r| r.get(0))?;
        Ok(total as u64)
    }
}

/// Insert a media row as given. Shared by uploads and snapshot restore.
pub(crate) fn record_media(conn: &mut Connection, media: &Media) -> Result<()> {
    let tx = conn.transaction()?;
    insert_media_row(&tx, media)?;
    write_activity(
        &tx,
        "upload",
        "media",
        &media.id,
        Some(&serde_json::json!({
            "category": media.category.as_str(),
            "sha256": media.sha256,
        })),
    )?;
    tx.commit()?;
    Ok(())
}

pub(crate) fn insert_media_row(conn: &Connection, media: &Media) -> Result<usize> {
    Ok(conn.execute(
        "INSERT OR IGNORE INTO media (id, category, filename, original_filename, content_type, \
         size_bytes, sha256, album_id, caption, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            media.id,
            media.category.as_str(),
            media.filename,
            media.original_filename,
            media.content_type,
            media.size_bytes as i64,
            media.sha256,
            media.album_id,
            media.caption,
            media.created_at,
        ],
    )?)
}

const MEDIA_COLUMNS: &str = "id, category, filename, original_filename, content_type, size_bytes, \
     sha256, album_id, caption, created_at";

fn media_from_row(row: &Row) -> rusqlite::Result<Media> {
    let category: String = row.get(1)?;
    let size: i64 = row.get(5)?;
    Ok(Media {
        id: row.get(0)?,
        category: category.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, e.into())
        })?,
        filename: row.get(2)?,
        original_filename: row.get(3)?,
        content_type: row.get(4)?,
        size_bytes: size as u64,
        sha256: row.get(6)?,
        album_id: row.get(7)?,
        caption: row.get(8)?,
        created_at: row.get(9)?,
    })
}

pub fn get_media(conn: &Connection, id: &str) -> Result<Media> {
    conn.query_row(
        &format!("SELECT {MEDIA_COLUMNS} FROM media WHERE id = ?1"),
        params![id],
        media_from_row,
    )
    .optional()?
    .ok_or_else(|| LaneError::not_found("media", id))
}

/// Media matching `filter`, newest first.
pub fn list_media(conn: &Connection, filter: &MediaFilter) -> Result<Vec<Media>> {
    let mut conditions = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(category) = filter.category {
        values.push(category.as_str().to_string());
        conditions.push(format!("category = ?{}", values.len()));
    }
    if let Some(ref album_id) = filter.album_id {
        values.push(album_id.clone());
        conditions.push(format!("album_id = ?{}", values.len()));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {MEDIA_COLUMNS} FROM media {where_clause} ORDER BY created_at DESC, id DESC"
    ))?;
    let media = stmt
        .query_map(rusqlite::params_from_iter(values.iter()), media_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(media)
}

/// Reduce a client-supplied filename to `[A-Za-z0-9._-]`.
///
/// Path separators and whitespace become underscores, every other character outside
/// the allowed set is dropped, and leading or trailing dots and underscores are
/// stripped. Returns `"upload"` when nothing usable remains.
pub fn secure_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            out.push(c);
        } else if c == '/' || c == '\\' || c.is_whitespace() {
            if !out.ends_with('_') {
                out.push('_');
            }
        }
    }
    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return "upload".to_string();
    }

    // output is ASCII, so byte slicing stays on char boundaries
    match trimmed.rsplit_once('.') {
        Some((stem, ext)) if stem.len() > MAX_STEM_BYTES && ext.len() <= MAX_EXTENSION_BYTES => {
            let stem = stem[..MAX_STEM_BYTES].trim_end_matches(|c| c == '.' || c == '_');
            format!("{stem}.{ext}")
        }
        _ if trimmed.len() > MAX_STEM_BYTES + 1 + MAX_EXTENSION_BYTES => {
            trimmed[..MAX_STEM_BYTES].to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// The client's MIME type, reduced to its essence, when it is one this category
/// stores. Anything else is replaced by the type implied by the extension.
fn accepted_content_type(category: MediaCategory, content_type: &str) -> Option<&str> {
    let extension = extension_for_content_type(content_type)?;
    category
        .allowed_extensions()
        .contains(&extension)
        .then(|| mime_essence(content_type))
}

fn mime_essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Name used when the client sent none, e.g. a browser-recorded voice note.
fn fallback_filename(category: MediaCategory, content_type: Option<&str>) -> String {
    let extension = content_type
        .and_then(extension_for_content_type)
        .unwrap_or(match category {
            MediaCategory::Photo => "jpg",
            MediaCategory::Video => "mp4",
            MediaCategory::Voice => "webm",
        });
    format!("{}.{extension}", category.as_str())
}

fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    Some(match mime_essence(content_type) {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/heic" => "heic",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/webm" | "audio/webm" => "webm",
        "audio/mpeg" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/ogg" => "ogg",
        "audio/mp4" | "audio/x-m4a" => "m4a",
        "audio/aac" => "aac",
        _ => return None,
    })
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Decode a base64 upload body, accepting an optional `data:<mime>;base64,` prefix.
/// Returns the bytes and the MIME type named by the prefix, if any.
pub fn decode_base64_payload(payload: &str) -> Result<(Vec<u8>, Option<String>)> {
    let payload = payload.trim();
    let (mime, encoded) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, body) = rest
                .split_once(',')
                .ok_or_else(|| LaneError::invalid("malformed data URL"))?;
            let mime = header.strip_suffix(";base64").unwrap_or(header);
            let mime = (!mime.is_empty()).then(|| mime.to_string());
            (mime, body)
        }
        None => (None, payload),
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| LaneError::invalid(format!("invalid base64 data: {e}")))?;
    Ok((bytes, mime))
}

fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("part");
    std::fs::write(&tmp_path, data)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}
