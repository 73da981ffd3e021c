//! Playlists, songs, and the memories attached to songs.

use rusqlite::{params, Connection, OptionalExtension, Transaction};

use super::activity::write_activity;
use super::types::{Playlist, PlaylistInput, Song, SongInput, SongMemory};
use crate::error::{LaneError, Result};

/// All playlists, newest first, each with its songs in insertion order.
pub fn list_playlists(conn: &Connection) -> Result<Vec<Playlist>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, created_at FROM playlists ORDER BY created_at DESC, id DESC",
    )?;
    let mut playlists = stmt
        .query_map([], |row| {
            Ok(Playlist {
                id: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
                created_at: row.get(3)?,
                songs: Vec::new(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for playlist in &mut playlists {
        playlist.songs = songs_for(conn, &playlist.id)?;
    }
    Ok(playlists)
}

pub fn get_playlist(conn: &Connection, id: &str) -> Result<Playlist> {
    let mut playlist = conn
        .query_row(
            "SELECT id, name, description, created_at FROM playlists WHERE id = ?1",
            params![id],
            |row| {
                Ok(Playlist {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    created_at: row.get(3)?,
                    songs: Vec::new(),
                })
            },
        )
        .optional()?
        .ok_or_else(|| LaneError::not_found("playlist", id))?;
    playlist.songs = songs_for(conn, id)?;
    Ok(playlist)
}

fn songs_for(conn: &Connection, playlist_id: &str) -> Result<Vec<Song>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.playlist_id, s.title, s.artist, s.year, sm.memory \
         FROM songs s LEFT JOIN song_memories sm ON sm.song_id = s.id \
         WHERE s.playlist_id = ?1 ORDER BY s.position",
    )?;
    let songs = stmt
        .query_map(params![playlist_id], |row| {
            Ok(Song {
                id: row.get(0)?,
                playlist_id: row.get(1)?,
                title: row.get(2)?,
                artist: row.get(3)?,
                year: row.get(4)?,
                memory: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(songs)
}

fn insert_song(tx: &Transaction, playlist_id: &str, input: &SongInput) -> Result<String> {
    let title = super::required("song title", &input.title)?;
    let position: i64 = tx.query_row(
        "SELECT COALESCE(MAX(position), -1) + 1 FROM songs WHERE playlist_id = ?1",
        params![playlist_id],
        |row| row.get(0),
    )?;
    let id = super::new_id();
    tx.execute(
        "INSERT INTO songs (id, playlist_id, title, artist, year, position, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            playlist_id,
            title,
            input.artist.as_deref().map(str::trim).filter(|a| !a.is_empty()),
            input.year,
            position,
            super::now(),
        ],
    )?;
    Ok(id)
}

/// Create a playlist together with any songs in the payload, atomically.
pub fn create_playlist(conn: &mut Connection, input: &PlaylistInput) -> Result<Playlist> {
    let name = super::required("name", &input.name)?;
    let id = super::new_id();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO playlists (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![id, name, input.description, super::now()],
    )?;
    for song in &input.songs {
        insert_song(&tx, &id, song)?;
    }
    write_activity(
        &tx,
        "create",
        "playlist",
        &id,
        Some(&serde_json::json!({"songs": input.songs.len()})),
    )?;
    tx.commit()?;

    get_playlist(conn, &id)
}

/// Append a song to an existing playlist.
pub fn add_song(conn: &mut Connection, playlist_id: &str, input: &SongInput) -> Result<Song> {
    let tx = conn.transaction()?;
    let exists: bool = tx.query_row(
        "SELECT COUNT(*) > 0 FROM playlists WHERE id = ?1",
        params![playlist_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(LaneError::not_found("playlist", playlist_id));
    }
    let song_id = insert_song(&tx, playlist_id, input)?;
    write_activity(&tx, "create", "song", &song_id, None)?;
    tx.commit()?;

    Ok(Song {
        id: song_id,
        playlist_id: playlist_id.to_string(),
        title: input.title.trim().to_string(),
        artist: input.artist.as_deref().map(str::trim).filter(|a| !a.is_empty()).map(String::from),
        year: input.year,
        memory: None,
    })
}

/// Delete a playlist; its songs and their memories go with it.
pub fn delete_playlist(conn: &mut Connection, id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    let rows = tx.execute("DELETE FROM playlists WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(LaneError::not_found("playlist", id));
    }
    write_activity(&tx, "delete", "playlist", id, None)?;
    tx.commit()?;
    Ok(())
}

/// Attach memory text to a song, replacing any memory already there.
pub fn set_song_memory(conn: &mut Connection, song_id: &str, memory: &str) -> Result<SongMemory> {
    let memory = super::required("memory", memory)?;
    let now = super::now();

    let tx = conn.transaction()?;
    let exists: bool = tx.query_row(
        "SELECT COUNT(*) > 0 FROM songs WHERE id = ?1",
        params![song_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(LaneError::not_found("song", song_id));
    }
    tx.execute(
        "INSERT INTO song_memories (song_id, memory, updated_at) VALUES (?1, ?2, ?3) \
         ON CONFLICT(song_id) DO UPDATE SET memory = excluded.memory, updated_at = excluded.updated_at",
        params![song_id, memory, now],
    )?;
    write_activity(&tx, "update", "song_memory", song_id, None)?;
    tx.commit()?;

    Ok(SongMemory {
        song_id: song_id.to_string(),
        memory,
        updated_at: now,
    })
}

pub fn get_song_memory(conn: &Connection, song_id: &str) -> Result<SongMemory> {
    conn.query_row(
        "SELECT song_id, memory, updated_at FROM song_memories WHERE song_id = ?1",
        params![song_id],
        |row| {
            Ok(SongMemory {
                song_id: row.get(0)?,
                memory: row.get(1)?,
                updated_at: row.get(2)?,
            })
        },
    )
    .optional()?
    .ok_or_else(|| LaneError::not_found("song memory", song_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str) -> SongInput {
        SongInput {
            title: title.into(),
            artist: Some("  ".into()),
            year: Some(1965),
        }
    }

    #[test]
    fn songs_keep_insertion_order() {
        let mut conn = crate::db::open_memory_database().unwrap();
        let playlist = create_playlist(
            &mut conn,
            &PlaylistInput {
                name: "Wedding".into(),
                description: String::new(),
                songs: vec![song("Moon River"), song("At Last")],
            },
        )
        .unwrap();
        add_song(&mut conn, &playlist.id, &song("Unchained Melody")).unwrap();

        let playlist = get_playlist(&conn, &playlist.id).unwrap();
        let titles: Vec<&str> = playlist.songs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Moon River", "At Last", "Unchained Melody"]);
        assert!(playlist.songs.iter().all(|s| s.artist.is_none()));
    }

    #[test]
    fn memory_on_unknown_song_is_not_found() {
        let mut conn = crate::db::open_memory_database().unwrap();
        let err = set_song_memory(&mut conn, "ghost", "dance").unwrap_err();
        assert!(matches!(err, LaneError::NotFound { kind: "song", .. }));
    }

    #[test]
    fn setting_memory_twice_replaces_it() {
        let mut conn = crate::db::open_memory_database().unwrap();
        let playlist = create_playlist(
            &mut conn,
            &PlaylistInput {
                name: "Road trips".into(),
                description: String::new(),
                songs: vec![song("Take It Easy")],
            },
        )
        .unwrap();
        let song_id = playlist.songs[0].id.clone();

        set_song_memory(&mut conn, &song_id, "Drive to Arizona").unwrap();
        set_song_memory(&mut conn, &song_id, "Drive to Arizona, 1976").unwrap();

        assert_eq!(
            get_song_memory(&conn, &song_id).unwrap().memory,
            "Drive to Arizona, 1976"
        );
    }

    #[test]
    fn deleting_playlist_cascades_to_memories() {
        let mut conn = crate::db::open_memory_database().unwrap();
        let playlist = create_playlist(
            &mut conn,
            &PlaylistInput {
                name: "Old".into(),
                description: String::new(),
                songs: vec![song("Yesterday")],
            },
        )
        .unwrap();
        let song_id = playlist.songs[0].id.clone();
        set_song_memory(&mut conn, &song_id, "Rainy afternoon").unwrap();

        delete_playlist(&mut conn, &playlist.id).unwrap();

        assert!(get_song_memory(&conn, &song_id).is_err());
    }

    #[test]
    fn blank_song_title_rolls_back_playlist() {
        let mut conn = crate::db::open_memory_database().unwrap();
        let result = create_playlist(
            &mut conn,
            &PlaylistInput {
                name: "Broken".into(),
                description: String::new(),
                songs: vec![song("Fine"), song(" ")],
            },
        );
        assert!(result.is_err());
        assert!(list_playlists(&conn).unwrap().is_empty());
    }
}
