//! Parameterized statements issued by the extractors.
//!
//! Every function takes a plain `&Connection`, so it runs equally against the
//! connection itself or against the per-file `Transaction` (which derefs to it).
//! Primary-key conflicts are resolved by the statements themselves: dimension
//! rows already present are left untouched, except `users.level` which takes
//! the value of the latest row.

use crate::records::{ArtistRow, ResolvedSong, SongQuery, SongRow, SongplayRow, TimeRow, UserRow};
use rusqlite::{params, Connection, OptionalExtension};

const SONG_INSERT: &str = "INSERT INTO songs (song_id, title, artist_id, year, duration)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT (song_id) DO NOTHING";

const ARTIST_INSERT: &str = "INSERT INTO artists (artist_id, name, location, latitude, longitude)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT (artist_id) DO NOTHING";

const TIME_INSERT: &str = "INSERT INTO time (start_time, hour, day, week, month, year, weekday)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT (start_time) DO NOTHING";

const USER_INSERT: &str = "INSERT INTO users (user_id, first_name, last_name, gender, level)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT (user_id) DO UPDATE SET level = excluded.level";

const SONGPLAY_INSERT: &str = "INSERT INTO songplays
    (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

// Exact equality on duration, floating point drift in the logs can make an
// expected match fail.
const SONG_SELECT: &str = "SELECT songs.song_id, artists.artist_id
    FROM songs JOIN artists ON songs.artist_id = artists.artist_id
    WHERE songs.title = ?1 AND artists.name = ?2 AND songs.duration = ?3";

pub fn insert_song(conn: &Connection, song: &SongRow) -> rusqlite::Result<usize> {
    conn.prepare_cached(SONG_INSERT)?.execute(params![
        song.song_id,
        song.title,
        song.artist_id,
        song.year,
        song.duration
    ])
}

pub fn insert_artist(conn: &Connection, artist: &ArtistRow) -> rusqlite::Result<usize> {
    conn.prepare_cached(ARTIST_INSERT)?.execute(params![
        artist.artist_id,
        artist.name,
        artist.location,
        artist.latitude,
        artist.longitude
    ])
}

pub fn insert_time(conn: &Connection, time: &TimeRow) -> rusqlite::Result<usize> {
    conn.prepare_cached(TIME_INSERT)?.execute(params![
        time.start_time,
        time.hour,
        time.day,
        time.week,
        time.month,
        time.year,
        time.weekday
    ])
}

pub fn insert_user(conn: &Connection, user: &UserRow) -> rusqlite::Result<usize> {
    conn.prepare_cached(USER_INSERT)?.execute(params![
        user.user_id,
        user.first_name,
        user.last_name,
        user.gender,
        user.level
    ])
}

pub fn insert_songplay(conn: &Connection, songplay: &SongplayRow) -> rusqlite::Result<usize> {
    conn.prepare_cached(SONGPLAY_INSERT)?.execute(params![
        songplay.start_time,
        songplay.user_id,
        songplay.level,
        songplay.song_id,
        songplay.artist_id,
        songplay.session_id,
        songplay.location,
        songplay.user_agent
    ])
}

/// Resolves the song and artist ids of a played song.
///
/// Takes the first row when several match; no match is not an error.
pub fn lookup_song(conn: &Connection, query: &SongQuery) -> rusqlite::Result<ResolvedSong> {
    let found = conn
        .prepare_cached(SONG_SELECT)?
        .query_row(
            params![query.title, query.artist_name, query.duration],
            |row| {
                Ok(ResolvedSong {
                    song_id: row.get(0)?,
                    artist_id: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(found.unwrap_or_else(ResolvedSong::unresolved))
}

pub fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
}
