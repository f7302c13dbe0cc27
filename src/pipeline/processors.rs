//! Per-file extract-and-load chains handed to the batch driver.

use super::driver::RowsIssued;
use crate::error::{EtlError, EtlResult};
use crate::records::{build_time_rows, extract_next_song_events, extract_song_record, ResolvedSong};
use crate::warehouse::{
    insert_artist, insert_song, insert_songplay, insert_time, insert_user, lookup_song,
};
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tracing::debug;

fn read_file(path: &Path) -> EtlResult<String> {
    fs::read_to_string(path).map_err(|e| EtlError::filesystem(path, e))
}

/// Loads one song metadata file: one artist row, then one song row.
pub fn process_song_file(conn: &Connection, path: &Path) -> EtlResult<RowsIssued> {
    let content = read_file(path)?;
    let record = extract_song_record(&content).map_err(|e| EtlError::malformed(path, 1, e))?;

    insert_artist(conn, &record.artist)?;
    insert_song(conn, &record.song)?;

    Ok(RowsIssued {
        songs: 1,
        artists: 1,
        ..Default::default()
    })
}

/// Loads one activity log file.
///
/// Only `NextSong` events are loaded: their time rows first, then their user
/// rows, then one songplay each with song and artist resolved from the
/// catalog when possible.
pub fn process_log_file(conn: &Connection, path: &Path) -> EtlResult<RowsIssued> {
    let content = read_file(path)?;
    let events =
        extract_next_song_events(&content).map_err(|e| EtlError::malformed(path, e.line, e.source))?;
    if events.is_empty() {
        debug!("No NextSong events in {:?}", path);
        return Ok(RowsIssued::default());
    }

    let mut rows = RowsIssued::default();

    for time in build_time_rows(events.iter().map(|e| e.start_time)) {
        insert_time(conn, &time)?;
        rows.time += 1;
    }

    for event in &events {
        insert_user(conn, &event.user_row())?;
        rows.users += 1;
    }

    for event in &events {
        let resolved = match &event.song {
            Some(query) => lookup_song(conn, query)?,
            None => ResolvedSong::unresolved(),
        };
        if resolved.is_resolved() {
            rows.resolved_songplays += 1;
        }
        insert_songplay(conn, &event.songplay_row(resolved))?;
        rows.songplays += 1;
    }

    Ok(rows)
}
