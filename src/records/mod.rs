//! Typed rows for the five warehouse tables and the extractors producing them.

mod coerce;
mod log_event;
mod song;
mod time;

pub use log_event::{extract_next_song_events, LineError, NextSongEvent, SongQuery};
pub use song::{extract_song_record, SongRecord};
pub use time::{build_time_rows, instant_from_epoch_millis, time_row};

use chrono::NaiveDateTime;

#[derive(Clone, Debug, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i64,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Calendar attributes of one event instant.
///
/// `week` is the ISO 8601 week number, `weekday` counts from Monday = 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: NaiveDateTime,
    pub hour: u32,
    pub day: u32,
    pub week: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub level: String,
}

/// Song and artist identifiers resolved for a songplay, both `None` when
/// the catalog has no match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedSong {
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
}

impl ResolvedSong {
    pub fn unresolved() -> Self {
        ResolvedSong::default()
    }

    pub fn is_resolved(&self) -> bool {
        self.song_id.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongplayRow {
    pub start_time: NaiveDateTime,
    pub user_id: i64,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}
