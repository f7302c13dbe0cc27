use super::coerce::{optional_f64, require, required_f64, required_i64};
use super::{ArtistRow, SongRow};
use crate::error::RecordError;
use serde::Deserialize;
use serde_json::Value;

/// A song metadata file as found on disk. Numeric fields stay untyped until
/// coercion so that a bad value is reported with its field name.
#[derive(Debug, Deserialize)]
struct RawSong {
    song_id: Option<String>,
    title: Option<String>,
    artist_id: Option<String>,
    year: Option<Value>,
    duration: Option<Value>,
    artist_name: Option<String>,
    artist_location: Option<String>,
    artist_latitude: Option<Value>,
    artist_longitude: Option<Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SongRecord {
    pub song: SongRow,
    pub artist: ArtistRow,
}

impl TryFrom<RawSong> for SongRecord {
    type Error = RecordError;

    fn try_from(raw: RawSong) -> Result<Self, Self::Error> {
        let artist_id = require("artist_id", raw.artist_id)?;
        let song = SongRow {
            song_id: require("song_id", raw.song_id)?,
            title: require("title", raw.title)?,
            artist_id: artist_id.clone(),
            year: required_i64("year", raw.year.as_ref())?,
            duration: required_f64("duration", raw.duration.as_ref())?,
        };
        let artist = ArtistRow {
            artist_id,
            name: require("artist_name", raw.artist_name)?,
            location: raw.artist_location,
            latitude: optional_f64("artist_latitude", raw.artist_latitude.as_ref())?,
            longitude: optional_f64("artist_longitude", raw.artist_longitude.as_ref())?,
        };
        Ok(SongRecord { song, artist })
    }
}

/// Extracts the song and artist rows from the content of one song file.
///
/// The first JSON value in the file is the record, whether it sits on a
/// single line or is pretty-printed.
pub fn extract_song_record(content: &str) -> Result<SongRecord, RecordError> {
    let raw = serde_json::Deserializer::from_str(content)
        .into_iter::<RawSong>()
        .next()
        .ok_or(RecordError::EmptyFile)??;
    SongRecord::try_from(raw)
}
