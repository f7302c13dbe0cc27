use super::coerce::{optional_f64, require, required_i64};
use super::time::instant_from_epoch_millis;
use super::{ResolvedSong, SongplayRow, TimeRow, UserRow};
use crate::error::RecordError;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// The only page action that produces warehouse rows.
pub const NEXT_SONG_PAGE: &str = "NextSong";

#[derive(Debug, Error)]
#[error("line {line}: {source}")]
pub struct LineError {
    pub line: usize,
    #[source]
    pub source: RecordError,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLogEvent {
    ts: Option<Value>,
    user_id: Option<Value>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    level: Option<String>,
    song: Option<String>,
    artist: Option<String>,
    length: Option<Value>,
    session_id: Option<Value>,
    location: Option<String>,
    user_agent: Option<String>,
}

/// What the lookup resolver needs to find a played song in the catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct SongQuery {
    pub title: String,
    pub artist_name: String,
    pub duration: f64,
}

/// A retained (`page == "NextSong"`) log event with every field coerced.
#[derive(Clone, Debug, PartialEq)]
pub struct NextSongEvent {
    pub start_time: NaiveDateTime,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub level: String,
    pub song: Option<SongQuery>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl TryFrom<RawLogEvent> for NextSongEvent {
    type Error = RecordError;

    fn try_from(raw: RawLogEvent) -> Result<Self, Self::Error> {
        let millis = required_i64("ts", raw.ts.as_ref())?;
        let length = optional_f64("length", raw.length.as_ref())?;
        let song = match (raw.song, raw.artist, length) {
            (Some(title), Some(artist_name), Some(duration)) => Some(SongQuery {
                title,
                artist_name,
                duration,
            }),
            _ => None,
        };
        Ok(NextSongEvent {
            start_time: instant_from_epoch_millis(millis)?,
            user_id: required_i64("userId", raw.user_id.as_ref())?,
            first_name: require("firstName", raw.first_name)?,
            last_name: require("lastName", raw.last_name)?,
            gender: raw.gender,
            level: require("level", raw.level)?,
            song,
            session_id: required_i64("sessionId", raw.session_id.as_ref())?,
            location: raw.location,
            user_agent: raw.user_agent,
        })
    }
}

impl NextSongEvent {
    pub fn time_row(&self) -> TimeRow {
        super::time_row(self.start_time)
    }

    pub fn user_row(&self) -> UserRow {
        UserRow {
            user_id: self.user_id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
            level: self.level.clone(),
        }
    }

    pub fn songplay_row(&self, resolved: ResolvedSong) -> SongplayRow {
        SongplayRow {
            start_time: self.start_time,
            user_id: self.user_id,
            level: self.level.clone(),
            song_id: resolved.song_id,
            artist_id: resolved.artist_id,
            session_id: self.session_id,
            location: self.location.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn is_next_song(value: &Value) -> bool {
    value.get("page").and_then(Value::as_str) == Some(NEXT_SONG_PAGE)
}

/// Parses a newline-delimited log file and keeps the `NextSong` events, in
/// file order.
///
/// Every non-blank line must be valid JSON. Coercion only runs on retained
/// lines, so other page actions may carry fields that would not coerce.
pub fn extract_next_song_events(content: &str) -> Result<Vec<NextSongEvent>, LineError> {
    let mut events = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_error = |source: RecordError| LineError {
            line: index + 1,
            source,
        };
        let value: Value = serde_json::from_str(line).map_err(|e| line_error(e.into()))?;
        if !is_next_song(&value) {
            continue;
        }
        let raw: RawLogEvent = serde_json::from_value(value).map_err(|e| line_error(e.into()))?;
        events.push(NextSongEvent::try_from(raw).map_err(line_error)?);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEXT_SONG_LINE: &str = r#"{"artist":"Pavement","auth":"Logged In","firstName":"Sylvie","gender":"F","itemInSession":0,"lastName":"Cruz","length":99.16036,"level":"free","location":"Washington-Arlington-Alexandria, DC-VA-MD-WV","method":"PUT","page":"NextSong","registration":1540266185796.0,"sessionId":345,"song":"Mercy:The Laundromat","status":200,"ts":1541990258796,"userAgent":"Mozilla\/5.0 (Macintosh; Intel Mac OS X 10_9_4)","userId":"10"}"#;

    const HOME_LINE: &str = r#"{"artist":null,"auth":"Logged Out","firstName":null,"gender":null,"itemInSession":0,"lastName":null,"length":null,"level":"free","location":null,"method":"GET","page":"Home","registration":null,"sessionId":112,"song":null,"status":200,"ts":1541990217796,"userAgent":null,"userId":""}"#;

    #[test]
    fn extracts_next_song_event() {
        let events = extract_next_song_events(NEXT_SONG_LINE).unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.user_id, 10);
        assert_eq!(event.session_id, 345);
        assert_eq!(event.level, "free");
        assert_eq!(event.gender.as_deref(), Some("F"));
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_4)"));
        assert_eq!(
            event.song,
            Some(SongQuery {
                title: "Mercy:The Laundromat".to_owned(),
                artist_name: "Pavement".to_owned(),
                duration: 99.16036,
            })
        );
        assert_eq!(event.start_time.and_utc().timestamp_millis(), 1541990258796);
    }

    #[test]
    fn other_pages_are_dropped_before_coercion() {
        // The Home line has an empty userId that would not coerce.
        let content = [HOME_LINE, NEXT_SONG_LINE, HOME_LINE].join("\n");
        let events = extract_next_song_events(&content).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn three_of_ten_are_retained() {
        let mut lines = vec![HOME_LINE; 7];
        lines.insert(1, NEXT_SONG_LINE);
        lines.insert(4, NEXT_SONG_LINE);
        lines.push(NEXT_SONG_LINE);
        assert_eq!(lines.len(), 10);
        let events = extract_next_song_events(&lines.join("\n")).unwrap();
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn no_next_song_yields_nothing() {
        let content = format!("{}\n\n{}\n", HOME_LINE, HOME_LINE);
        assert!(extract_next_song_events(&content).unwrap().is_empty());
        assert!(extract_next_song_events("").unwrap().is_empty());
    }

    #[test]
    fn non_numeric_user_id_reports_its_line() {
        let bad = NEXT_SONG_LINE.replace(r#""userId":"10""#, r#""userId":"ten""#);
        let content = [HOME_LINE, bad.as_str()].join("\n");
        let err = extract_next_song_events(&content).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(matches!(
            err.source,
            RecordError::NotCoercible { field: "userId", .. }
        ));
    }

    #[test]
    fn missing_session_id_is_malformed() {
        let bad = NEXT_SONG_LINE.replace(r#""sessionId":345,"#, "");
        let err = extract_next_song_events(&bad).unwrap_err();
        assert!(matches!(err.source, RecordError::MissingField("sessionId")));
    }

    #[test]
    fn invalid_json_line_is_malformed() {
        let content = format!("{}\nnot json\n", NEXT_SONG_LINE);
        let err = extract_next_song_events(&content).unwrap_err();
        assert_eq!(err.line, 2);
        assert!(matches!(err.source, RecordError::InvalidJson(_)));
    }

    #[test]
    fn missing_length_skips_song_query() {
        let line = NEXT_SONG_LINE.replace(r#""length":99.16036"#, r#""length":null"#);
        let events = extract_next_song_events(&line).unwrap();
        assert_eq!(events[0].song, None);
    }

    #[test]
    fn rows_carry_event_values() {
        let event = extract_next_song_events(NEXT_SONG_LINE).unwrap().remove(0);

        let user = event.user_row();
        assert_eq!(user.user_id, 10);
        assert_eq!(user.first_name, "Sylvie");
        assert_eq!(user.last_name, "Cruz");

        let time = event.time_row();
        assert_eq!(time.start_time, event.start_time);

        let songplay = event.songplay_row(ResolvedSong::unresolved());
        assert_eq!(songplay.song_id, None);
        assert_eq!(songplay.artist_id, None);
        assert_eq!(songplay.session_id, 345);
        assert_eq!(songplay.user_id, 10);
    }
}
