use super::TimeRow;
use crate::error::RecordError;
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};

/// Converts a log `ts` (epoch milliseconds, UTC) into an instant.
pub fn instant_from_epoch_millis(millis: i64) -> Result<NaiveDateTime, RecordError> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .ok_or(RecordError::TimestampOutOfRange(millis))
}

pub fn time_row(instant: NaiveDateTime) -> TimeRow {
    TimeRow {
        start_time: instant,
        hour: instant.hour(),
        day: instant.day(),
        week: instant.iso_week().week(),
        month: instant.month(),
        year: instant.year(),
        weekday: instant.weekday().num_days_from_monday(),
    }
}

/// One row per instant, in input order. Duplicates are kept.
pub fn build_time_rows<I>(instants: I) -> Vec<TimeRow>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    instants.into_iter().map(time_row).collect()
}
