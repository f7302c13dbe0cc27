//! Error types shared by the extractors, the warehouse and the batch driver.

use std::path::PathBuf;
use thiserror::Error;

/// A single record could not be turned into typed rows.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a valid {expected}: {value}")]
    NotCoercible {
        field: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("file contains no record")]
    EmptyFile,

    #[error("timestamp {0} ms is out of range")]
    TimestampOutOfRange(i64),
}

/// Errors that abort an ETL run.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("malformed record in {} (line {line}): {source}", .path.display())]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("filesystem failure at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EtlError {
    pub fn malformed(path: impl Into<PathBuf>, line: usize, source: RecordError) -> Self {
        EtlError::MalformedRecord {
            path: path.into(),
            line,
            source,
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EtlError::Filesystem {
            path: path.into(),
            source,
        }
    }

    pub fn is_malformed_record(&self) -> bool {
        matches!(self, EtlError::MalformedRecord { .. })
    }
}

pub type EtlResult<T> = Result<T, EtlError>;
