//! Sparkify ETL
//!
//! Loads song metadata and user activity logs (JSON files) into a SQLite
//! star schema: `songs`, `artists`, `time`, `users` dimensions and the
//! `songplays` fact table.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod records;
pub mod sqlite_persistence;
pub mod warehouse;

pub use config::{AppConfig, CliConfig, FileConfig};
pub use error::{EtlError, EtlResult, RecordError};
pub use pipeline::{run, RunReport};
pub use warehouse::SqliteWarehouse;
