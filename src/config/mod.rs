mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "sparkify.db";
pub const DEFAULT_SONG_DATA: &str = "data/song_data";
pub const DEFAULT_LOG_DATA: &str = "data/log_data";
pub const DEFAULT_DATA_EXTENSION: &str = "json";

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub data_extension: String,
    pub init_schema: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            song_data: PathBuf::from(DEFAULT_SONG_DATA),
            log_data: PathBuf::from(DEFAULT_LOG_DATA),
            data_extension: DEFAULT_DATA_EXTENSION.to_owned(),
            init_schema: false,
        }
    }
}

/// Process-wide settings of one ETL run, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    /// Data files are matched on this extension, without the leading dot.
    pub data_extension: String,
    pub init_schema: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());
        let song_data = file
            .song_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.song_data.clone());
        let log_data = file
            .log_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.log_data.clone());
        let data_extension = file
            .data_extension
            .unwrap_or_else(|| cli.data_extension.clone())
            .trim_start_matches('.')
            .to_owned();
        let init_schema = file.init_schema.unwrap_or(cli.init_schema);

        if data_extension.is_empty() {
            bail!("data_extension must not be empty");
        }
        if song_data == log_data {
            bail!(
                "song_data and log_data must be different directories, both are {:?}",
                song_data
            );
        }

        Ok(AppConfig {
            db_path,
            song_data,
            log_data,
            data_extension,
            init_schema,
        })
    }
}
