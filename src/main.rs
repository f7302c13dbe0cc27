use anyhow::{Context, Result};
use clap::Parser;
use sparkify_etl::config::{
    DEFAULT_DATA_EXTENSION, DEFAULT_DB_PATH, DEFAULT_LOG_DATA, DEFAULT_SONG_DATA,
};
use sparkify_etl::{run, AppConfig, CliConfig, FileConfig};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song metadata and activity logs into the Sparkify warehouse")]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite warehouse database file.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Root directory of the song metadata files.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_SONG_DATA)]
    pub song_data: PathBuf,

    /// Root directory of the activity log files.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_LOG_DATA)]
    pub log_data: PathBuf,

    /// Extension of the data files to load.
    #[clap(long, default_value = DEFAULT_DATA_EXTENSION)]
    pub data_extension: String,

    /// Create the warehouse tables if the database has none.
    #[clap(long)]
    pub init_schema: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db.clone(),
            song_data: self.song_data.clone(),
            log_data: self.log_data.clone(),
            data_extension: self.data_extension.clone(),
            init_schema: self.init_schema,
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Warehouse database: {:?}", config.db_path);
    info!("Song data: {:?}", config.song_data);
    info!("Log data: {:?}", config.log_data);

    let report = run(&config)?;

    info!(
        "Song pass: {}/{} files, {} song and {} artist inserts",
        report.songs.files_processed,
        report.songs.files_found,
        report.songs.rows.songs,
        report.songs.rows.artists
    );
    info!(
        "Log pass: {}/{} files, {} time, {} user and {} songplay inserts ({} matched a song)",
        report.logs.files_processed,
        report.logs.files_found,
        report.logs.rows.time,
        report.logs.rows.users,
        report.logs.rows.songplays,
        report.logs.rows.resolved_songplays
    );
    info!(
        "Warehouse contains:\n{} songs\n{} artists\n{} time rows\n{} users\n{} songplays",
        report.tables.songs,
        report.tables.artists,
        report.tables.time,
        report.tables.users,
        report.tables.songplays
    );

    Ok(())
}
