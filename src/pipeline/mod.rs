//! File discovery, the per-file batch driver and the two ETL passes.

mod driver;
mod processors;
mod walker;

pub use driver::{process_files, BatchReport, RowsIssued};
pub use processors::{process_log_file, process_song_file};
pub use walker::find_data_files;

use crate::config::AppConfig;
use crate::error::EtlResult;
use crate::warehouse::{SqliteWarehouse, TableCounts};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Lists the data files under `root` and loads them one by one.
pub fn process_data<F>(
    warehouse: &mut SqliteWarehouse,
    root: &Path,
    extension: &str,
    process_file: F,
) -> EtlResult<BatchReport>
where
    F: FnMut(&Connection, &Path) -> EtlResult<RowsIssued>,
{
    let files = find_data_files(root, extension)?;
    info!("{} files found in {}", files.len(), root.display());
    process_files(warehouse, &files, process_file)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub songs: BatchReport,
    pub logs: BatchReport,
    pub tables: TableCounts,
}

/// Loads the song data, then the log data, into an open warehouse.
///
/// Songs go first so that songplays can resolve against them.
pub fn run_passes(warehouse: &mut SqliteWarehouse, config: &AppConfig) -> EtlResult<RunReport> {
    let songs = process_data(
        warehouse,
        &config.song_data,
        &config.data_extension,
        process_song_file,
    )?;
    let logs = process_data(
        warehouse,
        &config.log_data,
        &config.data_extension,
        process_log_file,
    )?;
    let tables = warehouse.counts()?;
    Ok(RunReport {
        songs,
        logs,
        tables,
    })
}

/// A whole ETL run: open the warehouse, run both passes, close it.
pub fn run(config: &AppConfig) -> EtlResult<RunReport> {
    let mut warehouse = SqliteWarehouse::open(&config.db_path, config.init_schema)?;
    let report = run_passes(&mut warehouse, config)?;
    warehouse.close()?;
    Ok(report)
}
