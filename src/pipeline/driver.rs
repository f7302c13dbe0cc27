use crate::error::EtlResult;
use crate::warehouse::SqliteWarehouse;
use rusqlite::Connection;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use tracing::info;

/// Insert statements issued while processing files.
///
/// These are statements, not stored rows: a statement ignored by a
/// primary-key conflict is still counted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowsIssued {
    pub songs: usize,
    pub artists: usize,
    pub time: usize,
    pub users: usize,
    pub songplays: usize,
    pub resolved_songplays: usize,
}

impl AddAssign for RowsIssued {
    fn add_assign(&mut self, other: Self) {
        self.songs += other.songs;
        self.artists += other.artists;
        self.time += other.time;
        self.users += other.users;
        self.songplays += other.songplays;
        self.resolved_songplays += other.resolved_songplays;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub files_found: usize,
    pub files_processed: usize,
    pub rows: RowsIssued,
}

/// Runs `process_file` over `files` in order, one transaction per file.
///
/// A file's transaction is committed before the next file starts. The first
/// error rolls back the in-flight file and is returned as is: files already
/// processed stay committed.
pub fn process_files<F>(
    warehouse: &mut SqliteWarehouse,
    files: &[PathBuf],
    mut process_file: F,
) -> EtlResult<BatchReport>
where
    F: FnMut(&Connection, &Path) -> EtlResult<RowsIssued>,
{
    let total = files.len();
    let mut report = BatchReport {
        files_found: total,
        ..Default::default()
    };

    for (index, path) in files.iter().enumerate() {
        let tx = warehouse.begin_file()?;
        let rows = process_file(&tx, path)?;
        tx.commit()?;

        report.files_processed += 1;
        report.rows += rows;
        info!("{}/{} files processed.", index + 1, total);
    }

    if total == 0 {
        info!("0/0 files processed.");
    }
    Ok(report)
}
