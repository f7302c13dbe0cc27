use crate::error::{EtlError, EtlResult};
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists every file under `root` whose extension is `extension`, recursively.
///
/// Paths are absolute. Entries are visited sorted by file name inside each
/// directory, so the order is the same on every invocation. Symlinks are not
/// followed. Any unreadable entry aborts the listing.
pub fn find_data_files(root: &Path, extension: &str) -> EtlResult<Vec<PathBuf>> {
    let root = root
        .canonicalize()
        .map_err(|e| EtlError::filesystem(root, e))?;
    if !root.is_dir() {
        return Err(EtlError::filesystem(
            root,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
            EtlError::filesystem(path, io::Error::from(e))
        })?;
        if entry.file_type().is_file() && entry.path().extension() == Some(OsStr::new(extension))
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
