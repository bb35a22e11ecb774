//! Output file writer.
//!
//! Writes replace the whole file: content goes to `<path>.adnauseam.tmp`
//! first and is renamed over the target, so a reader never sees a partial
//! render. Removal of a file that does not exist is a no-op.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Outcome of syncing one output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// Rendered content was written.
    Written { path: PathBuf },
    /// The template was withheld and the stale file was deleted.
    Removed { path: PathBuf },
    /// The template was withheld and there was no file to delete.
    Absent { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Removed { path }
            | WriteResult::Absent { path } => path,
        }
    }
}

/// Replace the contents of `path` with `content`, creating parent directories.
pub fn write_output(path: &Path, content: &str) -> Result<WriteResult, SyncError> {
    write_output_with_tmp(path, content, &tmp_path(path))
}

/// Sibling `<path>.adnauseam.tmp`, byte-exact for non-UTF-8 names.
fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".adnauseam.tmp");
    PathBuf::from(tmp)
}

fn write_output_with_tmp(
    path: &Path,
    content: &str,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Delete `path` if it exists.
pub fn remove_output(path: &Path) -> Result<WriteResult, SyncError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("removing: {}", path.display());
            Ok(WriteResult::Removed {
                path: path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!("absent: {}", path.display());
            Ok(WriteResult::Absent {
                path: path.to_path_buf(),
            })
        }
        Err(err) => Err(io_err(path, err)),
    }
}
