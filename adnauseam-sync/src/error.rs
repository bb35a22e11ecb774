//! Failures while loading templates or writing outputs.

use std::path::PathBuf;

use thiserror::Error;

use adnauseam_renderer::RenderError;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Template load, parse, or render failure.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Output write or removal failure at `path`.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
