use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the watcher, supervisor, and runtime loop.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("sync error: {0}")]
    Sync(#[from] adnauseam_sync::SyncError),

    #[error("no keys found under {url}; nothing to watch")]
    EmptyNamespace { url: String },

    #[error("store unavailable after {attempts} consecutive failures: {last_error}")]
    StoreUnavailable { attempts: u32, last_error: String },

    #[error("no command given to supervise")]
    EmptyCommand,

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to control process {pid}: {source}")]
    Process {
        pid: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown supervisor transition '{0}'")]
    UnknownTransition(String),

    #[error("daemon runtime error: {0}")]
    Protocol(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
