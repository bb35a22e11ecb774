//! Error types for adnauseam-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template loading and rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A `{` with no closing `}` before end of input.
    #[error("unterminated placeholder in {path} at line {line} (byte {offset})")]
    UnterminatedPlaceholder {
        path: PathBuf,
        line: usize,
        offset: usize,
    },

    /// A referenced key was absent at render time. The guard checks presence
    /// first, so this only surfaces on a bug.
    #[error("render invoked without key '{key}' present in context")]
    MissingKey { key: String },

    /// Filesystem error while reading a template.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
