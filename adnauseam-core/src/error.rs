//! Error types for adnauseam-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading configuration or parsing bindings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure reading a config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// `dirs::home_dir()` returned `None`: cannot locate `~/.adnauseam/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// A `-t` argument that is not of the form `template_path:output_path`.
    #[error("invalid template binding '{0}'; expected <template_path>:<output_path>")]
    InvalidBinding(String),
}
