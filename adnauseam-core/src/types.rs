//! Domain types shared by the store, sync, and daemon crates.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// What a store mutation did to a key.
///
/// etcd v2 reports more action names than the two effects a context cares
/// about; [`Action::parse`] folds them onto `Set` and `Remove`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The key now holds a value.
    Set,
    /// The key is gone (deleted or expired).
    Remove,
    /// An action name this program does not understand.
    Unknown(String),
}

impl Action {
    pub fn parse(name: &str) -> Self {
        match name {
            "set" | "create" | "update" | "compareAndSwap" | "get" => Action::Set,
            "delete" | "expire" | "compareAndDelete" => Action::Remove,
            other => Action::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Set => write!(f, "set"),
            Action::Remove => write!(f, "remove"),
            Action::Unknown(name) => write!(f, "unknown({name})"),
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateBinding
// ---------------------------------------------------------------------------

/// One `template_path:output_path` pair from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBinding {
    pub template: PathBuf,
    pub output: PathBuf,
}

impl FromStr for TemplateBinding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((template, output)) if !template.is_empty() && !output.is_empty() => {
                Ok(TemplateBinding {
                    template: PathBuf::from(template),
                    output: PathBuf::from(output),
                })
            }
            _ => Err(ConfigError::InvalidBinding(s.to_string())),
        }
    }
}

impl fmt::Display for TemplateBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.template.display(), self.output.display())
    }
}
