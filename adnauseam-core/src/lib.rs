//! adnauseam core library: shared domain types, configuration, errors.
//!
//! - [`types`]: store actions and template bindings
//! - [`error`]: [`ConfigError`]
//! - [`config`]: YAML configuration model and loader

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, RetryConfig, StoreConfig, SupervisorConfig};
pub use error::ConfigError;
pub use types::{Action, TemplateBinding};
