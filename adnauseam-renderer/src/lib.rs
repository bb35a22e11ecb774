//! # adnauseam-renderer
//!
//! Flat key-substitution templates. A template is literal text with `{key/path}`
//! placeholders; there are no conditionals, loops, or escapes.
//!
//! ## Usage
//!
//! ```rust
//! use std::path::Path;
//! use adnauseam_renderer::{Context, GuardOutcome, GuardedTemplate, TemplateSpec};
//!
//! let spec = TemplateSpec::parse(Path::new("greeting.template"), "Hi {name}!").unwrap();
//! let guarded = GuardedTemplate::new(&spec);
//!
//! let mut ctx = Context::new();
//! assert!(matches!(guarded.evaluate(&ctx).unwrap(), GuardOutcome::Withheld { .. }));
//!
//! ctx.insert("name", "Bob");
//! assert_eq!(guarded.evaluate(&ctx).unwrap(), GuardOutcome::Rendered("Hi Bob!".to_string()));
//! ```

pub mod context;
pub mod error;
pub mod guard;
pub mod template;
pub mod token;

pub use context::Context;
pub use error::RenderError;
pub use guard::{guard, GuardOutcome, GuardedTemplate};
pub use template::{CompiledTemplate, TemplateSpec};
pub use token::{keys, tokenize, Token, UnterminatedPlaceholder};
