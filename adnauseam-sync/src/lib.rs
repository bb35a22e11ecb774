//! # adnauseam-sync
//!
//! Routes store mutations into per-output contexts and keeps output files in
//! step with them.
//!
//! Build a [`RenderPipeline`] from the configured template bindings, feed
//! mutations through [`DependencyIndex::collect`], then call
//! [`RenderPipeline::render`] to write or remove every output.

pub mod env;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod writer;

pub use error::SyncError;
pub use index::{DependencyIndex, SharedContext};
pub use pipeline::{OutputBinding, RenderPipeline, RenderRound};
pub use writer::{remove_output, write_output, WriteResult};
