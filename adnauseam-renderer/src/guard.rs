//! Render guard: only render once every required key is present.

use std::collections::BTreeSet;

use crate::context::Context;
use crate::error::RenderError;
use crate::template::{CompiledTemplate, TemplateSpec};

/// Result of evaluating a guarded template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// All keys were present; this is the full output.
    Rendered(String),
    /// At least one required key is absent; nothing was rendered.
    Withheld { missing: BTreeSet<String> },
}

impl GuardOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, GuardOutcome::Rendered(_))
    }
}

/// Invoke `renderer` only if every path in `required` is present in `context`.
pub fn guard(
    renderer: &CompiledTemplate,
    required: &[String],
    context: &Context,
) -> Result<GuardOutcome, RenderError> {
    let missing: BTreeSet<String> = required
        .iter()
        .filter(|key| !context.contains(key))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Ok(GuardOutcome::Withheld { missing });
    }
    renderer.render(context).map(GuardOutcome::Rendered)
}

/// A compiled template bundled with the keys it requires.
#[derive(Debug, Clone)]
pub struct GuardedTemplate {
    renderer: CompiledTemplate,
    required: Vec<String>,
}

impl GuardedTemplate {
    pub fn new(spec: &TemplateSpec) -> Self {
        Self {
            renderer: spec.compile(),
            required: spec.keys().to_vec(),
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn evaluate(&self, context: &Context) -> Result<GuardOutcome, RenderError> {
        guard(&self.renderer, &self.required, context)
    }
}
