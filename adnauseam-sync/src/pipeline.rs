//! Render pipeline: one guarded template and context per output file.

use std::cell::{Ref, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use adnauseam_core::TemplateBinding;
use adnauseam_renderer::{Context, GuardOutcome, GuardedTemplate, TemplateSpec};

use crate::error::SyncError;
use crate::index::{DependencyIndex, SharedContext};
use crate::writer::{remove_output, write_output, WriteResult};

/// One `template → output` pair with the context it renders from.
#[derive(Debug)]
pub struct OutputBinding {
    template_path: PathBuf,
    output_path: PathBuf,
    guarded: GuardedTemplate,
    context: SharedContext,
}

impl OutputBinding {
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn context(&self) -> Ref<'_, Context> {
        self.context.borrow()
    }

    fn sync(&self) -> Result<WriteResult, SyncError> {
        let outcome = self.guarded.evaluate(&self.context.borrow())?;
        match outcome {
            GuardOutcome::Rendered(content) => write_output(&self.output_path, &content),
            GuardOutcome::Withheld { missing } => {
                tracing::debug!(
                    "withholding {} (from {}): missing {:?}",
                    self.output_path.display(),
                    self.template_path.display(),
                    missing
                );
                remove_output(&self.output_path)
            }
        }
    }
}

/// Outcome of re-evaluating every binding once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRound {
    pub writes: Vec<WriteResult>,
}

impl RenderRound {
    /// Paths that received output this round.
    pub fn rendered(&self) -> Vec<&Path> {
        self.writes
            .iter()
            .filter(|w| matches!(w, WriteResult::Written { .. }))
            .map(WriteResult::path)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.writes.len()
    }

    /// Every binding produced output.
    pub fn is_complete(&self) -> bool {
        self.rendered().len() == self.total()
    }
}

/// All output bindings plus the index that routes mutations into them.
#[derive(Debug, Default)]
pub struct RenderPipeline {
    bindings: Vec<OutputBinding>,
    index: DependencyIndex,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and parse every template, in binding order.
    ///
    /// Fails on the first unreadable or unterminated template.
    pub fn load(bindings: &[TemplateBinding]) -> Result<Self, SyncError> {
        let mut pipeline = Self::new();
        for binding in bindings {
            let spec = TemplateSpec::load(&binding.template)?;
            pipeline.add(&binding.template, &spec, &binding.output);
        }
        Ok(pipeline)
    }

    /// Add a binding with a fresh, empty context.
    pub fn add(&mut self, template_path: &Path, spec: &TemplateSpec, output_path: &Path) {
        let context: SharedContext = Rc::new(RefCell::new(Context::new()));
        self.index.register(spec.keys(), &context);
        self.bindings.push(OutputBinding {
            template_path: template_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            guarded: GuardedTemplate::new(spec),
            context,
        });
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    pub fn bindings(&self) -> &[OutputBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Write every output whose guard renders; remove every one that does not.
    pub fn render(&self) -> Result<RenderRound, SyncError> {
        let writes = self
            .bindings
            .iter()
            .map(OutputBinding::sync)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RenderRound { writes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adnauseam_core::Action;
    use std::fs;
    use tempfile::TempDir;

    fn spec(text: &str) -> TemplateSpec {
        TemplateSpec::parse(Path::new("inline.template"), text).unwrap()
    }

    #[test]
    fn empty_context_removes_previous_output() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("greeting.txt");
        fs::write(&out, "stale").unwrap();

        let mut pipeline = RenderPipeline::new();
        pipeline.add(Path::new("greeting.template"), &spec("Hi {name}!"), &out);

        let round = pipeline.render().unwrap();
        assert_eq!(round.writes, vec![WriteResult::Removed { path: out.clone() }]);
        assert!(round.rendered().is_empty());
        assert!(!round.is_complete());
        assert!(!out.exists());
    }

    #[test]
    fn complete_context_writes_output() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("greeting.txt");

        let mut pipeline = RenderPipeline::new();
        pipeline.add(Path::new("greeting.template"), &spec("Hi {name}!"), &out);
        assert!(pipeline.index().collect(&Action::Set, "name", Some("Bob"), 1));

        let round = pipeline.render().unwrap();
        assert_eq!(round.rendered(), vec![out.as_path()]);
        assert!(round.is_complete());
        assert_eq!(fs::read_to_string(&out).unwrap(), "Hi Bob!");
        assert_eq!(pipeline.bindings()[0].context().get("name"), Some("Bob"));
    }

    #[test]
    fn context_only_holds_referenced_keys() {
        let tmp = TempDir::new().unwrap();
        let mut pipeline = RenderPipeline::new();
        pipeline.add(Path::new("t"), &spec("{a}"), &tmp.path().join("a.out"));

        pipeline.index().collect(&Action::Set, "a", Some("1"), 1);
        pipeline.index().collect(&Action::Set, "b", Some("2"), 2);

        let ctx = pipeline.bindings()[0].context();
        assert_eq!(ctx.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn no_bindings_is_trivially_complete() {
        let round = RenderPipeline::new().render().unwrap();
        assert_eq!(round.total(), 0);
        assert!(round.is_complete());
    }
}
