//! Dependency index: which contexts care about which key.
//!
//! Each output owns one [`Context`]; the index holds a shared handle to it
//! under every key its template references, so a mutation applied through the
//! index is immediately visible to the output.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use adnauseam_core::Action;
use adnauseam_renderer::Context;

/// A context shared between its output binding and the index.
pub type SharedContext = Rc<RefCell<Context>>;

/// Key path → contexts referencing it, in registration order.
#[derive(Debug, Default)]
pub struct DependencyIndex {
    routes: BTreeMap<String, Vec<SharedContext>>,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `context` once under each distinct key in `keys`.
    pub fn register<'a>(
        &mut self,
        keys: impl IntoIterator<Item = &'a String>,
        context: &SharedContext,
    ) {
        let mut seen = HashSet::new();
        for key in keys {
            if seen.insert(key.as_str()) {
                self.routes
                    .entry(key.clone())
                    .or_default()
                    .push(Rc::clone(context));
            }
        }
    }

    pub fn contexts(&self, key: &str) -> &[SharedContext] {
        self.routes.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Watched key paths, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Apply one mutation to every context registered under `key`.
    ///
    /// Returns whether the mutation was consumed. Unwatched keys and unknown
    /// actions are not consumed and mutate nothing.
    pub fn collect(&self, action: &Action, key: &str, value: Option<&str>, revision: u64) -> bool {
        let Some(contexts) = self.routes.get(key) else {
            tracing::debug!("ignoring {action} on unwatched key {key} (rev {revision})");
            return false;
        };

        match action {
            Action::Set => {
                let value = value.unwrap_or_default();
                for context in contexts {
                    context.borrow_mut().insert(key, value);
                }
            }
            Action::Remove => {
                for context in contexts {
                    context.borrow_mut().remove(key);
                }
            }
            Action::Unknown(name) => {
                tracing::warn!(
                    "unknown store action '{name}' for key {key} (rev {revision}); ignoring"
                );
                return false;
            }
        }

        tracing::debug!(
            "{action} {key} (rev {revision}) -> {} context(s)",
            contexts.len()
        );
        true
    }
}
