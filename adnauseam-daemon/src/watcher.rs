//! Store watcher: one recursive listing, then long-polls from a cursor.

use std::sync::Arc;

use adnauseam_core::Action;
use adnauseam_store::protocol::KEY_NOT_FOUND;
use adnauseam_store::{Store, StoreError, StoreResponse};
use adnauseam_sync::DependencyIndex;

use crate::error::DaemonError;
use crate::retry::{Backoff, RetryPolicy};

/// A change that matched at least one watched key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    pub action: Action,
    pub key: String,
    pub revision: u64,
}

pub struct Watcher<S> {
    store: Arc<S>,
    cursor: u64,
    backoff: Backoff,
}

impl<S: Store + 'static> Watcher<S> {
    pub fn new(store: Arc<S>, policy: RetryPolicy) -> Self {
        Self {
            store,
            cursor: 1,
            backoff: Backoff::new(policy),
        }
    }

    /// Next revision to wait from.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Seed every watched key from a full listing.
    ///
    /// Returns the highest revision seen; the cursor is left one past it.
    pub async fn bootstrap(&mut self, index: &DependencyIndex) -> Result<u64, DaemonError> {
        loop {
            let last_error = match self.call(|store| store.list()).await? {
                Ok(StoreResponse::Change(listing)) => {
                    let Some(max_revision) = listing.node.max_leaf_index() else {
                        return Err(self.empty_namespace());
                    };
                    let mut seeded = 0usize;
                    listing.node.for_each_leaf(&mut |leaf| {
                        let Some(key) = &leaf.key else { return };
                        let value = leaf.value.as_deref();
                        if index.collect(&Action::Set, key, value, leaf.modified_index) {
                            seeded += 1;
                        }
                    });
                    self.cursor = self.cursor.max(max_revision + 1);
                    self.backoff.reset();
                    tracing::info!(
                        seeded,
                        max_revision,
                        cursor = self.cursor,
                        "bootstrapped from listing"
                    );
                    return Ok(max_revision);
                }
                Ok(StoreResponse::Error(err)) if err.error_code == KEY_NOT_FOUND => {
                    return Err(self.empty_namespace());
                }
                Ok(StoreResponse::Error(err)) => {
                    format!("store error {}: {}", err.error_code, err.message)
                }
                Err(err) => err.to_string(),
            };
            self.back_off(last_error).await?;
        }
    }

    /// Poll until a change touches a watched key and dispatch it.
    pub async fn next_change(
        &mut self,
        index: &DependencyIndex,
    ) -> Result<Dispatched, DaemonError> {
        loop {
            let cursor = self.cursor;
            let last_error = match self.call(move |store| store.watch(cursor)).await? {
                Ok(StoreResponse::Change(change)) => {
                    self.backoff.reset();
                    let revision = change.node.modified_index;
                    let action = Action::parse(&change.action);
                    if let Some(key) = change.node.key {
                        if index.collect(&action, &key, change.node.value.as_deref(), revision) {
                            self.cursor = self.cursor.max(revision + 1);
                            return Ok(Dispatched { action, key, revision });
                        }
                    }
                    self.cursor = (self.cursor + 1).max(revision + 1);
                    continue;
                }
                Ok(StoreResponse::Error(err)) => {
                    self.cursor = self.cursor.max(err.index + 1);
                    format!("store error {}: {}", err.error_code, err.message)
                }
                Err(StoreError::Timeout { .. }) => {
                    tracing::debug!(cursor, "watch timed out; polling again");
                    continue;
                }
                Err(err) => err.to_string(),
            };
            self.back_off(last_error).await?;
        }
    }

    async fn back_off(&mut self, last_error: String) -> Result<(), DaemonError> {
        match self.backoff.next_delay() {
            Some(delay) => {
                tracing::warn!(
                    attempt = self.backoff.failures(),
                    delay_ms = delay.as_millis() as u64,
                    cursor = self.cursor,
                    "{last_error}; retrying"
                );
                tokio::time::sleep(delay).await;
                Ok(())
            }
            None => Err(DaemonError::StoreUnavailable {
                attempts: self.backoff.failures(),
                last_error,
            }),
        }
    }

    async fn call<T, F>(&self, request: F) -> Result<T, DaemonError>
    where
        F: FnOnce(&S) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || request(&*store))
            .await
            .map_err(|err| DaemonError::Protocol(format!("store request task failed: {err}")))
    }

    fn empty_namespace(&self) -> DaemonError {
        DaemonError::EmptyNamespace {
            url: self.store.base_url().to_string(),
        }
    }
}
