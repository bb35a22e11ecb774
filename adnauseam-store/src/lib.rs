//! etcd v2 key-space client: recursive listing and long-poll watch.

mod client;
mod error;
pub mod protocol;

pub use client::EtcdClient;
pub use error::StoreError;
pub use protocol::{ApiError, ChangeEvent, Node, StoreResponse};

/// The two requests the watcher makes against the store.
///
/// Both block the calling thread; the daemon runs them on the blocking pool.
pub trait Store: Send + Sync {
    /// Base URL of the watched namespace, for diagnostics.
    fn base_url(&self) -> &str;

    /// Recursively list the whole watched namespace.
    fn list(&self) -> Result<StoreResponse, StoreError>;

    /// Wait for the next change at or after `wait_index`.
    fn watch(&self, wait_index: u64) -> Result<StoreResponse, StoreError>;
}
