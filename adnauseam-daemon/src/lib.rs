//! Watch loop for adnauseam: store watcher, render rounds, and the supervised child.

pub mod error;
pub mod retry;
pub mod runtime;
pub mod supervisor;
pub mod watcher;

pub use error::DaemonError;
pub use retry::{Backoff, RetryPolicy};
pub use runtime::{run, start_blocking, watch_loop, RunOptions};
pub use supervisor::{transition, ProcessState, Supervisor, SupervisorSignal};
pub use watcher::{Dispatched, Watcher};
