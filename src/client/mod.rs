//! Client Module
//!
//! The client side of thread store reconciliation:
//!
//! - `reducer`: action to storage operations, plus the update-event fold
//! - `reconciler`: applies operation batches to an in-memory store
//! - `inconsistency`: reports divergence found by server state checks
//! - `sanitize`: masks secrets in actions before they leave the process
//! - `action_log`: rolling history of recent actions
//! - `local_db`: SQLite mirror of the store
//! - `driver`: ties the above together for a host

pub mod action_log;
pub mod driver;
pub mod inconsistency;
pub mod local_db;
pub mod reconciler;
pub mod reducer;
pub mod sanitize;

pub use action_log::{ActionHistory, ActionLogger};
pub use driver::{DriverError, ThreadStoreDriver};
pub use inconsistency::InconsistencyDetector;
pub use local_db::{LocalDatabase, LocalDbError};
pub use reconciler::process_thread_store_operations;
pub use reducer::{reduce_thread_infos, reduce_thread_updates, ThreadReducerResult};
pub use sanitize::ActionSanitizer;
