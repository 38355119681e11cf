//! Threadsync - Client Thread Store Reconciliation
//!
//! Threadsync keeps a client's cache of chat threads in step with the
//! server. Every action the client observes is turned into a short list of
//! storage operations; the same list updates the in-memory store and the
//! local SQLite cache, so both move delta by delta.
//!
//! # Module Structure
//!
//! - **`shared`** - Platform-agnostic types
//!   - Thread records, update events, actions, storage operations
//!   - Inconsistency reports
//!   - Configuration and error types
//!
//! - **`client`** - Reconciliation logic
//!   - Thread reducer and update fold
//!   - Store reconciler
//!   - Inconsistency detector, action sanitizer, action history
//!   - Local database and the driver tying it all together
//!
//! # Usage
//!
//! ```rust,no_run
//! use threadsync::client::{LocalDatabase, ThreadStoreDriver};
//! use threadsync::shared::{Action, AppConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let db = LocalDatabase::open_with_config(&config).await?;
//! let mut driver = ThreadStoreDriver::new(&config).with_database(db);
//! driver.restore().await?;
//!
//! let action = Action::from_json(r#"{"type":"LOG_OUT_SUCCESS"}"#)?;
//! let result = driver.dispatch(&action).await?;
//! println!("{} operations", result.thread_store_operations.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Identity
//!
//! Threads are shared behind `Arc`. When an action changes nothing the
//! returned store shares its map with the input store, which hosts can test
//! with `ThreadStore::ptr_eq` to skip persistence and re-rendering.
//!
//! # Error Handling
//!
//! - `shared::SharedError` for malformed input
//! - `shared::ConfigError` for configuration
//! - `client::LocalDbError` and `client::DriverError` for persistence
//!
//! Reduction itself never fails; unexpected input degrades to a no-op.

/// Shared types and data structures
pub mod shared;

/// Client-side reconciliation
pub mod client;
