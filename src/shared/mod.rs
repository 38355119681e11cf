//! Shared Module
//!
//! Types shared between the thread store core and its collaborators: the
//! host that dispatches actions, the server payloads feeding it, and the
//! telemetry channel consuming reports. All types are serde-serializable and
//! platform-agnostic.

/// Thread records and the thread store
pub mod thread;

/// Server update events
pub mod update;

/// Actions driving the thread reducer
pub mod action;

/// Thread store operations
pub mod operation;

/// Inconsistency reports
pub mod report;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use action::{Action, ServerRequest, StateChanges};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use operation::ThreadStoreOperation;
pub use report::{ActionSummary, ClientThreadInconsistencyReport, PlatformDetails, ReportType};
pub use thread::{MemberInfo, RawThreadInfo, ThreadId, ThreadInfos, ThreadStore, ThreadSubscription};
pub use update::{ClientUpdateInfo, UpdatesResult};
