//! Thread Store Operations
//!
//! Primitive, replayable mutations against a thread store. A batch of
//! operations is applied strictly in order; the same batch is what the local
//! database persists, so the in-memory store and the persisted store stay in
//! step without re-serializing everything.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::thread::{RawThreadInfo, ThreadId};

/// A single mutation of the thread store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ThreadStoreOperation {
    /// Insert or overwrite one record
    #[serde(rename_all = "camelCase")]
    Replace {
        id: ThreadId,
        thread_info: Arc<RawThreadInfo>,
    },
    /// Delete the listed records; absent IDs are ignored
    Remove { ids: Vec<ThreadId> },
    /// Delete every record
    RemoveAll,
}

impl ThreadStoreOperation {
    /// Replace operation keyed by the record's own ID
    pub fn replace(thread_info: Arc<RawThreadInfo>) -> Self {
        Self::Replace {
            id: thread_info.id.clone(),
            thread_info,
        }
    }

    pub fn remove(ids: Vec<ThreadId>) -> Self {
        Self::Remove { ids }
    }

    /// Operation name as stored in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Replace { .. } => "replace",
            Self::Remove { .. } => "remove",
            Self::RemoveAll => "remove_all",
        }
    }
}
