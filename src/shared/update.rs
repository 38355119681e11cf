/**
 * Server Update Events
 *
 * Update events are server assertions about thread state. They arrive as an
 * ordered sequence inside sync payloads and action confirmations. Only the
 * thread-related kinds are modelled here; every other kind the server sends
 * deserializes into `ClientUpdateInfo::Unhandled` and is ignored by the
 * thread reducer.
 */
use serde::{Deserialize, Serialize};

use super::thread::{RawThreadInfo, ThreadId};

/// One server-asserted fact about thread state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientUpdateInfo {
    /// Full replacement of a thread record
    #[serde(rename_all = "camelCase")]
    UpdateThread {
        id: String,
        time: i64,
        thread_info: RawThreadInfo,
    },
    /// Toggle of the viewer's unread flag
    #[serde(rename_all = "camelCase")]
    UpdateThreadReadStatus {
        id: String,
        time: i64,
        #[serde(rename = "threadID")]
        thread_id: ThreadId,
        unread: bool,
    },
    /// The thread is gone or no longer visible to the viewer
    #[serde(rename_all = "camelCase")]
    DeleteThread {
        id: String,
        time: i64,
        #[serde(rename = "threadID")]
        thread_id: ThreadId,
    },
    /// A user deleted their account and left every thread
    #[serde(rename_all = "camelCase")]
    DeleteAccount {
        id: String,
        time: i64,
        #[serde(rename = "deletedUserID")]
        deleted_user_id: String,
    },
    /// The viewer joined a thread
    #[serde(rename_all = "camelCase")]
    JoinThread {
        id: String,
        time: i64,
        thread_info: RawThreadInfo,
    },
    /// Any update kind the thread reducer does not handle
    #[serde(other)]
    Unhandled,
}

impl ClientUpdateInfo {
    /// Create an UPDATE_THREAD event
    pub fn update_thread(id: impl Into<String>, time: i64, thread_info: RawThreadInfo) -> Self {
        Self::UpdateThread {
            id: id.into(),
            time,
            thread_info,
        }
    }

    /// Create a JOIN_THREAD event
    pub fn join_thread(id: impl Into<String>, time: i64, thread_info: RawThreadInfo) -> Self {
        Self::JoinThread {
            id: id.into(),
            time,
            thread_info,
        }
    }

    /// Create an UPDATE_THREAD_READ_STATUS event
    pub fn read_status(
        id: impl Into<String>,
        time: i64,
        thread_id: impl Into<ThreadId>,
        unread: bool,
    ) -> Self {
        Self::UpdateThreadReadStatus {
            id: id.into(),
            time,
            thread_id: thread_id.into(),
            unread,
        }
    }

    /// Create a DELETE_THREAD event
    pub fn delete_thread(id: impl Into<String>, time: i64, thread_id: impl Into<ThreadId>) -> Self {
        Self::DeleteThread {
            id: id.into(),
            time,
            thread_id: thread_id.into(),
        }
    }

    /// Create a DELETE_ACCOUNT event
    pub fn delete_account(
        id: impl Into<String>,
        time: i64,
        deleted_user_id: impl Into<String>,
    ) -> Self {
        Self::DeleteAccount {
            id: id.into(),
            time,
            deleted_user_id: deleted_user_id.into(),
        }
    }
}

/// Update events delivered with an action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesResult {
    /// Server time the updates are current as of
    #[serde(default)]
    pub current_as_of: i64,
    pub new_updates: Vec<ClientUpdateInfo>,
}

impl UpdatesResult {
    pub fn new(current_as_of: i64, new_updates: Vec<ClientUpdateInfo>) -> Self {
        Self {
            current_as_of,
            new_updates,
        }
    }
}
