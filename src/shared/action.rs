//! Actions
//!
//! Every action the thread reducer understands, as one closed sum type.
//! Actions are internally tagged by their `type`; the payload fields sit next
//! to the tag. Kinds this crate does not know deserialize into
//! [`Action::Unrecognized`] so that a newer server or host never crashes the
//! reducer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::SharedError;
use super::thread::{RawThreadInfo, ThreadId, ThreadStore, ThreadSubscription};
use super::update::UpdatesResult;

/// Authoritative snapshot delivered by log-in, registration and full resync
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FullSyncPayload {
    pub thread_infos: BTreeMap<ThreadId, RawThreadInfo>,
    #[serde(default)]
    pub updates_current_as_of: i64,
}

/// Payload of any action that carries update events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesPayload {
    pub updates_result: UpdatesResult,
}

impl UpdatesPayload {
    pub fn new(updates_result: UpdatesResult) -> Self {
        Self { updates_result }
    }
}

/// Session change reported by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionChange {
    pub cookie_invalidated: bool,
    /// New cookie, if the server issued one
    #[serde(default)]
    pub cookie: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetNewSessionPayload {
    pub session_change: SessionChange,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdatePayload {
    #[serde(rename = "threadID")]
    pub thread_id: ThreadId,
    pub subscription: ThreadSubscription,
}

/// A message as saved locally; only the fields the thread reducer reads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawMessageInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "threadID")]
    pub thread_id: ThreadId,
    /// Message time in milliseconds since the epoch
    pub time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SaveMessagesPayload {
    pub raw_message_infos: Vec<RawMessageInfo>,
    /// Sync watermark at the time the messages were saved
    pub updates_current_as_of: i64,
}

/// Thread changes asserted by a CHECK_STATE request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StateChanges {
    #[serde(default)]
    pub raw_thread_infos: Option<Vec<RawThreadInfo>>,
    #[serde(default, rename = "deleteThreadIDs")]
    pub delete_thread_ids: Option<Vec<ThreadId>>,
}

/// Request sent by the server for the client to act on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerRequest {
    /// State verification, optionally carrying corrections
    #[serde(rename_all = "camelCase")]
    CheckState {
        #[serde(default)]
        hashes_to_check: BTreeMap<String, i64>,
        #[serde(default)]
        state_changes: Option<StateChanges>,
    },
    /// Any request kind the thread reducer does not handle
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProcessServerRequestsPayload {
    pub server_requests: Vec<ServerRequest>,
}

impl ProcessServerRequestsPayload {
    /// The first CHECK_STATE request's state changes, if there are any
    pub fn check_state_changes(&self) -> Option<&StateChanges> {
        self.server_requests.iter().find_map(|request| match request {
            ServerRequest::CheckState { state_changes, .. } => Some(state_changes.as_ref()),
            ServerRequest::Other => None,
        })?
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityResult {
    /// Threads that lost focus and should become unread
    pub unfocused_to_unread: Vec<ThreadId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityPayload {
    pub result: UpdateActivityResult,
}

/// Optimistic unread toggle requested by the viewer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetThreadUnreadStatusPayload {
    #[serde(rename = "threadID")]
    pub thread_id: ThreadId,
    pub unread: bool,
}

/// Server confirmation of an unread toggle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetThreadUnreadStatusResult {
    #[serde(rename = "threadID")]
    pub thread_id: ThreadId,
    /// The server rejected a "read" because new activity arrived meanwhile
    pub reset_to_unread: bool,
}

/// An action driving the thread reducer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "LOG_IN_SUCCESS")]
    LogInSuccess(FullSyncPayload),
    #[serde(rename = "REGISTER_SUCCESS")]
    RegisterSuccess(FullSyncPayload),
    #[serde(rename = "FULL_STATE_SYNC")]
    FullStateSync(FullSyncPayload),

    #[serde(rename = "LOG_OUT_SUCCESS")]
    LogOutSuccess,
    #[serde(rename = "DELETE_ACCOUNT_SUCCESS")]
    DeleteAccountSuccess,
    #[serde(rename = "SET_NEW_SESSION")]
    SetNewSession(SetNewSessionPayload),

    #[serde(rename = "JOIN_THREAD_SUCCESS")]
    JoinThreadSuccess(UpdatesPayload),
    #[serde(rename = "LEAVE_THREAD_SUCCESS")]
    LeaveThreadSuccess(UpdatesPayload),
    #[serde(rename = "DELETE_THREAD_SUCCESS")]
    DeleteThreadSuccess(UpdatesPayload),
    #[serde(rename = "CHANGE_THREAD_SETTINGS_SUCCESS")]
    ChangeThreadSettingsSuccess(UpdatesPayload),
    #[serde(rename = "REMOVE_USERS_FROM_THREAD_SUCCESS")]
    RemoveUsersFromThreadSuccess(UpdatesPayload),
    #[serde(rename = "CHANGE_THREAD_MEMBER_ROLES_SUCCESS")]
    ChangeThreadMemberRolesSuccess(UpdatesPayload),
    #[serde(rename = "INCREMENTAL_STATE_SYNC")]
    IncrementalStateSync(UpdatesPayload),
    #[serde(rename = "PROCESS_UPDATES")]
    ProcessUpdates(UpdatesPayload),
    #[serde(rename = "NEW_THREAD_SUCCESS")]
    NewThreadSuccess(UpdatesPayload),

    #[serde(rename = "UPDATE_SUBSCRIPTION_SUCCESS")]
    UpdateSubscriptionSuccess(SubscriptionUpdatePayload),
    #[serde(rename = "SAVE_MESSAGES")]
    SaveMessages(SaveMessagesPayload),
    #[serde(rename = "PROCESS_SERVER_REQUESTS")]
    ProcessServerRequests(ProcessServerRequestsPayload),
    #[serde(rename = "UPDATE_ACTIVITY_SUCCESS")]
    UpdateActivitySuccess(UpdateActivityPayload),
    #[serde(rename = "SET_THREAD_UNREAD_STATUS_STARTED")]
    SetThreadUnreadStatusStarted(SetThreadUnreadStatusPayload),
    #[serde(rename = "SET_THREAD_UNREAD_STATUS_SUCCESS")]
    SetThreadUnreadStatusSuccess(SetThreadUnreadStatusResult),
    #[serde(rename = "SET_THREAD_STORE")]
    SetThreadStore(ThreadStore),

    /// Any action kind the thread reducer does not handle
    #[serde(other, rename = "UNRECOGNIZED")]
    Unrecognized,
}

impl Action {
    /// Decode an action from JSON
    ///
    /// The input must be an object with a string `type`. Unknown types decode
    /// to [`Action::Unrecognized`].
    pub fn from_json(input: &str) -> Result<Self, SharedError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        match value.get("type") {
            Some(serde_json::Value::String(_)) => Ok(serde_json::from_value(value)?),
            Some(_) => Err(SharedError::validation("type", "action type must be a string")),
            None => Err(SharedError::validation("type", "action has no type tag")),
        }
    }

    /// The action's `type` tag
    pub fn action_type(&self) -> &'static str {
        match self {
            Action::LogInSuccess(_) => "LOG_IN_SUCCESS",
            Action::RegisterSuccess(_) => "REGISTER_SUCCESS",
            Action::FullStateSync(_) => "FULL_STATE_SYNC",
            Action::LogOutSuccess => "LOG_OUT_SUCCESS",
            Action::DeleteAccountSuccess => "DELETE_ACCOUNT_SUCCESS",
            Action::SetNewSession(_) => "SET_NEW_SESSION",
            Action::JoinThreadSuccess(_) => "JOIN_THREAD_SUCCESS",
            Action::LeaveThreadSuccess(_) => "LEAVE_THREAD_SUCCESS",
            Action::DeleteThreadSuccess(_) => "DELETE_THREAD_SUCCESS",
            Action::ChangeThreadSettingsSuccess(_) => "CHANGE_THREAD_SETTINGS_SUCCESS",
            Action::RemoveUsersFromThreadSuccess(_) => "REMOVE_USERS_FROM_THREAD_SUCCESS",
            Action::ChangeThreadMemberRolesSuccess(_) => "CHANGE_THREAD_MEMBER_ROLES_SUCCESS",
            Action::IncrementalStateSync(_) => "INCREMENTAL_STATE_SYNC",
            Action::ProcessUpdates(_) => "PROCESS_UPDATES",
            Action::NewThreadSuccess(_) => "NEW_THREAD_SUCCESS",
            Action::UpdateSubscriptionSuccess(_) => "UPDATE_SUBSCRIPTION_SUCCESS",
            Action::SaveMessages(_) => "SAVE_MESSAGES",
            Action::ProcessServerRequests(_) => "PROCESS_SERVER_REQUESTS",
            Action::UpdateActivitySuccess(_) => "UPDATE_ACTIVITY_SUCCESS",
            Action::SetThreadUnreadStatusStarted(_) => "SET_THREAD_UNREAD_STATUS_STARTED",
            Action::SetThreadUnreadStatusSuccess(_) => "SET_THREAD_UNREAD_STATUS_SUCCESS",
            Action::SetThreadStore(_) => "SET_THREAD_STORE",
            Action::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Update events carried by the action, for the thread-mutation kinds
    pub fn updates_payload(&self) -> Option<&UpdatesPayload> {
        match self {
            Action::JoinThreadSuccess(payload)
            | Action::LeaveThreadSuccess(payload)
            | Action::DeleteThreadSuccess(payload)
            | Action::ChangeThreadSettingsSuccess(payload)
            | Action::RemoveUsersFromThreadSuccess(payload)
            | Action::ChangeThreadMemberRolesSuccess(payload)
            | Action::IncrementalStateSync(payload)
            | Action::ProcessUpdates(payload)
            | Action::NewThreadSuccess(payload) => Some(payload),
            _ => None,
        }
    }

    /// Short human-readable description used in action history summaries
    pub fn summary(&self) -> String {
        match self {
            Action::LogInSuccess(payload)
            | Action::RegisterSuccess(payload)
            | Action::FullStateSync(payload) => {
                format!("{} threads", payload.thread_infos.len())
            }
            Action::SetNewSession(payload) => format!(
                "cookie invalidated: {}",
                payload.session_change.cookie_invalidated
            ),
            Action::UpdateSubscriptionSuccess(payload) => format!("thread {}", payload.thread_id),
            Action::SaveMessages(payload) => {
                format!("{} messages", payload.raw_message_infos.len())
            }
            Action::ProcessServerRequests(payload) => {
                format!("{} server requests", payload.server_requests.len())
            }
            Action::UpdateActivitySuccess(payload) => format!(
                "{} threads set to unread",
                payload.result.unfocused_to_unread.len()
            ),
            Action::SetThreadUnreadStatusStarted(payload) => {
                format!("thread {} unread: {}", payload.thread_id, payload.unread)
            }
            Action::SetThreadUnreadStatusSuccess(payload) => format!(
                "thread {} reset to unread: {}",
                payload.thread_id, payload.reset_to_unread
            ),
            Action::SetThreadStore(store) => format!("{} threads", store.len()),
            other => match other.updates_payload() {
                Some(payload) => format!("{} updates", payload.updates_result.new_updates.len()),
                None => String::new(),
            },
        }
    }
}
