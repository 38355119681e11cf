//! Thread Data Structures
//!
//! The client's cached view of conversation threads. A [`ThreadStore`] maps
//! thread IDs to [`RawThreadInfo`] records.
//!
//! # Sharing
//!
//! Records are held behind `Arc` and the map itself is held behind `Arc`, so
//! cloning a store or a map is shallow. Reducers rely on this: an untouched
//! record keeps its identity across reductions, and a reduction that changes
//! nothing hands back the very same map (see [`ThreadStore::ptr_eq`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Thread identifier as assigned by the server
pub type ThreadId = String;

/// Thread ID -> shared thread record
pub type ThreadInfos = BTreeMap<ThreadId, Arc<RawThreadInfo>>;

/// A single permission as computed by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadPermissionInfo {
    /// Whether the permission is granted
    pub value: bool,
    /// Thread the permission was inherited from, if any
    #[serde(default)]
    pub source: Option<ThreadId>,
}

/// Permission name -> permission
pub type ThreadPermissionsInfo = BTreeMap<String, ThreadPermissionInfo>;

/// A member of a thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    /// User ID of the member
    pub id: String,
    /// Role ID within the thread; `None` once the user has left
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: ThreadPermissionsInfo,
    /// Whether the member has sent a message in the thread
    #[serde(default)]
    pub is_sender: bool,
}

impl MemberInfo {
    /// Create a member with the given role and no permissions
    pub fn new(id: impl Into<String>, role: Option<String>) -> Self {
        Self {
            id: id.into(),
            role,
            permissions: BTreeMap::new(),
            is_sender: false,
        }
    }
}

/// A role defined on a thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub permissions: BTreeMap<String, bool>,
    #[serde(default)]
    pub is_default: bool,
}

/// Notification settings of the viewer for one thread
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSubscription {
    /// Show the thread in the viewer's home list
    pub home: bool,
    /// Deliver push notifications for the thread
    pub push_notifs: bool,
}

impl Default for ThreadSubscription {
    fn default() -> Self {
        Self {
            home: true,
            push_notifs: true,
        }
    }
}

/// Viewer-specific part of a thread record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThreadCurrentUserInfo {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: ThreadPermissionsInfo,
    #[serde(default)]
    pub subscription: ThreadSubscription,
    /// Whether the thread has activity the viewer hasn't seen
    #[serde(default)]
    pub unread: bool,
}

/// The client's cached view of one thread
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawThreadInfo {
    pub id: ThreadId,
    /// Numeric thread type as sent by the server
    #[serde(rename = "type")]
    pub thread_type: u8,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Hex color without the leading `#`
    pub color: String,
    /// Creation time in milliseconds since the epoch
    pub creation_time: i64,
    #[serde(default, rename = "parentThreadID")]
    pub parent_thread_id: Option<ThreadId>,
    #[serde(default, rename = "containingThreadID")]
    pub containing_thread_id: Option<ThreadId>,
    #[serde(default)]
    pub community: Option<ThreadId>,
    /// Members in server order
    #[serde(default)]
    pub members: Vec<MemberInfo>,
    #[serde(default)]
    pub roles: BTreeMap<String, RoleInfo>,
    pub current_user: ThreadCurrentUserInfo,
    #[serde(default, rename = "sourceMessageID")]
    pub source_message_id: Option<String>,
    #[serde(default)]
    pub replies_count: u32,
}

impl RawThreadInfo {
    /// Create a minimal thread record, mostly useful for tests and fixtures
    pub fn new(id: impl Into<ThreadId>, thread_type: u8, creation_time: i64) -> Self {
        Self {
            id: id.into(),
            thread_type,
            name: None,
            description: None,
            color: String::from("a0a0a0"),
            creation_time,
            parent_thread_id: None,
            containing_thread_id: None,
            community: None,
            members: Vec::new(),
            roles: BTreeMap::new(),
            current_user: ThreadCurrentUserInfo::default(),
            source_message_id: None,
            replies_count: 0,
        }
    }

    /// Check if user is a member
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|member| member.id == user_id)
    }

    /// Copy of this record with the viewer's unread flag set
    pub fn with_unread(&self, unread: bool) -> Self {
        let mut updated = self.clone();
        updated.current_user.unread = unread;
        updated
    }

    /// Copy of this record with the viewer's subscription replaced
    pub fn with_subscription(&self, subscription: ThreadSubscription) -> Self {
        let mut updated = self.clone();
        updated.current_user.subscription = subscription;
        updated
    }

    /// Copy of this record without the given member, or `None` if the user
    /// was not a member
    pub fn without_member(&self, user_id: &str) -> Option<Self> {
        let members: Vec<MemberInfo> = self
            .members
            .iter()
            .filter(|member| member.id != user_id)
            .cloned()
            .collect();
        if members.len() == self.members.len() {
            return None;
        }
        Some(Self {
            members,
            ..self.clone()
        })
    }
}

/// Client-local cache of thread records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThreadStore {
    pub thread_infos: Arc<ThreadInfos>,
}

impl ThreadStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a map of records
    pub fn from_thread_infos(thread_infos: ThreadInfos) -> Self {
        Self {
            thread_infos: Arc::new(thread_infos),
        }
    }

    /// Create a store from owned records, keyed by their IDs
    pub fn from_threads<I>(threads: I) -> Self
    where
        I: IntoIterator<Item = RawThreadInfo>,
    {
        Self::from_thread_infos(
            threads
                .into_iter()
                .map(|thread| (thread.id.clone(), Arc::new(thread)))
                .collect(),
        )
    }

    /// Look up a thread by ID
    pub fn get(&self, id: &str) -> Option<&Arc<RawThreadInfo>> {
        self.thread_infos.get(id)
    }

    pub fn len(&self) -> usize {
        self.thread_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thread_infos.is_empty()
    }

    /// Whether both stores share the same underlying map
    pub fn ptr_eq(&self, other: &ThreadStore) -> bool {
        Arc::ptr_eq(&self.thread_infos, &other.thread_infos)
    }
}
