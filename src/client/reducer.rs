//! # Thread Reducer
//!
//! Turns one [`Action`] into the storage operations it implies, folds them
//! into the current [`ThreadStore`], and, for server state checks, reports
//! any divergence the server had to correct.
//!
//! ## Identity
//!
//! Whenever an action changes nothing, the returned store shares its map with
//! the input store (`ThreadStore::ptr_eq` holds) and the operation list is
//! empty. Hosts use that to skip persistence and re-rendering.
//!
//! ## Policies
//!
//! | Action | Effect |
//! |---|---|
//! | log in / register / full sync | `remove_all` then one `replace` per thread |
//! | log out / delete account / invalidated session | `remove_all` unless already empty |
//! | thread mutations, incremental sync, processed updates | fold of the update events |
//! | subscription update | `replace` with the new subscription |
//! | saved messages | mark threads with newer messages unread |
//! | server CHECK_STATE | apply corrections, then detect divergence |
//! | activity update | mark unfocused threads unread |
//! | unread toggle started | optimistic `replace` |
//! | unread toggle success | force unread when the server reset it |
//! | set thread store | adopt the given store verbatim |
//! | anything else | nothing |

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::client::inconsistency::InconsistencyDetector;
use crate::client::reconciler::process_thread_store_operations;
use crate::shared::action::{
    Action, FullSyncPayload, ProcessServerRequestsPayload, SaveMessagesPayload,
    SetThreadUnreadStatusPayload, SetThreadUnreadStatusResult, SubscriptionUpdatePayload,
    UpdateActivityPayload, UpdatesPayload,
};
use crate::shared::operation::ThreadStoreOperation;
use crate::shared::report::ClientThreadInconsistencyReport;
use crate::shared::thread::{ThreadId, ThreadInfos, ThreadStore};
use crate::shared::update::ClientUpdateInfo;

/// Output of one reduction
#[derive(Debug, Clone)]
pub struct ThreadReducerResult {
    /// The reconciled store
    pub thread_store: ThreadStore,
    /// Divergence reports; only ever produced for server state checks
    pub new_thread_inconsistencies: Vec<ClientThreadInconsistencyReport>,
    /// Operations that turn the input store into `thread_store`
    pub thread_store_operations: Vec<ThreadStoreOperation>,
}

impl ThreadReducerResult {
    /// Result that leaves `state` untouched
    fn unchanged(state: &ThreadStore) -> Self {
        Self {
            thread_store: state.clone(),
            new_thread_inconsistencies: Vec::new(),
            thread_store_operations: Vec::new(),
        }
    }

    /// Apply `operations` to `state` and wrap the outcome
    fn from_operations(state: &ThreadStore, operations: Vec<ThreadStoreOperation>) -> Self {
        let thread_store = process_thread_store_operations(state, &operations);
        Self {
            thread_store,
            new_thread_inconsistencies: Vec::new(),
            thread_store_operations: operations,
        }
    }
}

/// Outcome of folding a batch of update events
#[derive(Debug, Clone)]
pub struct ThreadUpdatesOutcome {
    pub thread_store_operations: Vec<ThreadStoreOperation>,
    /// Working map after the fold; the input map itself when nothing changed
    pub thread_infos: Arc<ThreadInfos>,
}

/// Fold an ordered batch of update events over `thread_infos`
///
/// Events are applied left to right to a working copy of the map, so a later
/// event for an ID sees what an earlier one did. Events naming threads the
/// client doesn't have are ignored.
pub fn reduce_thread_updates(
    thread_infos: &Arc<ThreadInfos>,
    updates: &[ClientUpdateInfo],
) -> ThreadUpdatesOutcome {
    let mut updated: ThreadInfos = (**thread_infos).clone();
    let mut operations = Vec::new();

    for update in updates {
        match update {
            ClientUpdateInfo::UpdateThread { thread_info, .. }
            | ClientUpdateInfo::JoinThread { thread_info, .. } => {
                let unchanged = updated
                    .get(&thread_info.id)
                    .is_some_and(|existing| **existing == *thread_info);
                if unchanged {
                    continue;
                }
                let record = Arc::new(thread_info.clone());
                updated.insert(thread_info.id.clone(), Arc::clone(&record));
                operations.push(ThreadStoreOperation::replace(record));
            }
            ClientUpdateInfo::UpdateThreadReadStatus {
                thread_id, unread, ..
            } => {
                let Some(existing) = updated.get(thread_id) else {
                    continue;
                };
                if existing.current_user.unread == *unread {
                    continue;
                }
                let record = Arc::new(existing.with_unread(*unread));
                updated.insert(thread_id.clone(), Arc::clone(&record));
                operations.push(ThreadStoreOperation::replace(record));
            }
            ClientUpdateInfo::DeleteThread { thread_id, .. } => {
                if updated.remove(thread_id).is_some() {
                    operations.push(ThreadStoreOperation::remove(vec![thread_id.clone()]));
                }
            }
            ClientUpdateInfo::DeleteAccount {
                deleted_user_id, ..
            } => {
                let shrunk: Vec<Arc<_>> = updated
                    .values()
                    .filter_map(|thread| thread.without_member(deleted_user_id))
                    .map(Arc::new)
                    .collect();
                for record in shrunk {
                    updated.insert(record.id.clone(), Arc::clone(&record));
                    operations.push(ThreadStoreOperation::replace(record));
                }
            }
            ClientUpdateInfo::Unhandled => {}
        }
    }

    if operations.is_empty() {
        return ThreadUpdatesOutcome {
            thread_store_operations: operations,
            thread_infos: Arc::clone(thread_infos),
        };
    }
    ThreadUpdatesOutcome {
        thread_store_operations: operations,
        thread_infos: Arc::new(updated),
    }
}

/// Reduce one action against the current thread store
pub fn reduce_thread_infos(
    state: &ThreadStore,
    action: &Action,
    detector: &InconsistencyDetector<'_>,
) -> ThreadReducerResult {
    let result = match action {
        Action::LogInSuccess(payload)
        | Action::RegisterSuccess(payload)
        | Action::FullStateSync(payload) => reduce_full_sync(state, payload),

        Action::LogOutSuccess | Action::DeleteAccountSuccess => reduce_clear(state),
        Action::SetNewSession(payload) if payload.session_change.cookie_invalidated => {
            reduce_clear(state)
        }

        Action::JoinThreadSuccess(payload)
        | Action::LeaveThreadSuccess(payload)
        | Action::DeleteThreadSuccess(payload)
        | Action::ChangeThreadSettingsSuccess(payload)
        | Action::RemoveUsersFromThreadSuccess(payload)
        | Action::ChangeThreadMemberRolesSuccess(payload)
        | Action::IncrementalStateSync(payload)
        | Action::ProcessUpdates(payload)
        | Action::NewThreadSuccess(payload) => reduce_updates(state, payload),

        Action::UpdateSubscriptionSuccess(payload) => reduce_subscription(state, payload),
        Action::SaveMessages(payload) => reduce_saved_messages(state, payload),
        Action::ProcessServerRequests(payload) => {
            reduce_server_requests(state, action, payload, detector)
        }
        Action::UpdateActivitySuccess(payload) => reduce_activity(state, payload),
        Action::SetThreadUnreadStatusStarted(payload) => reduce_unread_started(state, payload),
        Action::SetThreadUnreadStatusSuccess(payload) => reduce_unread_success(state, payload),

        Action::SetThreadStore(thread_store) => ThreadReducerResult {
            thread_store: thread_store.clone(),
            new_thread_inconsistencies: Vec::new(),
            thread_store_operations: Vec::new(),
        },

        Action::SetNewSession(_) | Action::Unrecognized => ThreadReducerResult::unchanged(state),
    };

    tracing::debug!(
        action = action.action_type(),
        operations = result.thread_store_operations.len(),
        inconsistencies = result.new_thread_inconsistencies.len(),
        "Reduced thread store"
    );
    result
}

fn reduce_full_sync(state: &ThreadStore, payload: &FullSyncPayload) -> ThreadReducerResult {
    let mut operations = Vec::with_capacity(payload.thread_infos.len() + 1);
    operations.push(ThreadStoreOperation::RemoveAll);
    // keyed by the record's own id
    operations.extend(payload.thread_infos.iter().map(|(key, thread_info)| {
        if *key != thread_info.id {
            tracing::warn!(
                "Full sync keyed thread {} under {}, using the record's id",
                thread_info.id,
                key
            );
        }
        ThreadStoreOperation::replace(Arc::new(thread_info.clone()))
    }));
    ThreadReducerResult::from_operations(state, operations)
}

fn reduce_clear(state: &ThreadStore) -> ThreadReducerResult {
    if state.is_empty() {
        return ThreadReducerResult::unchanged(state);
    }
    ThreadReducerResult::from_operations(state, vec![ThreadStoreOperation::RemoveAll])
}

fn reduce_updates(state: &ThreadStore, payload: &UpdatesPayload) -> ThreadReducerResult {
    if payload.updates_result.new_updates.is_empty() {
        return ThreadReducerResult::unchanged(state);
    }
    let outcome = reduce_thread_updates(&state.thread_infos, &payload.updates_result.new_updates);
    ThreadReducerResult::from_operations(state, outcome.thread_store_operations)
}

fn reduce_subscription(
    state: &ThreadStore,
    payload: &SubscriptionUpdatePayload,
) -> ThreadReducerResult {
    let Some(existing) = state.get(&payload.thread_id) else {
        tracing::warn!(
            "Subscription update for unknown thread {}, ignoring",
            payload.thread_id
        );
        return ThreadReducerResult::unchanged(state);
    };
    let record = Arc::new(existing.with_subscription(payload.subscription));
    ThreadReducerResult::from_operations(state, vec![ThreadStoreOperation::replace(record)])
}

fn reduce_saved_messages(state: &ThreadStore, payload: &SaveMessagesPayload) -> ThreadReducerResult {
    let mut most_recent: BTreeMap<&ThreadId, i64> = BTreeMap::new();
    for message in &payload.raw_message_infos {
        most_recent
            .entry(&message.thread_id)
            .and_modify(|time| *time = (*time).max(message.time))
            .or_insert(message.time);
    }

    let operations: Vec<ThreadStoreOperation> = most_recent
        .into_iter()
        .filter_map(|(thread_id, time)| {
            let existing = state.get(thread_id)?;
            if existing.current_user.unread || payload.updates_current_as_of > time {
                return None;
            }
            Some(ThreadStoreOperation::replace(Arc::new(existing.with_unread(true))))
        })
        .collect();

    if operations.is_empty() {
        return ThreadReducerResult::unchanged(state);
    }
    ThreadReducerResult::from_operations(state, operations)
}

fn reduce_server_requests(
    state: &ThreadStore,
    action: &Action,
    payload: &ProcessServerRequestsPayload,
    detector: &InconsistencyDetector<'_>,
) -> ThreadReducerResult {
    let Some(changes) = payload.check_state_changes() else {
        return ThreadReducerResult::unchanged(state);
    };
    if changes.raw_thread_infos.is_none() && changes.delete_thread_ids.is_none() {
        return ThreadReducerResult::unchanged(state);
    }

    let mut operations = Vec::new();
    if let Some(raw_thread_infos) = &changes.raw_thread_infos {
        operations.extend(
            raw_thread_infos
                .iter()
                .map(|thread_info| ThreadStoreOperation::replace(Arc::new(thread_info.clone()))),
        );
    }
    if let Some(delete_thread_ids) = &changes.delete_thread_ids {
        operations.push(ThreadStoreOperation::remove(delete_thread_ids.clone()));
    }

    let mut result = ThreadReducerResult::from_operations(state, operations);
    result.new_thread_inconsistencies =
        detector.detect(action, &state.thread_infos, &result.thread_store.thread_infos);
    result
}

fn reduce_activity(state: &ThreadStore, payload: &UpdateActivityPayload) -> ThreadReducerResult {
    let mut changed: BTreeMap<&ThreadId, ThreadStoreOperation> = BTreeMap::new();
    for thread_id in &payload.result.unfocused_to_unread {
        let Some(existing) = state.get(thread_id) else {
            continue;
        };
        if existing.current_user.unread {
            continue;
        }
        changed.insert(
            thread_id,
            ThreadStoreOperation::replace(Arc::new(existing.with_unread(true))),
        );
    }
    if changed.is_empty() {
        return ThreadReducerResult::unchanged(state);
    }
    ThreadReducerResult::from_operations(state, changed.into_values().collect())
}

fn reduce_unread_started(
    state: &ThreadStore,
    payload: &SetThreadUnreadStatusPayload,
) -> ThreadReducerResult {
    let Some(existing) = state.get(&payload.thread_id) else {
        tracing::warn!(
            "Unread status change for unknown thread {}, ignoring",
            payload.thread_id
        );
        return ThreadReducerResult::unchanged(state);
    };
    let record = Arc::new(existing.with_unread(payload.unread));
    ThreadReducerResult::from_operations(state, vec![ThreadStoreOperation::replace(record)])
}

fn reduce_unread_success(
    state: &ThreadStore,
    payload: &SetThreadUnreadStatusResult,
) -> ThreadReducerResult {
    let Some(existing) = state.get(&payload.thread_id) else {
        tracing::warn!(
            "Unread status confirmation for unknown thread {}, ignoring",
            payload.thread_id
        );
        return ThreadReducerResult::unchanged(state);
    };
    if !payload.reset_to_unread || existing.current_user.unread {
        return ThreadReducerResult::unchanged(state);
    }
    let record = Arc::new(existing.with_unread(true));
    ThreadReducerResult::from_operations(state, vec![ThreadStoreOperation::replace(record)])
}
