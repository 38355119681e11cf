//! Property-based tests for the thread reducer and update fold

use proptest::prelude::*;
use std::sync::Arc;

use crate::common::*;
use threadsync::client::{process_thread_store_operations, reduce_thread_updates};
use threadsync::shared::action::UpdatesPayload;
use threadsync::shared::{
    Action, ClientUpdateInfo, MemberInfo, RawThreadInfo, ThreadStore, UpdatesResult,
};

const THREAD_IDS: &[&str] = &["t0", "t1", "t2", "t3", "t4"];
const USERS: &[&str] = &["alice", "bob", "carol", "dave"];

fn arb_thread() -> impl Strategy<Value = RawThreadInfo> {
    (
        prop::sample::select(THREAD_IDS),
        any::<bool>(),
        prop::sample::subsequence(USERS, 0..=USERS.len()),
        0u32..3,
    )
        .prop_map(|(id, unread, members, replies_count)| {
            let mut thread = thread(id, unread);
            thread.members = members
                .into_iter()
                .map(|member| MemberInfo::new(member, None))
                .collect();
            thread.replies_count = replies_count;
            thread
        })
}

fn arb_store() -> impl Strategy<Value = ThreadStore> {
    prop::collection::vec(arb_thread(), 0..6).prop_map(store)
}

fn arb_update() -> impl Strategy<Value = ClientUpdateInfo> {
    prop_oneof![
        arb_thread().prop_map(|thread| ClientUpdateInfo::update_thread("u", 1, thread)),
        arb_thread().prop_map(|thread| ClientUpdateInfo::join_thread("u", 1, thread)),
        (prop::sample::select(THREAD_IDS), any::<bool>())
            .prop_map(|(id, unread)| ClientUpdateInfo::read_status("u", 1, id, unread)),
        prop::sample::select(THREAD_IDS).prop_map(|id| ClientUpdateInfo::delete_thread("u", 1, id)),
        prop::sample::select(USERS).prop_map(|user| ClientUpdateInfo::delete_account("u", 1, user)),
        Just(ClientUpdateInfo::Unhandled),
    ]
}

fn with_updates(kind: usize, updates: Vec<ClientUpdateInfo>) -> Action {
    let payload = UpdatesPayload::new(UpdatesResult::new(0, updates));
    match kind {
        0 => Action::JoinThreadSuccess(payload),
        1 => Action::LeaveThreadSuccess(payload),
        2 => Action::DeleteThreadSuccess(payload),
        3 => Action::ChangeThreadSettingsSuccess(payload),
        4 => Action::RemoveUsersFromThreadSuccess(payload),
        5 => Action::ChangeThreadMemberRolesSuccess(payload),
        6 => Action::IncrementalStateSync(payload),
        7 => Action::ProcessUpdates(payload),
        _ => Action::NewThreadSuccess(payload),
    }
}

proptest! {
    #[test]
    fn test_fold_matches_operations(
        state in arb_store(),
        updates in prop::collection::vec(arb_update(), 0..12),
    ) {
        let outcome = reduce_thread_updates(&state.thread_infos, &updates);
        let applied = process_thread_store_operations(&state, &outcome.thread_store_operations);
        prop_assert_eq!(&*outcome.thread_infos, &*applied.thread_infos);

        let result = Harness::default().reduce(&state, &process_updates(updates));
        let reapplied = process_thread_store_operations(&state, &result.thread_store_operations);
        prop_assert_eq!(result.thread_store, reapplied);
    }

    #[test]
    fn test_empty_updates_keep_identity(state in arb_store(), kind in 0usize..9) {
        let result = Harness::default().reduce(&state, &with_updates(kind, Vec::new()));
        prop_assert!(result.thread_store_operations.is_empty());
        prop_assert!(result.thread_store.ptr_eq(&state));
    }

    #[test]
    fn test_ineffective_updates_keep_identity(state in arb_store(), kind in 0usize..9) {
        // re-sending every thread unchanged is a no-op
        let updates = state
            .thread_infos
            .values()
            .map(|thread| ClientUpdateInfo::update_thread("u", 1, (**thread).clone()))
            .collect();
        let result = Harness::default().reduce(&state, &with_updates(kind, updates));
        prop_assert!(result.thread_store_operations.is_empty());
        prop_assert!(result.thread_store.ptr_eq(&state));
    }

    #[test]
    fn test_delete_account_completeness(state in arb_store(), user in prop::sample::select(USERS)) {
        let updates = vec![ClientUpdateInfo::delete_account("u", 1, user)];
        let outcome = reduce_thread_updates(&state.thread_infos, &updates);

        for (id, before) in state.thread_infos.iter() {
            let after = &outcome.thread_infos[id];
            prop_assert!(!after.has_member(user));
            if !before.has_member(user) {
                prop_assert!(Arc::ptr_eq(before, after));
            }
        }
        prop_assert_eq!(outcome.thread_infos.len(), state.len());
    }

    #[test]
    fn test_unrecognized_action_keeps_identity(state in arb_store()) {
        let result = Harness::default().reduce(&state, &Action::Unrecognized);
        prop_assert!(result.thread_store_operations.is_empty());
        prop_assert!(result.thread_store.ptr_eq(&state));
    }
}
