//! Property-based tests for the store reconciler and inconsistency detector

use proptest::prelude::*;
use std::sync::Arc;

use crate::common::*;
use threadsync::client::{process_thread_store_operations, InconsistencyDetector};
use threadsync::shared::{Action, RawThreadInfo, ThreadStore, ThreadStoreOperation};

fn arb_thread() -> impl Strategy<Value = RawThreadInfo> {
    ("t[0-9]", any::<bool>()).prop_map(|(id, unread)| thread(&id, unread))
}

fn arb_store() -> impl Strategy<Value = ThreadStore> {
    prop::collection::vec(arb_thread(), 0..8).prop_map(store)
}

fn arb_operation() -> impl Strategy<Value = ThreadStoreOperation> {
    prop_oneof![
        3 => arb_thread().prop_map(|thread| ThreadStoreOperation::replace(Arc::new(thread))),
        1 => prop::collection::vec("t[0-9]", 0..3).prop_map(ThreadStoreOperation::remove),
    ]
}

proptest! {
    #[test]
    fn test_remove_all_then_replaces(
        state in arb_store(),
        prefix in prop::collection::vec(arb_operation(), 0..5),
        threads in prop::collection::vec(arb_thread(), 0..6),
    ) {
        let mut operations = prefix;
        operations.push(ThreadStoreOperation::RemoveAll);
        operations.extend(
            threads
                .iter()
                .cloned()
                .map(|thread| ThreadStoreOperation::replace(Arc::new(thread))),
        );

        let result = process_thread_store_operations(&state, &operations);
        let expected = store(threads);
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn test_empty_batch_keeps_identity(state in arb_store()) {
        let result = process_thread_store_operations(&state, &[]);
        prop_assert!(result.ptr_eq(&state));
    }

    #[test]
    fn test_batch_never_mutates_input(
        state in arb_store(),
        operations in prop::collection::vec(arb_operation(), 1..6),
    ) {
        let snapshot = (*state.thread_infos).clone();
        let _ = process_thread_store_operations(&state, &operations);
        prop_assert_eq!(&*state.thread_infos, &snapshot);
    }

    #[test]
    fn test_detect_identical_maps_is_empty(state in arb_store()) {
        let harness = Harness::default();
        let detector = InconsistencyDetector::new(
            &harness.history,
            &harness.sanitizer,
            &harness.platform_details,
        );
        let copy = (*state.thread_infos).clone();
        prop_assert!(detector
            .detect(&Action::LogOutSuccess, &state.thread_infos, &copy)
            .is_empty());
    }

    #[test]
    fn test_detect_divergent_maps_reports_once(
        state in arb_store(),
        extra in arb_thread(),
    ) {
        prop_assume!(state.get(&extra.id).map(|t| **t != extra).unwrap_or(true));
        let harness = Harness::default();
        let detector = InconsistencyDetector::new(
            &harness.history,
            &harness.sanitizer,
            &harness.platform_details,
        );
        let mut after = (*state.thread_infos).clone();
        after.insert(extra.id.clone(), Arc::new(extra));
        prop_assert_eq!(
            detector.detect(&Action::LogOutSuccess, &state.thread_infos, &after).len(),
            1
        );
    }
}
