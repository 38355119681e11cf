//! # Store Reconciler
//!
//! Folds an ordered batch of [`ThreadStoreOperation`]s into a thread store.
//!
//! An empty batch hands back the same store (same underlying map), which
//! callers use to skip persistence and re-render work. Otherwise the map is
//! copied shallowly and each operation is applied in order:
//!
//! - `replace` sets or overwrites one entry
//! - `remove` deletes each listed ID, ignoring absent ones
//! - `remove_all` empties the map, whatever came before it in the batch

use std::sync::Arc;

use crate::shared::operation::ThreadStoreOperation;
use crate::shared::thread::{ThreadInfos, ThreadStore};

/// Apply `operations` to `store`, producing the new store
pub fn process_thread_store_operations(
    store: &ThreadStore,
    operations: &[ThreadStoreOperation],
) -> ThreadStore {
    if operations.is_empty() {
        return store.clone();
    }
    let mut processed: ThreadInfos = (*store.thread_infos).clone();
    for operation in operations {
        apply_operation(&mut processed, operation);
    }
    ThreadStore {
        thread_infos: Arc::new(processed),
    }
}

fn apply_operation(thread_infos: &mut ThreadInfos, operation: &ThreadStoreOperation) {
    match operation {
        ThreadStoreOperation::Replace { id, thread_info } => {
            thread_infos.insert(id.clone(), Arc::clone(thread_info));
        }
        ThreadStoreOperation::Remove { ids } => {
            for id in ids {
                thread_infos.remove(id);
            }
        }
        ThreadStoreOperation::RemoveAll => thread_infos.clear(),
    }
}
