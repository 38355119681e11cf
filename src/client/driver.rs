//! # Thread Store Driver
//!
//! Owns the pieces a host needs to run the thread store: the current
//! [`ThreadStore`], the action history, the sanitizer and platform details
//! for reports, and optionally a [`LocalDatabase`] mirroring the store.
//!
//! Each dispatched action is recorded in history, reduced, and its
//! operations, if any, are written to the database in one transaction.

use thiserror::Error;

use crate::client::action_log::ActionLogger;
use crate::client::inconsistency::InconsistencyDetector;
use crate::client::local_db::{LocalDatabase, LocalDbError};
use crate::client::reducer::{reduce_thread_infos, ThreadReducerResult};
use crate::client::sanitize::ActionSanitizer;
use crate::shared::action::Action;
use crate::shared::config::AppConfig;
use crate::shared::report::PlatformDetails;
use crate::shared::thread::ThreadStore;

/// Driver errors
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Local database error: {0}")]
    LocalDb(#[from] LocalDbError),
}

/// Runs actions through the reducer and keeps the local cache in step
#[derive(Debug)]
pub struct ThreadStoreDriver {
    store: ThreadStore,
    logger: ActionLogger,
    sanitizer: ActionSanitizer,
    platform_details: PlatformDetails,
    db: Option<LocalDatabase>,
}

impl ThreadStoreDriver {
    /// Create a driver with an empty store and no persistence
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: ThreadStore::new(),
            logger: ActionLogger::from_config(config),
            sanitizer: ActionSanitizer::from_config(config),
            platform_details: config.platform_details.clone(),
            db: None,
        }
    }

    /// Mirror every change into `db`
    pub fn with_database(mut self, db: LocalDatabase) -> Self {
        self.db = Some(db);
        self
    }

    /// Current thread store
    pub fn store(&self) -> &ThreadStore {
        &self.store
    }

    /// Action history feeding inconsistency reports
    pub fn action_log(&self) -> &ActionLogger {
        &self.logger
    }

    pub fn database(&self) -> Option<&LocalDatabase> {
        self.db.as_ref()
    }

    /// Record, reduce and persist one action
    ///
    /// The in-memory store only advances once the operations are persisted,
    /// so a failed write leaves store and cache in agreement. A failed action
    /// is also dropped from history.
    pub async fn dispatch(&mut self, action: &Action) -> Result<ThreadReducerResult, DriverError> {
        let recorded = self.logger.record(action);

        let result = {
            let detector =
                InconsistencyDetector::new(&self.logger, &self.sanitizer, &self.platform_details);
            reduce_thread_infos(&self.store, action, &detector)
        };

        if let Some(db) = &self.db {
            if !result.thread_store_operations.is_empty() {
                if let Err(e) = db
                    .process_thread_store_operations(&result.thread_store_operations)
                    .await
                {
                    tracing::error!(
                        "Failed to persist {} operations for {}: {}",
                        result.thread_store_operations.len(),
                        action.action_type(),
                        e
                    );
                    if recorded {
                        self.logger.discard_latest();
                    }
                    return Err(e.into());
                }
            }
        }

        if !result.new_thread_inconsistencies.is_empty() {
            tracing::warn!(
                "{} produced {} thread inconsistency report(s)",
                action.action_type(),
                result.new_thread_inconsistencies.len()
            );
        }

        self.store = result.thread_store.clone();
        Ok(result)
    }

    /// Load the cached threads and adopt them as the current store
    ///
    /// Without a database this is a no-op that returns the current store.
    pub async fn restore(&mut self) -> Result<&ThreadStore, DriverError> {
        let Some(db) = &self.db else {
            return Ok(&self.store);
        };
        let thread_infos = db.get_all_threads().await?;
        tracing::info!("Restored {} threads from local database", thread_infos.len());

        let action = Action::SetThreadStore(ThreadStore::from_thread_infos(thread_infos));
        let detector =
            InconsistencyDetector::new(&self.logger, &self.sanitizer, &self.platform_details);
        self.store = reduce_thread_infos(&self.store, &action, &detector).thread_store;
        Ok(&self.store)
    }
}
