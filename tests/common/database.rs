//! Database test fixtures

use tempfile::TempDir;
use threadsync::client::LocalDatabase;

/// Fresh private in-memory database
pub async fn memory_db() -> LocalDatabase {
    match LocalDatabase::in_memory().await {
        Ok(db) => db,
        Err(e) => panic!("Failed to open in-memory database: {:?}", e),
    }
}

/// File-backed database in a temporary directory
///
/// The directory is removed when the returned `TempDir` is dropped.
pub async fn file_db() -> (LocalDatabase, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = LocalDatabase::open(dir.path().join("threads.db"))
        .await
        .expect("Failed to open file database");
    (db, dir)
}
