//! Database Schema Definitions
//!
//! Table definitions and migration bookkeeping for the local thread cache.

/// Current database schema version
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Schema migration versions
pub const MIGRATION_VERSIONS: &[i32] = &[1];

/// Migration bookkeeping table
pub const CREATE_SCHEMA_MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
)";

/// One row per cached thread; nested structures are stored as JSON text
pub const CREATE_THREADS_TABLE: &str = "CREATE TABLE IF NOT EXISTS threads (
    id TEXT UNIQUE PRIMARY KEY NOT NULL,
    type INTEGER NOT NULL,
    name TEXT,
    description TEXT,
    color TEXT NOT NULL,
    creation_time BIGINT NOT NULL,
    parent_thread_id TEXT,
    containing_thread_id TEXT,
    community TEXT,
    members TEXT NOT NULL,
    roles TEXT NOT NULL,
    current_user TEXT NOT NULL,
    source_message_id TEXT,
    replies_count INTEGER NOT NULL
)";

/// Check if database needs migration
pub fn needs_migration(current_version: i32) -> bool {
    current_version < CURRENT_SCHEMA_VERSION
}

/// Get pending migrations
pub fn get_pending_migrations(current_version: i32) -> Vec<i32> {
    MIGRATION_VERSIONS
        .iter()
        .filter(|&&v| v > current_version)
        .cloned()
        .collect()
}
