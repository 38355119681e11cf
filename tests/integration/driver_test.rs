//! Driver and local database integration tests

use pretty_assertions::assert_eq;
use serial_test::serial;

use crate::common::*;
use threadsync::client::{DriverError, ThreadStoreDriver};
use threadsync::shared::action::{FullSyncPayload, SessionChange, SetNewSessionPayload};
use threadsync::shared::config::{ACTION_LOG_CAPACITY_ENV, DB_PATH_ENV};
use threadsync::shared::{Action, AppConfig, ClientUpdateInfo, ConfigError};

#[tokio::test]
async fn test_persisted_cache_matches_store() {
    let db = memory_db().await;
    let mut driver = ThreadStoreDriver::new(&AppConfig::default()).with_database(db.clone());

    let actions = vec![
        log_in(vec![
            thread("t1", false),
            thread_with_members("t2", &["alice", "bob"]),
        ]),
        process_updates(vec![
            ClientUpdateInfo::read_status("u1", 5, "t1", true),
            ClientUpdateInfo::join_thread("u2", 6, thread("t3", false)),
            ClientUpdateInfo::delete_account("u3", 7, "bob"),
        ]),
        process_updates(vec![ClientUpdateInfo::delete_thread("u4", 8, "t3")]),
    ];
    for action in &actions {
        assert_ok!(driver.dispatch(action).await);
        let cached = assert_ok!(db.get_all_threads().await);
        assert_eq!(cached, *driver.store().thread_infos);
    }
    assert_eq!(driver.action_log().len(), actions.len());
}

#[tokio::test]
async fn test_invalidated_session_clears_cache() {
    let db = memory_db().await;
    let mut driver = ThreadStoreDriver::new(&AppConfig::default()).with_database(db.clone());
    assert_ok!(driver.dispatch(&log_in(vec![thread("t1", false)])).await);

    let keep = Action::SetNewSession(SetNewSessionPayload {
        session_change: SessionChange {
            cookie_invalidated: false,
            cookie: Some("fresh".to_string()),
        },
    });
    let result = assert_ok!(driver.dispatch(&keep).await);
    assert!(result.thread_store_operations.is_empty());
    assert_eq!(assert_ok!(db.thread_count().await), 1);

    let invalidate = Action::SetNewSession(SetNewSessionPayload {
        session_change: SessionChange {
            cookie_invalidated: true,
            cookie: None,
        },
    });
    assert_ok!(driver.dispatch(&invalidate).await);
    assert!(driver.store().is_empty());
    assert_eq!(assert_ok!(db.thread_count().await), 0);
}

#[tokio::test]
async fn test_failed_batch_rolls_back() {
    let db = memory_db().await;
    assert_ok!(
        sqlx::query(
            "CREATE TRIGGER reject_bad BEFORE INSERT ON threads
             WHEN NEW.id = 'bad'
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(db.pool())
        .await
    );

    let mut driver = ThreadStoreDriver::new(&AppConfig::default()).with_database(db.clone());
    let before = driver.store().clone();
    let action = process_updates(vec![
        ClientUpdateInfo::join_thread("u1", 1, thread("good", false)),
        ClientUpdateInfo::join_thread("u2", 2, thread("bad", false)),
    ]);

    assert_err!(driver.dispatch(&action).await, DriverError::LocalDb(_));
    assert_eq!(assert_ok!(db.thread_count().await), 0);
    assert!(driver.store().ptr_eq(&before));
    assert!(driver.action_log().is_empty());

    // the same store keeps working once the bad record is gone
    let retry = process_updates(vec![ClientUpdateInfo::join_thread(
        "u3",
        3,
        thread("good", false),
    )]);
    assert_ok!(driver.dispatch(&retry).await);
    assert_eq!(assert_ok!(db.thread_count().await), 1);
    assert_eq!(driver.action_log().len(), 1);
}

#[tokio::test]
async fn test_full_sync_with_mismatched_key_restores_same_store() {
    let db = memory_db().await;
    let mut driver = ThreadStoreDriver::new(&AppConfig::default()).with_database(db.clone());

    let mut thread_infos = std::collections::BTreeMap::new();
    thread_infos.insert("k1".to_string(), thread("t1", true));
    let action = Action::LogInSuccess(FullSyncPayload {
        thread_infos,
        updates_current_as_of: 0,
    });
    assert_ok!(driver.dispatch(&action).await);
    assert_thread_ids!(driver.store(), ["t1"]);

    let mut restored = ThreadStoreDriver::new(&AppConfig::default()).with_database(db);
    let store = assert_ok!(restored.restore().await).clone();
    assert_eq!(store, *driver.store());
}

#[tokio::test]
async fn test_restore_from_file_database() {
    let (db, _dir) = file_db().await;
    {
        let mut driver = ThreadStoreDriver::new(&AppConfig::default()).with_database(db.clone());
        assert_ok!(
            driver
                .dispatch(&log_in(vec![thread("t1", true), thread("t2", false)]))
                .await
        );
    }

    let mut restored = ThreadStoreDriver::new(&AppConfig::default()).with_database(db);
    let store = assert_ok!(restored.restore().await).clone();
    assert_thread_ids!(store, ["t1", "t2"]);
    assert!(store.get("t1").unwrap().current_user.unread);
}

#[test]
#[serial]
fn test_config_env_overrides() {
    std::env::set_var(DB_PATH_ENV, "/tmp/threadsync-test/threads.db");
    std::env::set_var(ACTION_LOG_CAPACITY_ENV, "7");
    let config = AppConfig::from_env();
    std::env::remove_var(DB_PATH_ENV);
    std::env::remove_var(ACTION_LOG_CAPACITY_ENV);

    let config = assert_ok!(config);
    assert_eq!(config.action_log_capacity, 7);
    assert_eq!(
        config.resolved_database_path(),
        std::path::PathBuf::from("/tmp/threadsync-test/threads.db")
    );
}

#[test]
#[serial]
fn test_config_rejects_bad_capacity() {
    std::env::set_var(ACTION_LOG_CAPACITY_ENV, "lots");
    let config = AppConfig::from_env();
    std::env::remove_var(ACTION_LOG_CAPACITY_ENV);

    assert_err!(config, ConfigError::InvalidValue { .. });
}
