use postform_core::{ConnectionManager, DbConfig, DbLocation};

#[test]
fn manager_opens_lazily_and_memoizes() {
    let mut manager = ConnectionManager::new(DbConfig::in_memory());
    assert!(!manager.is_open());

    manager
        .get_connection()
        .unwrap()
        .execute("INSERT INTO author (name) VALUES ('kept');", [])
        .unwrap();
    assert!(manager.is_open());

    // A second in-memory open would be empty; seeing the row proves reuse.
    let count: i64 = manager
        .get_connection()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM author;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);

    manager.close().unwrap();
}

#[test]
fn failed_first_open_leaves_cache_empty_and_retries() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("not-yet");
    let mut manager = ConnectionManager::new(DbConfig::default_in(&nested));

    assert!(manager.get_connection().is_err());
    assert!(!manager.is_open());

    std::fs::create_dir_all(&nested).unwrap();
    manager.get_connection().unwrap();
    assert!(manager.is_open());
    assert!(nested.join("expo.sqlite3").exists());
}

#[test]
fn eager_open_and_close_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ConnectionManager::open(DbConfig::default_in(dir.path())).unwrap();
    assert!(manager.is_open());
    assert_eq!(
        manager.config().location,
        DbLocation::File(dir.path().join("expo.sqlite3"))
    );
    manager.close().unwrap();

    // Closing a manager that never opened is fine too.
    ConnectionManager::new(DbConfig::in_memory()).close().unwrap();
}
