use daybook_core::db::migrations::{apply_migrations, latest_version};
use daybook_core::db::{open_db, open_db_in_memory};

#[test]
fn fresh_database_lands_on_latest_version() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("user_version should be readable");
    assert_eq!(version, latest_version());
}

#[test]
fn reapplying_migrations_is_a_no_op() {
    let mut conn = open_db_in_memory().expect("in-memory db should open");
    apply_migrations(&mut conn).expect("second apply should be a no-op");
}

#[test]
fn foreign_keys_are_enabled() {
    let conn = open_db_in_memory().expect("in-memory db should open");
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .expect("pragma should be readable");
    assert_eq!(enabled, 1);
}

#[test]
fn reopening_a_database_file_preserves_schema_state() {
    let dir = tempfile::tempdir().expect("temp dir should be creatable");
    let path = dir.path().join("daybook.db");

    {
        let conn = open_db(&path).expect("file db should open");
        let probe: i64 = conn
            .query_row("SELECT 1;", [], |row| row.get(0))
            .expect("db should be usable");
        assert_eq!(probe, 1);
    }

    let conn = open_db(&path).expect("file db should reopen");
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("user_version should be readable");
    assert_eq!(version, latest_version());
}
