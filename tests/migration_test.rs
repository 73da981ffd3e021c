mod helpers;

use memory_lane::db;
use memory_lane::db::migrations::{
    get_schema_version, has_column, run_migrations, CURRENT_SCHEMA_VERSION,
};

#[test]
fn fresh_db_migrates_to_current_version() {
    let conn = helpers::test_db();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    assert!(has_column(&conn, "media", "sha256").unwrap());
}

#[test]
fn migrations_are_idempotent() {
    let conn = helpers::test_db();
    run_migrations(&conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn v1_database_gains_digest_column_and_keeps_rows() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();

    assert_eq!(get_schema_version(&conn).unwrap(), 1);
    assert!(!has_column(&conn, "media", "sha256").unwrap());

    conn.execute(
        "INSERT INTO media (id, category, filename, original_filename, content_type, size_bytes, created_at) \
         VALUES ('m1', 'photo', 'x_a.jpg', 'a.jpg', 'image/jpeg', 3, '2024-01-01T00:00:00Z')",
        [],
    )
    .unwrap();

    run_migrations(&conn).unwrap();

    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    let digest: Option<String> = conn
        .query_row("SELECT sha256 FROM media WHERE id = 'm1'", [], |r| r.get(0))
        .unwrap();
    assert!(digest.is_none());
}
