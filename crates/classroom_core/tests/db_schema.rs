use classroom_core::db::schema::latest_version;
use classroom_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_reaches_latest_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(key_columns(&conn, "teachers"), vec!["id"]);
    assert_eq!(key_columns(&conn, "students"), vec!["id"]);
    assert_eq!(
        key_columns(&conn, "teacher_students"),
        vec!["teacher_id", "student_id"]
    );
}

#[test]
fn open_db_enables_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn reopening_a_store_keeps_its_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classroom.db");

    let first = open_db(&path).unwrap();
    first
        .execute("INSERT INTO teachers (id, email) VALUES ('t-1', 't@x.com');", [])
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let teachers: i64 = second
        .query_row("SELECT COUNT(*) FROM teachers;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(teachers, 1);
}

#[test]
fn store_at_first_step_gains_the_link_table_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people-only.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE teachers (id TEXT PRIMARY KEY NOT NULL, email TEXT NOT NULL);
         CREATE TABLE students (id TEXT PRIMARY KEY NOT NULL, email TEXT NOT NULL);
         INSERT INTO students (id, email) VALUES ('s-1', 'a@x.com');
         PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(
        key_columns(&conn, "teacher_students"),
        vec!["teacher_id", "student_id"]
    );
    let students: i64 = conn
        .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(students, 1);
}

#[test]
fn store_from_a_newer_build_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn link_table_without_composite_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unkeyed-links.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE teachers (id TEXT PRIMARY KEY NOT NULL, email TEXT NOT NULL);
         CREATE TABLE students (id TEXT PRIMARY KEY NOT NULL, email TEXT NOT NULL);
         CREATE TABLE teacher_students (teacher_id TEXT NOT NULL, student_id TEXT NOT NULL);
         PRAGMA user_version = 2;",
    )
    .unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaMismatch(detail) => assert!(detail.contains("teacher_students")),
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn key_columns(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk;")
        .unwrap();
    stmt.query_map([table], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}
