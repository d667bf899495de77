use classroom_core::db::open_db_in_memory;
use classroom_core::{
    RepoError, SqliteStudentRepository, SqliteTeacherRepository, Student, StudentRepository,
    Teacher, TeacherRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn add_teacher(conn: &Connection, email: &str) -> Teacher {
    let repo = SqliteTeacherRepository::new(conn);
    let teacher = Teacher::new(email).unwrap();
    repo.create_teacher(&teacher).unwrap();
    repo.get_teacher_by_email(email).unwrap().unwrap()
}

fn add_student(conn: &Connection, email: &str) -> Student {
    let repo = SqliteStudentRepository::new(conn);
    let student = Student::new(email).unwrap();
    repo.create_student(&student).unwrap();
    repo.get_student_by_email(email).unwrap().unwrap()
}

fn link_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM teacher_students;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_and_get_teacher_roundtrip_assigns_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let teacher = add_teacher(&conn, "ken@school.edu");

    assert_eq!(teacher.email, "ken@school.edu");
    assert!(teacher.created_at > 0);
    assert!(teacher.updated_at >= teacher.created_at);
}

#[test]
fn email_lookup_is_case_insensitive() {
    let conn = open_db_in_memory().unwrap();
    add_student(&conn, "jon@school.edu");
    let repo = SqliteStudentRepository::new(&conn);

    let found = repo.get_student_by_email("JON@School.edu").unwrap();
    assert_eq!(found.unwrap().email, "jon@school.edu");
}

#[test]
fn duplicate_email_is_rejected_by_store() {
    let conn = open_db_in_memory().unwrap();
    add_student(&conn, "jon@school.edu");
    let repo = SqliteStudentRepository::new(&conn);

    let err = repo
        .create_student(&Student::new("jon@school.edu").unwrap())
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn create_rejects_unnormalized_email() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTeacherRepository::new(&conn);
    let mut teacher = Teacher::new("ken@school.edu").unwrap();
    teacher.email = " Ken@school.edu".to_string();

    let err = repo.create_teacher(&teacher).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn list_students_by_emails_returns_existing_subset_once() {
    let conn = open_db_in_memory().unwrap();
    add_student(&conn, "a@x.com");
    add_student(&conn, "b@x.com");
    let repo = SqliteStudentRepository::new(&conn);

    let found = repo
        .list_students_by_emails(&[
            "b@x.com".to_string(),
            "missing@x.com".to_string(),
            "a@x.com".to_string(),
            "b@x.com".to_string(),
        ])
        .unwrap();
    let emails: Vec<&str> = found.iter().map(|s| s.email.as_str()).collect();
    assert_eq!(emails, vec!["a@x.com", "b@x.com"]);

    assert!(repo.list_students_by_emails(&[]).unwrap().is_empty());
}

#[test]
fn list_active_students_skips_suspended() {
    let conn = open_db_in_memory().unwrap();
    add_student(&conn, "a@x.com");
    add_student(&conn, "b@x.com");
    let repo = SqliteStudentRepository::new(&conn);
    repo.set_student_suspended("b@x.com", true).unwrap();

    let active = repo
        .list_active_students_by_emails(&["a@x.com".to_string(), "b@x.com".to_string()])
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].email, "a@x.com");
}

#[test]
fn set_student_suspended_returns_updated_row_or_not_found() {
    let conn = open_db_in_memory().unwrap();
    add_student(&conn, "a@x.com");
    let repo = SqliteStudentRepository::new(&conn);

    let updated = repo.set_student_suspended("a@x.com", true).unwrap();
    assert!(updated.is_suspended);
    assert!(!updated.is_active());

    let err = repo.set_student_suspended("ghost@x.com", true).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(email) if email == "ghost@x.com"));
}

#[test]
fn upsert_link_creates_once_per_pair() {
    let conn = open_db_in_memory().unwrap();
    let teacher = add_teacher(&conn, "t@x.com");
    let student = add_student(&conn, "a@x.com");
    let repo = SqliteTeacherRepository::new(&conn);

    assert!(repo.upsert_link(teacher.id, student.id).unwrap());
    assert!(!repo.upsert_link(teacher.id, student.id).unwrap());
    assert_eq!(link_count(&conn), 1);
}

#[test]
fn upsert_link_rejects_unknown_student() {
    let conn = open_db_in_memory().unwrap();
    let teacher = add_teacher(&conn, "t@x.com");
    let repo = SqliteTeacherRepository::new(&conn);

    let err = repo.upsert_link(teacher.id, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert_eq!(link_count(&conn), 0);
}

#[test]
fn roster_projection_lists_linked_students_by_email() {
    let conn = open_db_in_memory().unwrap();
    let t1 = add_teacher(&conn, "t1@x.com");
    let t2 = add_teacher(&conn, "t2@x.com");
    add_teacher(&conn, "t3@x.com");
    let b = add_student(&conn, "b@x.com");
    let a = add_student(&conn, "a@x.com");
    let repo = SqliteTeacherRepository::new(&conn);
    repo.upsert_link(t1.id, b.id).unwrap();
    repo.upsert_link(t1.id, a.id).unwrap();
    repo.upsert_link(t2.id, b.id).unwrap();

    let roster = repo.get_teacher_roster("t1@x.com").unwrap().unwrap();
    assert_eq!(roster.teacher.id, t1.id);
    assert_eq!(roster.student_emails(), vec!["a@x.com", "b@x.com"]);

    let rosters = repo
        .list_teacher_rosters(&[
            "t2@x.com".to_string(),
            "t3@x.com".to_string(),
            "nobody@x.com".to_string(),
        ])
        .unwrap();
    assert_eq!(rosters.len(), 2);
    assert_eq!(rosters[0].student_emails(), vec!["b@x.com"]);
    assert!(rosters[1].students.is_empty());

    assert!(repo.get_teacher_roster("nobody@x.com").unwrap().is_none());
}

/// More emails than SQLite binds in one statement, hits spread across
/// the whole list.
fn oversized_lookup(hits: &[&str]) -> Vec<String> {
    let mut emails: Vec<String> = (0..40_000)
        .map(|index| format!("absent{index}@x.com"))
        .collect();
    emails[0] = hits[0].to_string();
    emails[20_000] = hits[1].to_string();
    emails[39_999] = hits[2].to_string();
    // Same email again in a later batch.
    emails[39_998] = hits[0].to_string();
    emails
}

#[test]
fn set_lookups_accept_more_emails_than_one_statement_binds() {
    let conn = open_db_in_memory().unwrap();
    for email in ["c@x.com", "a@x.com", "b@x.com", "t1@x.com", "t2@x.com", "t3@x.com"] {
        if email.starts_with('t') {
            add_teacher(&conn, email);
        } else {
            add_student(&conn, email);
        }
    }
    let students = SqliteStudentRepository::new(&conn);
    let teachers = SqliteTeacherRepository::new(&conn);
    students.set_student_suspended("b@x.com", true).unwrap();

    let lookup = oversized_lookup(&["c@x.com", "a@x.com", "b@x.com"]);
    let found = students.list_students_by_emails(&lookup).unwrap();
    let emails: Vec<&str> = found.iter().map(|s| s.email.as_str()).collect();
    assert_eq!(emails, vec!["a@x.com", "b@x.com", "c@x.com"]);

    let active = students.list_active_students_by_emails(&lookup).unwrap();
    let emails: Vec<&str> = active.iter().map(|s| s.email.as_str()).collect();
    assert_eq!(emails, vec!["a@x.com", "c@x.com"]);

    let lookup = oversized_lookup(&["t3@x.com", "t1@x.com", "t2@x.com"]);
    let rosters = teachers.list_teacher_rosters(&lookup).unwrap();
    let emails: Vec<&str> = rosters.iter().map(|r| r.teacher.email.as_str()).collect();
    assert_eq!(emails, vec!["t1@x.com", "t2@x.com", "t3@x.com"]);
}
