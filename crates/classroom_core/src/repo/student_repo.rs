//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide student lookups by email and by email set.
//! - Own the suspended-flag update.
//!
//! # Invariants
//! - Email comparisons are case-insensitive (`COLLATE NOCASE` columns).
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::student::{Student, StudentId};
use crate::repo::{
    bool_to_int, parse_uuid, placeholders, RepoError, RepoResult, EMAIL_CHUNK_SIZE,
};
use rusqlite::{params, params_from_iter, Connection, Row};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    email,
    is_suspended,
    created_at,
    updated_at
FROM students";

/// Repository interface for student persistence.
pub trait StudentRepository {
    /// Inserts one student and returns its stable id.
    fn create_student(&self, student: &Student) -> RepoResult<StudentId>;
    fn get_student_by_email(&self, email: &str) -> RepoResult<Option<Student>>;
    /// Returns the existing subset of `emails`, one row per student.
    fn list_students_by_emails(&self, emails: &[String]) -> RepoResult<Vec<Student>>;
    /// Same as `list_students_by_emails`, limited to non-suspended rows.
    fn list_active_students_by_emails(&self, emails: &[String]) -> RepoResult<Vec<Student>>;
    /// Writes the suspended flag and returns the updated row.
    ///
    /// Fails with `RepoError::NotFound` when no student has `email`.
    fn set_student_suspended(&self, email: &str, suspended: bool) -> RepoResult<Student>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn list_by_emails(&self, emails: &[String], active_only: bool) -> RepoResult<Vec<Student>> {
        let mut students = Vec::new();
        for chunk in emails.chunks(EMAIL_CHUNK_SIZE) {
            let mut sql = format!(
                "{STUDENT_SELECT_SQL} WHERE email IN ({})",
                placeholders(chunk.len())
            );
            if active_only {
                sql.push_str(" AND is_suspended = 0");
            }

            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
            while let Some(row) = rows.next()? {
                students.push(parse_student_row(row)?);
            }
        }

        // Repeated input emails may land in different chunks.
        students.sort_by(|left, right| left.email.cmp(&right.email));
        students.dedup_by_key(|student| student.id);
        Ok(students)
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(&self, student: &Student) -> RepoResult<StudentId> {
        student.validate()?;

        self.conn.execute(
            "INSERT INTO students (id, email, is_suspended) VALUES (?1, ?2, ?3);",
            params![
                student.id.to_string(),
                student.email.as_str(),
                bool_to_int(student.is_suspended),
            ],
        )?;

        Ok(student.id)
    }

    fn get_student_by_email(&self, email: &str) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn list_students_by_emails(&self, emails: &[String]) -> RepoResult<Vec<Student>> {
        self.list_by_emails(emails, false)
    }

    fn list_active_students_by_emails(&self, emails: &[String]) -> RepoResult<Vec<Student>> {
        self.list_by_emails(emails, true)
    }

    fn set_student_suspended(&self, email: &str, suspended: bool) -> RepoResult<Student> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                is_suspended = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE email = ?2;",
            params![bool_to_int(suspended), email],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(email.to_string()));
        }

        self.get_student_by_email(email)?
            .ok_or_else(|| RepoError::NotFound(email.to_string()))
    }
}

pub(crate) fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid(&id_text, "students.id")?;

    let is_suspended = match row.get::<_, i64>("is_suspended")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_suspended value `{other}` in students.is_suspended"
            )));
        }
    };

    let student = Student {
        id,
        email: row.get("email")?,
        is_suspended,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    student.validate()?;
    Ok(student)
}
