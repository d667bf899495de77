//! Teacher repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide teacher lookups and teacher-with-roster projections.
//! - Own link creation keyed by `(teacher_id, student_id)`.
//!
//! # Invariants
//! - At most one link exists per pair; the composite primary key enforces it
//!   even under concurrent registration.
//! - Links reference existing rows (`foreign_keys=ON`).
//! - Roster students are ordered by email.

use crate::model::student::{Student, StudentId};
use crate::model::teacher::{Teacher, TeacherId, TeacherRoster};
use crate::repo::student_repo::parse_student_row;
use crate::repo::{parse_uuid, placeholders, RepoResult, EMAIL_CHUNK_SIZE};
use rusqlite::{params, params_from_iter, Connection, Row};

const TEACHER_SELECT_SQL: &str = "SELECT
    id,
    email,
    created_at,
    updated_at
FROM teachers";

/// Repository interface for teachers and their roster links.
pub trait TeacherRepository {
    /// Inserts one teacher and returns its stable id.
    fn create_teacher(&self, teacher: &Teacher) -> RepoResult<TeacherId>;
    fn get_teacher_by_email(&self, email: &str) -> RepoResult<Option<Teacher>>;
    /// Gets one teacher together with all linked students.
    fn get_teacher_roster(&self, email: &str) -> RepoResult<Option<TeacherRoster>>;
    /// Returns rosters for the existing subset of `emails`.
    fn list_teacher_rosters(&self, emails: &[String]) -> RepoResult<Vec<TeacherRoster>>;
    fn upsert_link(&self, teacher_id: TeacherId, student_id: StudentId) -> RepoResult<bool>;
}

/// SQLite-backed teacher repository.
pub struct SqliteTeacherRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTeacherRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_roster(&self, teacher: Teacher) -> RepoResult<TeacherRoster> {
        let students = load_students_for_teacher(self.conn, teacher.id)?;
        Ok(TeacherRoster { teacher, students })
    }
}

impl TeacherRepository for SqliteTeacherRepository<'_> {
    fn create_teacher(&self, teacher: &Teacher) -> RepoResult<TeacherId> {
        teacher.validate()?;

        self.conn.execute(
            "INSERT INTO teachers (id, email) VALUES (?1, ?2);",
            params![teacher.id.to_string(), teacher.email.as_str()],
        )?;

        Ok(teacher.id)
    }

    fn get_teacher_by_email(&self, email: &str) -> RepoResult<Option<Teacher>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEACHER_SELECT_SQL} WHERE email = ?1;"))?;
        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_teacher_row(row)?));
        }

        Ok(None)
    }

    fn get_teacher_roster(&self, email: &str) -> RepoResult<Option<TeacherRoster>> {
        match self.get_teacher_by_email(email)? {
            Some(teacher) => Ok(Some(self.load_roster(teacher)?)),
            None => Ok(None),
        }
    }

    fn list_teacher_rosters(&self, emails: &[String]) -> RepoResult<Vec<TeacherRoster>> {
        let mut teachers = Vec::new();
        for chunk in emails.chunks(EMAIL_CHUNK_SIZE) {
            let sql = format!(
                "{TEACHER_SELECT_SQL} WHERE email IN ({});",
                placeholders(chunk.len())
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
            while let Some(row) = rows.next()? {
                teachers.push(parse_teacher_row(row)?);
            }
        }

        teachers.sort_by(|left, right| left.email.cmp(&right.email));
        teachers.dedup_by_key(|teacher| teacher.id);
        teachers
            .into_iter()
            .map(|teacher| self.load_roster(teacher))
            .collect()
    }

    fn upsert_link(&self, teacher_id: TeacherId, student_id: StudentId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT INTO teacher_students (teacher_id, student_id)
             VALUES (?1, ?2)
             ON CONFLICT(teacher_id, student_id) DO NOTHING;",
            params![teacher_id.to_string(), student_id.to_string()],
        )?;

        Ok(changed > 0)
    }
}

fn load_students_for_teacher(
    conn: &Connection,
    teacher_id: TeacherId,
) -> RepoResult<Vec<Student>> {
    let mut stmt = conn.prepare(
        "SELECT
            s.id AS id,
            s.email AS email,
            s.is_suspended AS is_suspended,
            s.created_at AS created_at,
            s.updated_at AS updated_at
         FROM teacher_students ts
         INNER JOIN students s ON s.id = ts.student_id
         WHERE ts.teacher_id = ?1
         ORDER BY s.email ASC;",
    )?;

    let mut rows = stmt.query([teacher_id.to_string()])?;
    let mut students = Vec::new();
    while let Some(row) = rows.next()? {
        students.push(parse_student_row(row)?);
    }

    Ok(students)
}

fn parse_teacher_row(row: &Row<'_>) -> RepoResult<Teacher> {
    let id_text: String = row.get("id")?;
    let teacher = Teacher {
        id: parse_uuid(&id_text, "teachers.id")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    teacher.validate()?;
    Ok(teacher)
}
