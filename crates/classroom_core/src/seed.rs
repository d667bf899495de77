//! Demo data seeding for local runs.
//!
//! # Invariants
//! - Seeding is idempotent: rows that already exist are skipped.
//! - Seeding never suspends or unlinks anything.

use crate::model::student::Student;
use crate::model::teacher::Teacher;
use crate::repo::{
    RepoResult, SqliteStudentRepository, SqliteTeacherRepository, StudentRepository,
    TeacherRepository,
};
use log::info;
use rusqlite::Connection;

const SEED_TEACHERS: &[&str] = &["teacher1@example.com", "teacher2@example.com"];
const SEED_STUDENTS: &[&str] = &[
    "studentjon@example.com",
    "studenthon@example.com",
    "student3@example.com",
    "student4@example.com",
    "student5@example.com",
    "student6@example.com",
];
const SEED_LINKS: &[(&str, &str)] = &[("teacher1@example.com", "studentjon@example.com")];

/// Row counts inserted by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub teachers: usize,
    pub students: usize,
    pub links: usize,
}

/// Inserts the demo teachers, students and links that are not present yet.
pub fn seed_demo_data(conn: &Connection) -> RepoResult<SeedReport> {
    let teachers = SqliteTeacherRepository::new(conn);
    let students = SqliteStudentRepository::new(conn);
    let mut report = SeedReport::default();

    for email in SEED_TEACHERS {
        if teachers.get_teacher_by_email(email)?.is_none() {
            teachers.create_teacher(&Teacher::new(email)?)?;
            report.teachers += 1;
        }
    }

    for email in SEED_STUDENTS {
        if students.get_student_by_email(email)?.is_none() {
            students.create_student(&Student::new(email)?)?;
            report.students += 1;
        }
    }

    for (teacher_email, student_email) in SEED_LINKS {
        let teacher = teachers.get_teacher_by_email(teacher_email)?;
        let student = students.get_student_by_email(student_email)?;
        if let (Some(teacher), Some(student)) = (teacher, student) {
            if teachers.upsert_link(teacher.id, student.id)? {
                report.links += 1;
            }
        }
    }

    info!(
        "event=seed module=seed status=ok teachers={} students={} links={}",
        report.teachers, report.students, report.links
    );
    Ok(report)
}
