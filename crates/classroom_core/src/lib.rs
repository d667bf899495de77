//! Core domain logic for teacher/student relationships.
//! This crate is the single source of truth for roster invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::student::{Student, StudentId};
pub use model::teacher::{Teacher, TeacherId, TeacherRoster};
pub use model::{normalize_email, normalize_emails, ModelValidationError};
pub use repo::{
    RepoError, RepoResult, SqliteStudentRepository, SqliteTeacherRepository, StudentRepository,
    TeacherRepository,
};
pub use seed::{seed_demo_data, SeedReport};
pub use service::mention::extract_mentions;
pub use service::student_service::StudentService;
pub use service::teacher_service::{RegistrationOutcome, TeacherService};
pub use service::{ErrorKind, ServiceError, ServiceResult};

/// Minimal health-check API for wiring checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Builds a relationship service over SQLite repositories sharing `conn`.
pub fn sqlite_teacher_service(
    conn: &rusqlite::Connection,
) -> TeacherService<SqliteTeacherRepository<'_>, SqliteStudentRepository<'_>> {
    TeacherService::new(
        SqliteTeacherRepository::new(conn),
        StudentService::new(SqliteStudentRepository::new(conn)),
    )
}
