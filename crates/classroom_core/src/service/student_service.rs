//! Student directory use-case service.
//!
//! # Responsibility
//! - Provide student-scoped lookups used by relationship orchestration.
//! - Perform the suspended-flag write.
//!
//! # Invariants
//! - Not-found on single lookup is `Ok(None)`; callers decide.
//! - Set lookups normalize and deduplicate input before querying.
//! - `suspend` writes unconditionally; idempotence is the caller's concern.

use crate::model::student::Student;
use crate::model::{normalize_email, normalize_emails};
use crate::repo::{RepoError, StudentRepository};
use crate::service::error::{ServiceError, ServiceResult};
use log::info;

/// Student directory facade over repository implementations.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Finds one student by email.
    pub fn find_by_email(&self, email: &str) -> ServiceResult<Option<Student>> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(None);
        }
        Ok(self.repo.get_student_by_email(&email)?)
    }

    /// Finds the existing subset of `emails`, one record per student.
    pub fn find_by_emails<S: AsRef<str>>(&self, emails: &[S]) -> ServiceResult<Vec<Student>> {
        let emails = normalize_emails(emails);
        Ok(self.repo.list_students_by_emails(&emails)?)
    }

    /// Finds the existing, non-suspended subset of `emails`.
    pub fn find_active_by_emails<S: AsRef<str>>(
        &self,
        emails: &[S],
    ) -> ServiceResult<Vec<Student>> {
        let emails = normalize_emails(emails);
        Ok(self.repo.list_active_students_by_emails(&emails)?)
    }

    /// Marks one student suspended and returns the updated record.
    ///
    /// # Errors
    /// - `ServiceError::StudentNotFound` when no student has `email`.
    pub fn suspend(&self, email: &str) -> ServiceResult<Student> {
        let email = normalize_email(email);
        match self.repo.set_student_suspended(&email, true) {
            Ok(student) => {
                info!("event=student_suspend module=service status=ok");
                Ok(student)
            }
            Err(RepoError::NotFound(missing)) => {
                Err(ServiceError::StudentNotFound(vec![missing]))
            }
            Err(other) => Err(other.into()),
        }
    }
}
