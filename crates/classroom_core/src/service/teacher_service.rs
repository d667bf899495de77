//! Teacher relationship use-case service.
//!
//! # Responsibility
//! - Register students under a teacher.
//! - Intersect rosters across teachers.
//! - Delegate student suspension.
//! - Resolve notification recipients from roster plus mentions.
//!
//! # Invariants
//! - Input validation runs before any store access.
//! - Not-found failures report every missing email, not just the first.
//! - Registration writes no link while any targeted student is suspended.
//! - Every email handled here is normalized, including extracted mentions.

use crate::model::student::Student;
use crate::model::{normalize_email, normalize_emails};
use crate::repo::{StudentRepository, TeacherRepository};
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::mention::extract_mentions;
use crate::service::student_service::StudentService;
use log::{info, warn};
use std::collections::HashSet;

/// Link counts produced by one registration call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// Links written by this call.
    pub linked: usize,
    /// Pairs that were already linked.
    pub already_linked: usize,
}

/// Relationship service over teacher storage and the student directory.
pub struct TeacherService<T: TeacherRepository, S: StudentRepository> {
    repo: T,
    students: StudentService<S>,
}

impl<T: TeacherRepository, S: StudentRepository> TeacherService<T, S> {
    /// Creates a service using the provided teacher repository and directory.
    pub fn new(repo: T, students: StudentService<S>) -> Self {
        Self { repo, students }
    }

    /// Registers existing students under an existing teacher.
    ///
    /// Re-registering a linked pair is a no-op, so the call is idempotent.
    ///
    /// # Errors
    /// - `InvalidInput` when the teacher email is blank or no student is given.
    /// - `TeacherNotFound` / `StudentNotFound` listing every missing email.
    /// - `SuspendedStudentConflict` listing every suspended student; no link
    ///   is written in that case.
    pub fn register_students<E: AsRef<str>>(
        &self,
        teacher_email: &str,
        student_emails: &[E],
    ) -> ServiceResult<RegistrationOutcome> {
        let result = self.try_register_students(teacher_email, student_emails);
        log_rejection("register_students", &result);
        result
    }

    /// Returns the emails of students registered to every given teacher.
    ///
    /// A single teacher yields its full roster. Output follows roster order.
    ///
    /// # Errors
    /// - `InvalidInput` when no teacher email is given.
    /// - `TeacherNotFound` listing every missing teacher.
    pub fn common_students<E: AsRef<str>>(
        &self,
        teacher_emails: &[E],
    ) -> ServiceResult<Vec<String>> {
        let result = self.try_common_students(teacher_emails);
        log_rejection("common_students", &result);
        result
    }

    /// Suspends one student; already suspended students are left untouched.
    pub fn suspend_student(&self, student_email: &str) -> ServiceResult<()> {
        let result = self.try_suspend_student(student_email);
        log_rejection("suspend_student", &result);
        result
    }

    /// Resolves who should receive a notification from `teacher_email`.
    ///
    /// Recipients are the teacher's roster plus every student mentioned as
    /// `@email` in `notification`, minus suspended students. Roster emails
    /// come first, then mentions in text order; each email appears once.
    ///
    /// # Errors
    /// - `InvalidInput` when the teacher email or text is blank.
    /// - `TeacherNotFound` when the teacher does not exist.
    /// - `MentionNotFound` listing every mention that matches no student.
    pub fn retrieve_notification_recipients(
        &self,
        teacher_email: &str,
        notification: &str,
    ) -> ServiceResult<Vec<String>> {
        let result = self.try_retrieve_notification_recipients(teacher_email, notification);
        log_rejection("retrieve_recipients", &result);
        result
    }

    fn try_register_students<E: AsRef<str>>(
        &self,
        teacher_email: &str,
        student_emails: &[E],
    ) -> ServiceResult<RegistrationOutcome> {
        let teacher_email = normalize_email(teacher_email);
        let requested = normalize_emails(student_emails);
        if teacher_email.is_empty() || requested.is_empty() {
            return Err(ServiceError::InvalidInput(
                "teacher email and students list are required".to_string(),
            ));
        }

        let teacher = self
            .repo
            .get_teacher_by_email(&teacher_email)?
            .ok_or_else(|| ServiceError::TeacherNotFound(vec![teacher_email.clone()]))?;

        let students = self.students.find_by_emails(&requested)?;
        let missing = missing_emails(&requested, students.iter().map(|s| s.email.as_str()));
        if !missing.is_empty() {
            return Err(ServiceError::StudentNotFound(missing));
        }

        let suspended: Vec<String> = students
            .iter()
            .filter(|student| student.is_suspended)
            .map(|student| student.email.clone())
            .collect();
        if !suspended.is_empty() {
            return Err(ServiceError::SuspendedStudentConflict(suspended));
        }

        let mut outcome = RegistrationOutcome::default();
        for student in &students {
            if self.repo.upsert_link(teacher.id, student.id)? {
                outcome.linked += 1;
            } else {
                outcome.already_linked += 1;
            }
        }

        info!(
            "event=register_students module=service status=ok linked={} already_linked={}",
            outcome.linked, outcome.already_linked
        );
        Ok(outcome)
    }

    fn try_common_students<E: AsRef<str>>(
        &self,
        teacher_emails: &[E],
    ) -> ServiceResult<Vec<String>> {
        let requested = normalize_emails(teacher_emails);
        if requested.is_empty() {
            return Err(ServiceError::InvalidInput(
                "at least one teacher email is required".to_string(),
            ));
        }

        let rosters = self.repo.list_teacher_rosters(&requested)?;
        let missing = missing_emails(
            &requested,
            rosters.iter().map(|roster| roster.teacher.email.as_str()),
        );
        if !missing.is_empty() {
            return Err(ServiceError::TeacherNotFound(missing));
        }

        let mut rosters = rosters.into_iter();
        let mut common = match rosters.next() {
            Some(first) => first.student_emails(),
            None => return Ok(Vec::new()),
        };
        for roster in rosters {
            let emails: HashSet<String> = roster.student_emails().into_iter().collect();
            common.retain(|email| emails.contains(email));
        }

        info!(
            "event=common_students module=service status=ok teachers={} students={}",
            requested.len(),
            common.len()
        );
        Ok(common)
    }

    fn try_suspend_student(&self, student_email: &str) -> ServiceResult<()> {
        let student_email = normalize_email(student_email);
        if student_email.is_empty() {
            return Err(ServiceError::InvalidInput("student email is required".to_string()));
        }

        let student = self
            .students
            .find_by_email(&student_email)?
            .ok_or_else(|| ServiceError::StudentNotFound(vec![student_email.clone()]))?;
        if student.is_suspended {
            return Ok(());
        }

        self.students.suspend(&student.email)?;
        Ok(())
    }

    fn try_retrieve_notification_recipients(
        &self,
        teacher_email: &str,
        notification: &str,
    ) -> ServiceResult<Vec<String>> {
        let teacher_email = normalize_email(teacher_email);
        let text = notification.trim().to_lowercase();
        if teacher_email.is_empty() || text.is_empty() {
            return Err(ServiceError::InvalidInput(
                "teacher email and notification text are required".to_string(),
            ));
        }

        let roster = self
            .repo
            .get_teacher_roster(&teacher_email)?
            .ok_or_else(|| ServiceError::TeacherNotFound(vec![teacher_email.clone()]))?;

        let mentioned = normalize_emails(&extract_mentions(&text));
        let mentioned_students = self.students.find_by_emails(&mentioned)?;
        let missing = missing_emails(
            &mentioned,
            mentioned_students.iter().map(|s| s.email.as_str()),
        );
        if !missing.is_empty() {
            return Err(ServiceError::MentionNotFound(missing));
        }

        let registered = roster.student_emails();
        let candidates = normalize_emails(&[registered.as_slice(), mentioned.as_slice()].concat());
        let active = self.students.find_active_by_emails(&candidates)?;
        let recipients = retain_active(candidates, &active);

        info!(
            "event=retrieve_recipients module=service status=ok registered={} mentioned={} recipients={}",
            registered.len(),
            mentioned.len(),
            recipients.len()
        );
        Ok(recipients)
    }
}

/// Emails from `requested` that are absent from `found`, in request order.
fn missing_emails<'a>(
    requested: &[String],
    found: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let found: HashSet<&str> = found.collect();
    requested
        .iter()
        .filter(|email| !found.contains(email.as_str()))
        .cloned()
        .collect()
}

fn retain_active(candidates: Vec<String>, active: &[Student]) -> Vec<String> {
    let active: HashSet<&str> = active.iter().map(|s| s.email.as_str()).collect();
    candidates
        .into_iter()
        .filter(|email| active.contains(email.as_str()))
        .collect()
}

fn log_rejection<V>(operation: &str, result: &ServiceResult<V>) {
    if let Err(err) = result {
        warn!(
            "event={operation} module=service status=rejected error_kind={}",
            err.kind().as_str()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::missing_emails;

    #[test]
    fn missing_emails_keeps_request_order() {
        let requested = vec![
            "c@x.com".to_string(),
            "a@x.com".to_string(),
            "b@x.com".to_string(),
        ];
        let missing = missing_emails(&requested, ["a@x.com"].into_iter());
        assert_eq!(missing, vec!["c@x.com".to_string(), "b@x.com".to_string()]);
    }
}
