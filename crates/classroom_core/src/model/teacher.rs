//! Teacher domain model and roster projection.
//!
//! # Responsibility
//! - Define the canonical teacher record.
//! - Define the read-only teacher-with-roster projection returned by storage.
//!
//! # Invariants
//! - `email` is normalized and unique among teachers.
//! - A teacher never changes after creation; only its link set grows.

use crate::model::student::Student;
use crate::model::{normalize_email, validate_email, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a teacher.
pub type TeacherId = Uuid;

/// Canonical teacher record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    /// Trimmed, lowercased email.
    pub email: String,
    /// Unix epoch milliseconds, assigned by storage.
    pub created_at: i64,
    /// Unix epoch milliseconds, assigned by storage.
    pub updated_at: i64,
}

impl Teacher {
    /// Creates a teacher with a generated ID and normalized email.
    ///
    /// Timestamps are zero until the record is read back from storage.
    pub fn new(email: &str) -> Result<Self, ModelValidationError> {
        Self::with_id(Uuid::new_v4(), email)
    }

    /// Creates a teacher with a caller-provided ID.
    pub fn with_id(id: TeacherId, email: &str) -> Result<Self, ModelValidationError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        Ok(Self {
            id,
            email,
            created_at: 0,
            updated_at: 0,
        })
    }

    /// Checks persisted or hand-built records before writes.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.email != normalize_email(&self.email) {
            return Err(ModelValidationError::InvalidEmail(self.email.clone()));
        }
        validate_email(&self.email)
    }
}

/// A teacher together with every linked student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRoster {
    pub teacher: Teacher,
    /// Linked students ordered by email.
    pub students: Vec<Student>,
}

impl TeacherRoster {
    /// Emails of all linked students, in roster order.
    pub fn student_emails(&self) -> Vec<String> {
        self.students
            .iter()
            .map(|student| student.email.clone())
            .collect()
    }
}
