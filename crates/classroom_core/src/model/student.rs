//! Student domain model.
//!
//! # Invariants
//! - `email` is normalized and unique among students.
//! - `is_suspended` starts as `false` and is only set by suspension.

use crate::model::{normalize_email, validate_email, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a student.
pub type StudentId = Uuid;

/// Canonical student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    /// Trimmed, lowercased email.
    pub email: String,
    /// Suspended students cannot be registered and receive no notifications.
    pub is_suspended: bool,
    /// Unix epoch milliseconds, assigned by storage.
    pub created_at: i64,
    /// Unix epoch milliseconds, assigned by storage.
    pub updated_at: i64,
}

impl Student {
    /// Creates an active student with a generated ID and normalized email.
    pub fn new(email: &str) -> Result<Self, ModelValidationError> {
        Self::with_id(Uuid::new_v4(), email)
    }

    /// Creates an active student with a caller-provided ID.
    pub fn with_id(id: StudentId, email: &str) -> Result<Self, ModelValidationError> {
        let email = normalize_email(email);
        validate_email(&email)?;
        Ok(Self {
            id,
            email,
            is_suspended: false,
            created_at: 0,
            updated_at: 0,
        })
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.email != normalize_email(&self.email) {
            return Err(ModelValidationError::InvalidEmail(self.email.clone()));
        }
        validate_email(&self.email)
    }

    /// Returns whether this student may be registered or notified.
    pub fn is_active(&self) -> bool {
        !self.is_suspended
    }
}
