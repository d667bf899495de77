//! Domain model for teachers, students and their roster links.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own email normalization shared by every layer.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID.
//! - Emails are trimmed and lowercased before they are stored or compared.
//! - Nothing is soft-deleted; absence means not found.

pub mod student;
pub mod teacher;

use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation error for model construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Email is blank after trim.
    EmptyEmail,
    /// Email does not have the `local@domain` shape.
    InvalidEmail(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
        }
    }
}

impl Error for ModelValidationError {}

/// Trims and lowercases one email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalizes a list of emails, dropping blanks and repeated values.
///
/// First-seen order is kept so error reports follow caller input.
pub fn normalize_emails<S: AsRef<str>>(emails: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    emails
        .iter()
        .map(|email| normalize_email(email.as_ref()))
        .filter(|email| !email.is_empty())
        .filter(|email| seen.insert(email.clone()))
        .collect()
}

/// Validates that a normalized email has exactly one `@` with non-empty sides.
pub fn validate_email(email: &str) -> Result<(), ModelValidationError> {
    if email.is_empty() {
        return Err(ModelValidationError::EmptyEmail);
    }

    let mut parts = email.split('@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || parts.next().is_some() {
        return Err(ModelValidationError::InvalidEmail(email.to_string()));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ModelValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}
