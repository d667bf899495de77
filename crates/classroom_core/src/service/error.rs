//! Service error taxonomy shared by student and teacher use-cases.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse failure category for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Conflict,
    Storage,
}

impl ErrorKind {
    /// HTTP-style status code for this kind.
    pub fn status_code(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Storage => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Storage => "storage",
        }
    }
}

/// Errors from classroom service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Required email or list is missing or blank.
    InvalidInput(String),
    /// Every requested teacher email that has no teacher.
    TeacherNotFound(Vec<String>),
    /// Every requested student email that has no student.
    StudentNotFound(Vec<String>),
    /// Every mentioned email in a notification that has no student.
    MentionNotFound(Vec<String>),
    /// Registration targeted suspended students.
    SuspendedStudentConflict(Vec<String>),
    /// Repository-level failure, propagated unchanged.
    Repo(RepoError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::TeacherNotFound(_) | Self::StudentNotFound(_) | Self::MentionNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::SuspendedStudentConflict(_) => ErrorKind::Conflict,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::TeacherNotFound(emails) => {
                write!(f, "teacher(s) not found: {}", emails.join(", "))
            }
            Self::StudentNotFound(emails) => {
                write!(f, "student(s) not found: {}", emails.join(", "))
            }
            Self::MentionNotFound(emails) => {
                write!(f, "mentioned student(s) not found: {}", emails.join(", "))
            }
            Self::SuspendedStudentConflict(emails) => write!(
                f,
                "cannot register suspended students: {}",
                emails.join(", ")
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
