//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into relationship use-cases.
//! - Keep presentation layers decoupled from storage details.

pub mod error;
pub mod mention;
pub mod student_service;
pub mod teacher_service;

pub use error::{ErrorKind, ServiceError, ServiceResult};
