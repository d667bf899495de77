//! Classroom store bootstrap.
//!
//! A connection handed to repositories has foreign keys on, a busy timeout,
//! every schema step applied and the roster tables verified. Schema steps
//! live in [`schema`]; connection setup lives in `open`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or preparing the classroom store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a build that knows more schema steps.
    SchemaTooNew { found: u32, supported: u32 },
    /// A roster table is absent or keyed differently than the store expects.
    SchemaMismatch(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "classroom store is at schema step {found}; this build knows up to {supported}"
            ),
            Self::SchemaMismatch(detail) => write!(f, "classroom store schema mismatch: {detail}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
