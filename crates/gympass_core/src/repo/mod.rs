//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for users, gyms and
//!   check-ins.
//! - Isolate SQLite query details from service orchestration.
//! - Provide in-memory implementations with identical semantics for tests.
//!
//! # Invariants
//! - Write paths call the record's `validate()` before persisting.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List pages are 1-based and hold at most `PAGE_SIZE` items.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::db::DbError;
use crate::model::validation::ValidationError;
use uuid::Uuid;

pub mod check_in_repo;
pub mod gym_repo;
pub mod memory;
pub mod user_repo;

/// Maximum number of items returned by one list page.
pub const PAGE_SIZE: u32 = 20;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every persistence implementation.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: Uuid,
    },
    /// Unique constraint violation.
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    /// A foreign key points at a row that does not exist.
    MissingReference {
        entity: &'static str,
        id: Uuid,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Duplicate {
                entity,
                field,
                value,
            } => write!(f, "{entity} with {field} `{value}` already exists"),
            Self::MissingReference { entity, id } => {
                write!(f, "referenced {entity} does not exist: {id}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Zero-based row offset of a 1-based page. Page `0` is read as page `1`.
pub fn page_offset(page: u32) -> u32 {
    page.max(1).saturating_sub(1).saturating_mul(PAGE_SIZE)
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}
