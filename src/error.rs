//! # Error Handling
//!
//! Errors raised while seeding. Every variant is fatal: the orchestrator
//! aborts on the first failure and leaves already-committed rows in place.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::models::EntityKind;
use crate::sheets::SheetError;

/// Failures surfaced by the seeding phases and repositories
#[derive(Debug, Error)]
pub enum SeedError {
    /// A unique or foreign-key constraint rejected a write
    #[error("integrity constraint violated: {message}")]
    Integrity {
        message: String,
        #[source]
        source: DbErr,
    },

    /// Any other database failure
    #[error("database error: {0}")]
    Database(#[source] DbErr),

    /// A random reference was requested from an empty table
    #[error("no {entity} rows available to reference")]
    MissingReference { entity: EntityKind },

    /// A lookup row could not be read back after insert-if-absent
    #[error("{entity} '{key}' was not persisted")]
    NotPersisted { entity: EntityKind, key: String },

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl From<DbErr> for SeedError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message))
            | Some(SqlErr::ForeignKeyConstraintViolation(message)) => SeedError::Integrity {
                message,
                source: err,
            },
            _ => SeedError::Database(err),
        }
    }
}

impl SeedError {
    /// Returns true when the error came from a violated unique constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SeedError::Integrity { source, .. } => matches!(
                source.sql_err(),
                Some(SqlErr::UniqueConstraintViolation(_))
            ),
            _ => false,
        }
    }
}
