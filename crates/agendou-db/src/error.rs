//! Database-specific error types and conversions.

use agendou_core::error::AgendouError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Conflicting write: {message}")]
    Conflict { message: String },

    #[error("Corrupt row: {0}")]
    Data(String),
}

impl From<DbError> for AgendouError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AgendouError::NotFound { entity, id },
            DbError::Conflict { message } => AgendouError::BusinessRule { message },
            other => AgendouError::Database(other.to_string()),
        }
    }
}
