//! Error types for the Agendou system.

use thiserror::Error;

use crate::gate::TenantGateError;

#[derive(Debug, Error)]
pub enum AgendouError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    Forbidden { reason: String },

    #[error("Tenant context does not match credential")]
    TenantMismatch,

    #[error(transparent)]
    TenantDenied(#[from] TenantGateError),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgendouResult<T> = Result<T, AgendouError>;
