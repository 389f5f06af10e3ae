//! Authentication error types.

use agendou_core::error::AgendouError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, wrong password, unverifiable token, or a token
    /// whose user no longer exists. Deliberately indistinct.
    #[error("invalid credentials")]
    InvalidCredential,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("tenant context does not match credential")]
    TenantMismatch,

    #[error("role is not allowed for this operation")]
    RoleNotAllowed,

    #[error("access code is invalid or expired")]
    AccessCodeInvalid,

    #[error("plan limit reached for {resource}")]
    LimitReached { resource: &'static str },

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for AgendouError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredential | AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                AgendouError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::TenantMismatch => AgendouError::TenantMismatch,
            AuthError::RoleNotAllowed | AuthError::AccessCodeInvalid => AgendouError::Forbidden {
                reason: err.to_string(),
            },
            AuthError::LimitReached { .. } => AgendouError::BusinessRule {
                message: err.to_string(),
            },
            AuthError::Crypto(msg) => AgendouError::Internal(msg),
        }
    }
}
