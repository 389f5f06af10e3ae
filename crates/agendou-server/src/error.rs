//! HTTP error boundary.
//!
//! Every failure leaving a handler is converted into a `{message}` JSON
//! body with the proper status; tenant-gate denials additionally carry
//! a machine-readable `code` so clients can distinguish billing states.

use agendou_core::error::AgendouError;
use agendou_core::gate::TenantGateError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

#[derive(Debug)]
pub struct ApiError(pub AgendouError);

impl<E: Into<AgendouError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Status + machine code + client-facing message for one error.
fn response_parts(err: &AgendouError) -> (StatusCode, Option<&'static str>, String) {
    match err {
        AgendouError::Validation { message } => (StatusCode::BAD_REQUEST, None, message.clone()),
        AgendouError::BusinessRule { message } => (StatusCode::BAD_REQUEST, None, message.clone()),
        AgendouError::AlreadyExists { entity } => (
            StatusCode::BAD_REQUEST,
            None,
            format!("{entity} already exists"),
        ),
        AgendouError::AuthenticationFailed { reason } => {
            (StatusCode::UNAUTHORIZED, None, reason.clone())
        }
        AgendouError::Forbidden { reason } => (StatusCode::FORBIDDEN, None, reason.clone()),
        AgendouError::TenantMismatch => (StatusCode::FORBIDDEN, None, err.to_string()),
        AgendouError::TenantDenied(gate_err) => {
            let code = match gate_err {
                TenantGateError::Inactive => None,
                TenantGateError::Blocked { .. } => Some("BUSINESS_BLOCKED"),
                TenantGateError::Cancelled => Some("BUSINESS_CANCELLED"),
                TenantGateError::OverdueBlocked { .. } => Some("BUSINESS_OVERDUE_BLOCKED"),
            };
            (StatusCode::FORBIDDEN, code, gate_err.to_string())
        }
        AgendouError::NotFound { .. } => (StatusCode::NOT_FOUND, None, err.to_string()),
        AgendouError::Database(msg) => {
            error!(error = %msg, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                "internal server error".into(),
            )
        }
        AgendouError::Internal(msg) => {
            error!(error = %msg, "internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                "internal server error".into(),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = response_parts(&self.0);
        (status, Json(ErrorBody { message, code })).into_response()
    }
}

/// Shorthand for a 400 validation failure.
pub fn validation(message: impl Into<String>) -> ApiError {
    ApiError(AgendouError::Validation {
        message: message.into(),
    })
}
