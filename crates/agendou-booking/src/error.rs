//! Booking error types.

use agendou_core::error::AgendouError;
use agendou_core::models::appointment::AppointmentStatus;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BookingError {
    /// Service is inactive or not owned by that professional/tenant.
    #[error("service not found")]
    ServiceNotFound { id: Uuid },

    #[error("the requested time slot is not available")]
    SlotUnavailable,

    #[error("appointment not found")]
    NotFound { id: Uuid },

    #[error("appointment is already cancelled")]
    AlreadyCancelled,

    #[error("appointment has already been completed")]
    AlreadyCompleted,

    #[error("appointment is in progress and can no longer be cancelled")]
    InProgressLocked,

    #[error("appointments can only be cancelled at least 2 hours in advance")]
    LeadTimeViolation,

    #[error("cannot transition appointment from {from:?} to {to:?}")]
    IllegalTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

impl From<BookingError> for AgendouError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::ServiceNotFound { id } => AgendouError::NotFound {
                entity: "service".into(),
                id: id.to_string(),
            },
            BookingError::NotFound { id } => AgendouError::NotFound {
                entity: "appointment".into(),
                id: id.to_string(),
            },
            BookingError::SlotUnavailable
            | BookingError::AlreadyCancelled
            | BookingError::AlreadyCompleted
            | BookingError::InProgressLocked
            | BookingError::LeadTimeViolation
            | BookingError::IllegalTransition { .. } => AgendouError::BusinessRule {
                message: err.to_string(),
            },
        }
    }
}
