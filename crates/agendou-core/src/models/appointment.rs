//! Appointment domain model and status transition table.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    InProgress,
    Done,
    Cancelled,
}

impl AppointmentStatus {
    /// Parse the wire representation used by the HTTP API.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "IN_PROGRESS" => Some(Self::InProgress),
            "DONE" => Some(Self::Done),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }

    /// Closed transition table: Pending → InProgress/Cancelled,
    /// InProgress → Done/Cancelled. Done and Cancelled are terminal.
    pub fn can_transition_to(self, next: Self) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress) | (Pending, Cancelled) | (InProgress, Done) | (InProgress, Cancelled)
        )
    }
}

/// A booking of one service with one professional at one date and time.
///
/// Invariant: at most one non-cancelled appointment exists per
/// (professional, tenant, date, time). The repository enforces this
/// inside the insert transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Start minute of this booking, as minutes from midnight.
    pub fn start_minute(&self) -> u16 {
        use chrono::Timelike;
        (self.time.hour() * 60 + self.time.minute()) as u16
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointment {
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::AppointmentStatus;
    use super::AppointmentStatus::*;

    #[test]
    fn pending_can_start_or_cancel() {
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Done));
    }

    #[test]
    fn in_progress_can_finish_or_cancel() {
        assert!(InProgress.can_transition_to(Done));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!InProgress.can_transition_to(Pending));
    }

    #[test]
    fn terminal_states_are_frozen() {
        for terminal in [Done, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Pending, InProgress, Done, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn wire_names_round_trip() {
        assert_eq!(AppointmentStatus::from_wire("IN_PROGRESS"), Some(InProgress));
        assert_eq!(AppointmentStatus::from_wire("in_progress"), None);
        assert_eq!(AppointmentStatus::from_wire("UNKNOWN"), None);
    }
}
