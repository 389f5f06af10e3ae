//! Availability window domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An open time range a professional can be booked within on one
/// calendar date.
///
/// Offsets are minutes from midnight (`540` = 09:00). The date is a plain
/// calendar date and never passes through a timezone conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub professional_id: Uuid,
    pub date: NaiveDate,
    pub start_minute: u16,
    pub end_minute: u16,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAvailabilityWindow {
    pub tenant_id: Uuid,
    pub professional_id: Uuid,
    pub date: NaiveDate,
    pub start_minute: u16,
    pub end_minute: u16,
    pub available: bool,
}
