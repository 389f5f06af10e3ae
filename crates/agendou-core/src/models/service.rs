//! Service domain model.
//!
//! A service is something a professional can be booked for: a name, a
//! price, and a duration. Services are soft-disabled rather than deleted
//! so past appointments keep their pricing history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub professional_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateService {
    pub tenant_id: Uuid,
    pub professional_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: u32,
}
