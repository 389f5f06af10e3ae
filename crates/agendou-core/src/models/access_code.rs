//! Access code domain model.
//!
//! Access codes gate professional/admin self-registration: a business
//! hands a code to a new staff member, who presents it when signing up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCode {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Unique within the owning tenant.
    pub code: String,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AccessCode {
    /// Whether the code grants registration at the given instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.is_none_or(|exp| now < exp)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccessCode {
    pub tenant_id: Uuid,
    pub code: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}
