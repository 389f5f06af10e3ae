//! Tenant (business) domain model.
//!
//! A tenant is an isolated business account. All professionals, clients,
//! services, and appointments are scoped to exactly one tenant. Billing
//! state lives here and is what the tenant status gate evaluates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing state of a tenant subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Active,
    Overdue,
    Blocked,
    Cancelled,
    Pending,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanTier {
    Basic,
    Pro,
    Enterprise,
}

/// Per-resource caps for a tenant's plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageLimits {
    pub max_professionals: u32,
    pub max_services: u32,
}

impl Default for UsageLimits {
    fn default() -> Self {
        Self {
            max_professionals: 5,
            max_services: 20,
        }
    }
}

/// An isolated business account.
///
/// Invariant: `payment_status == Blocked` implies `blocked_at` is set.
/// The repository layer maintains this on every status write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    /// URL-safe unique identifier (e.g. `barbearia-central`).
    pub slug: String,
    pub custom_domain: Option<String>,
    pub active: bool,
    pub plan: PlanTier,
    pub payment_status: PaymentStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub blocked_at: Option<DateTime<Utc>>,
    /// Days past the due date before the gate auto-blocks.
    pub grace_days: i64,
    pub limits: UsageLimits,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
///
/// Lead-form submissions come in as `Pending`; admin provisioning as
/// `Active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    pub custom_domain: Option<String>,
    pub plan: PlanTier,
    pub payment_status: PaymentStatus,
    pub grace_days: Option<i64>,
    pub limits: Option<UsageLimits>,
}

/// Fields an administrator can change on an existing tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub active: Option<bool>,
    pub plan: Option<PlanTier>,
    pub payment_status: Option<PaymentStatus>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub grace_days: Option<i64>,
    pub limits: Option<UsageLimits>,
}
