//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Professional,
    Client,
}

/// A platform user.
///
/// `tenant_id` is `None` only for platform administrators; every
/// professional, client, and business-owner admin belongs to exactly one
/// tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    /// Globally unique across all tenants.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    /// Free-text note shown on the professional's public booking page.
    pub public_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new user.
///
/// The password is hashed with Argon2id before this struct is built; the
/// repository never sees plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub public_message: Option<String>,
}
