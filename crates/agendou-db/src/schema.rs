//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints. Calendar dates and times-of-day are stored as
//! plain `YYYY-MM-DD` / `HH:MM` strings so they never pass through a
//! timezone conversion.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Businesses (tenants, global scope)
-- =======================================================================
DEFINE TABLE business SCHEMAFULL;
DEFINE FIELD name ON TABLE business TYPE string;
DEFINE FIELD slug ON TABLE business TYPE string;
DEFINE FIELD custom_domain ON TABLE business TYPE option<string>;
DEFINE FIELD active ON TABLE business TYPE bool DEFAULT true;
DEFINE FIELD plan ON TABLE business TYPE string \
    ASSERT $value IN ['Basic', 'Pro', 'Enterprise'];
DEFINE FIELD payment_status ON TABLE business TYPE string \
    ASSERT $value IN ['Active', 'Overdue', 'Blocked', 'Cancelled', \
    'Pending'];
DEFINE FIELD due_date ON TABLE business TYPE option<datetime>;
DEFINE FIELD last_payment_at ON TABLE business TYPE option<datetime>;
DEFINE FIELD blocked_at ON TABLE business TYPE option<datetime>;
DEFINE FIELD grace_days ON TABLE business TYPE int DEFAULT 5;
DEFINE FIELD limits ON TABLE business TYPE object;
DEFINE FIELD limits.max_professionals ON TABLE business TYPE int \
    DEFAULT 5;
DEFINE FIELD limits.max_services ON TABLE business TYPE int DEFAULT 20;
DEFINE FIELD created_at ON TABLE business TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE business TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_business_slug ON TABLE business COLUMNS slug UNIQUE;

-- =======================================================================
-- Users (email unique across all tenants)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE user TYPE option<string>;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['Admin', 'Professional', 'Client'];
DEFINE FIELD phone ON TABLE user TYPE option<string>;
DEFINE FIELD instagram ON TABLE user TYPE option<string>;
DEFINE FIELD public_message ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_tenant_role ON TABLE user \
    COLUMNS tenant_id, role;

-- =======================================================================
-- Services (tenant scope, soft-disabled)
-- =======================================================================
DEFINE TABLE service SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE service TYPE string;
DEFINE FIELD professional_id ON TABLE service TYPE string;
DEFINE FIELD name ON TABLE service TYPE string;
DEFINE FIELD price ON TABLE service TYPE decimal;
DEFINE FIELD duration_minutes ON TABLE service TYPE int \
    ASSERT $value > 0;
DEFINE FIELD active ON TABLE service TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE service TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE service TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_service_tenant_professional ON TABLE service \
    COLUMNS tenant_id, professional_id;

-- =======================================================================
-- Availability windows (tenant scope, per professional per date)
-- =======================================================================
DEFINE TABLE availability_window SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE availability_window TYPE string;
DEFINE FIELD professional_id ON TABLE availability_window TYPE string;
DEFINE FIELD date ON TABLE availability_window TYPE string;
DEFINE FIELD start_minute ON TABLE availability_window TYPE int \
    ASSERT $value >= 0 AND $value < 1440;
DEFINE FIELD end_minute ON TABLE availability_window TYPE int \
    ASSERT $value > 0 AND $value <= 1440;
DEFINE FIELD available ON TABLE availability_window TYPE bool \
    DEFAULT true;
DEFINE FIELD created_at ON TABLE availability_window TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_availability_prof_date ON TABLE availability_window \
    COLUMNS tenant_id, professional_id, date;

-- =======================================================================
-- Appointments (tenant scope)
-- =======================================================================
DEFINE TABLE appointment SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE appointment TYPE string;
DEFINE FIELD client_id ON TABLE appointment TYPE string;
DEFINE FIELD professional_id ON TABLE appointment TYPE string;
DEFINE FIELD service_id ON TABLE appointment TYPE string;
DEFINE FIELD date ON TABLE appointment TYPE string;
DEFINE FIELD time ON TABLE appointment TYPE string;
DEFINE FIELD status ON TABLE appointment TYPE string \
    ASSERT $value IN ['Pending', 'InProgress', 'Done', 'Cancelled'];
DEFINE FIELD created_at ON TABLE appointment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_appointment_prof_date ON TABLE appointment \
    COLUMNS tenant_id, professional_id, date;
DEFINE INDEX idx_appointment_client ON TABLE appointment \
    COLUMNS tenant_id, client_id;

-- =======================================================================
-- Access codes (tenant scope, gate staff self-registration)
-- =======================================================================
DEFINE TABLE access_code SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE access_code TYPE string;
DEFINE FIELD code ON TABLE access_code TYPE string;
DEFINE FIELD active ON TABLE access_code TYPE bool DEFAULT true;
DEFINE FIELD expires_at ON TABLE access_code TYPE option<datetime>;
DEFINE FIELD description ON TABLE access_code TYPE option<string>;
DEFINE FIELD created_at ON TABLE access_code TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_access_code_tenant_code ON TABLE access_code \
    COLUMNS tenant_id, code UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
