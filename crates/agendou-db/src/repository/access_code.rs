//! SurrealDB implementation of [`AccessCodeRepository`].

use agendou_core::error::{AgendouError, AgendouResult};
use agendou_core::models::access_code::{AccessCode, CreateAccessCode};
use agendou_core::repository::AccessCodeRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AccessCodeRow {
    tenant_id: String,
    code: String,
    active: bool,
    expires_at: Option<DateTime<Utc>>,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl AccessCodeRow {
    fn into_access_code(self, id: Uuid) -> Result<AccessCode, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Data(format!("invalid tenant UUID: {e}")))?;
        Ok(AccessCode {
            id,
            tenant_id,
            code: self.code,
            active: self.active,
            expires_at: self.expires_at,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AccessCodeRowWithId {
    record_id: String,
    tenant_id: String,
    code: String,
    active: bool,
    expires_at: Option<DateTime<Utc>>,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl AccessCodeRowWithId {
    fn try_into_access_code(self) -> Result<AccessCode, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Data(format!("invalid UUID: {e}")))?;
        AccessCodeRow {
            tenant_id: self.tenant_id,
            code: self.code,
            active: self.active,
            expires_at: self.expires_at,
            description: self.description,
            created_at: self.created_at,
        }
        .into_access_code(id)
    }
}

/// SurrealDB implementation of the AccessCode repository.
#[derive(Clone)]
pub struct SurrealAccessCodeRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccessCodeRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AccessCodeRepository for SurrealAccessCodeRepository<C> {
    async fn create(&self, input: CreateAccessCode) -> AgendouResult<AccessCode> {
        // Codes are unique per tenant; the unique index backs this
        // check against races.
        match self.get_by_code(input.tenant_id, &input.code).await {
            Ok(_) => {
                return Err(AgendouError::AlreadyExists {
                    entity: "access_code".into(),
                });
            }
            Err(AgendouError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('access_code', $id) SET \
                 tenant_id = $tenant_id, \
                 code = $code, \
                 active = true, \
                 expires_at = $expires_at, \
                 description = $description",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("code", input.code))
            .bind(("expires_at", input.expires_at))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<AccessCodeRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "access_code".into(),
            id: id_str,
        })?;

        Ok(row.into_access_code(id)?)
    }

    async fn get_by_code(&self, tenant_id: Uuid, code: &str) -> AgendouResult<AccessCode> {
        let code_owned = code.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM access_code \
                 WHERE tenant_id = $tenant_id AND code = $code",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("code", code_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccessCodeRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "access_code".into(),
            id: format!("tenant={tenant_id},code={code}"),
        })?;

        Ok(row.try_into_access_code()?)
    }
}
