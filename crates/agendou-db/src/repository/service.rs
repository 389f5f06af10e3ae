//! SurrealDB implementation of [`ServiceRepository`].

use agendou_core::error::AgendouResult;
use agendou_core::models::service::{CreateService, Service};
use agendou_core::repository::ServiceRepository;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ServiceRow {
    tenant_id: String,
    professional_id: String,
    name: String,
    price: Decimal,
    duration_minutes: u32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServiceRow {
    fn into_service(self, id: Uuid) -> Result<Service, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Data(format!("invalid tenant UUID: {e}")))?;
        let professional_id = Uuid::parse_str(&self.professional_id)
            .map_err(|e| DbError::Data(format!("invalid professional UUID: {e}")))?;
        Ok(Service {
            id,
            tenant_id,
            professional_id,
            name: self.name,
            price: self.price,
            duration_minutes: self.duration_minutes,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ServiceRowWithId {
    record_id: String,
    tenant_id: String,
    professional_id: String,
    name: String,
    price: Decimal,
    duration_minutes: u32,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServiceRowWithId {
    fn try_into_service(self) -> Result<Service, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Data(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Data(format!("invalid tenant UUID: {e}")))?;
        let professional_id = Uuid::parse_str(&self.professional_id)
            .map_err(|e| DbError::Data(format!("invalid professional UUID: {e}")))?;
        Ok(Service {
            id,
            tenant_id,
            professional_id,
            name: self.name,
            price: self.price,
            duration_minutes: self.duration_minutes,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Service repository.
#[derive(Clone)]
pub struct SurrealServiceRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealServiceRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ServiceRepository for SurrealServiceRepository<C> {
    async fn create(&self, input: CreateService) -> AgendouResult<Service> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('service', $id) SET \
                 tenant_id = $tenant_id, \
                 professional_id = $professional_id, \
                 name = $name, price = $price, \
                 duration_minutes = $duration_minutes, \
                 active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("professional_id", input.professional_id.to_string()))
            .bind(("name", input.name))
            .bind(("price", input.price))
            .bind(("duration_minutes", input.duration_minutes))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.into_service(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> AgendouResult<Service> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('service', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "service".into(),
            id: id_str,
        })?;

        Ok(row.into_service(id)?)
    }

    async fn list_active_by_professional(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
    ) -> AgendouResult<Vec<Service>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM service \
                 WHERE tenant_id = $tenant_id \
                 AND professional_id = $professional_id \
                 AND active = true \
                 ORDER BY name ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("professional_id", professional_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_service())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(items)
    }

    async fn deactivate(&self, tenant_id: Uuid, id: Uuid) -> AgendouResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('service', $id) \
                 SET active = false, updated_at = time::now() \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ServiceRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "service".into(),
                id: id_str,
            }
            .into());
        }
        Ok(())
    }
}
