//! SurrealDB implementation of [`AvailabilityRepository`].

use agendou_core::error::AgendouResult;
use agendou_core::models::availability::{AvailabilityWindow, CreateAvailabilityWindow};
use agendou_core::repository::AvailabilityRepository;
use chrono::{DateTime, NaiveDate, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DbError::Data(format!("invalid date '{s}': {e}")))
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct WindowRow {
    tenant_id: String,
    professional_id: String,
    date: String,
    start_minute: u16,
    end_minute: u16,
    available: bool,
    created_at: DateTime<Utc>,
}

impl WindowRow {
    fn into_window(self, id: Uuid) -> Result<AvailabilityWindow, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Data(format!("invalid tenant UUID: {e}")))?;
        let professional_id = Uuid::parse_str(&self.professional_id)
            .map_err(|e| DbError::Data(format!("invalid professional UUID: {e}")))?;
        Ok(AvailabilityWindow {
            id,
            tenant_id,
            professional_id,
            date: parse_date(&self.date)?,
            start_minute: self.start_minute,
            end_minute: self.end_minute,
            available: self.available,
            created_at: self.created_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct WindowRowWithId {
    record_id: String,
    tenant_id: String,
    professional_id: String,
    date: String,
    start_minute: u16,
    end_minute: u16,
    available: bool,
    created_at: DateTime<Utc>,
}

impl WindowRowWithId {
    fn try_into_window(self) -> Result<AvailabilityWindow, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Data(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Data(format!("invalid tenant UUID: {e}")))?;
        let professional_id = Uuid::parse_str(&self.professional_id)
            .map_err(|e| DbError::Data(format!("invalid professional UUID: {e}")))?;
        Ok(AvailabilityWindow {
            id,
            tenant_id,
            professional_id,
            date: parse_date(&self.date)?,
            start_minute: self.start_minute,
            end_minute: self.end_minute,
            available: self.available,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Availability repository.
#[derive(Clone)]
pub struct SurrealAvailabilityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAvailabilityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AvailabilityRepository for SurrealAvailabilityRepository<C> {
    async fn create(&self, input: CreateAvailabilityWindow) -> AgendouResult<AvailabilityWindow> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('availability_window', $id) SET \
                 tenant_id = $tenant_id, \
                 professional_id = $professional_id, \
                 date = $date, \
                 start_minute = $start_minute, \
                 end_minute = $end_minute, \
                 available = $available",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("professional_id", input.professional_id.to_string()))
            .bind(("date", input.date.format(DATE_FORMAT).to_string()))
            .bind(("start_minute", input.start_minute))
            .bind(("end_minute", input.end_minute))
            .bind(("available", input.available))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<WindowRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "availability_window".into(),
            id: id_str,
        })?;

        Ok(row.into_window(id)?)
    }

    async fn list_for_date(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> AgendouResult<Vec<AvailabilityWindow>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM availability_window \
                 WHERE tenant_id = $tenant_id \
                 AND professional_id = $professional_id \
                 AND date = $date \
                 ORDER BY start_minute ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("professional_id", professional_id.to_string()))
            .bind(("date", date.format(DATE_FORMAT).to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WindowRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_window())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(items)
    }
}
