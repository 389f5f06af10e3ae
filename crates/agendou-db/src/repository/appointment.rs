//! SurrealDB implementation of [`AppointmentRepository`].
//!
//! The insert path runs the slot-conflict check and the CREATE inside
//! one transaction, so two concurrent bookings for the same
//! professional/date/time resolve to exactly one Pending row.

use agendou_core::error::AgendouResult;
use agendou_core::models::appointment::{Appointment, AppointmentStatus, CreateAppointment};
use agendou_core::repository::AppointmentRepository;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Marker thrown by the insert transaction when the slot is taken.
const SLOT_TAKEN: &str = "slot_taken";

fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DbError::Data(format!("invalid date '{s}': {e}")))
}

fn parse_time(s: &str) -> Result<NaiveTime, DbError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| DbError::Data(format!("invalid time '{s}': {e}")))
}

fn parse_status(s: &str) -> Result<AppointmentStatus, DbError> {
    match s {
        "Pending" => Ok(AppointmentStatus::Pending),
        "InProgress" => Ok(AppointmentStatus::InProgress),
        "Done" => Ok(AppointmentStatus::Done),
        "Cancelled" => Ok(AppointmentStatus::Cancelled),
        other => Err(DbError::Data(format!("unknown appointment status: {other}"))),
    }
}

fn status_to_string(s: AppointmentStatus) -> &'static str {
    match s {
        AppointmentStatus::Pending => "Pending",
        AppointmentStatus::InProgress => "InProgress",
        AppointmentStatus::Done => "Done",
        AppointmentStatus::Cancelled => "Cancelled",
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct AppointmentRow {
    tenant_id: String,
    client_id: String,
    professional_id: String,
    service_id: String,
    date: String,
    time: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn into_appointment(self, id: Uuid) -> Result<Appointment, DbError> {
        let parse_uuid = |raw: &str, what: &str| {
            Uuid::parse_str(raw).map_err(|e| DbError::Data(format!("invalid {what} UUID: {e}")))
        };
        Ok(Appointment {
            id,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            client_id: parse_uuid(&self.client_id, "client")?,
            professional_id: parse_uuid(&self.professional_id, "professional")?,
            service_id: parse_uuid(&self.service_id, "service")?,
            date: parse_date(&self.date)?,
            time: parse_time(&self.time)?,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct AppointmentRowWithId {
    record_id: String,
    tenant_id: String,
    client_id: String,
    professional_id: String,
    service_id: String,
    date: String,
    time: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl AppointmentRowWithId {
    fn try_into_appointment(self) -> Result<Appointment, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Data(format!("invalid UUID: {e}")))?;
        AppointmentRow {
            tenant_id: self.tenant_id,
            client_id: self.client_id,
            professional_id: self.professional_id,
            service_id: self.service_id,
            date: self.date,
            time: self.time,
            status: self.status,
            created_at: self.created_at,
        }
        .into_appointment(id)
    }
}

/// SurrealDB implementation of the Appointment repository.
#[derive(Clone)]
pub struct SurrealAppointmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAppointmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        filter: &'static str,
        tenant_id: Uuid,
        key_name: &'static str,
        key: String,
        extra: Option<(&'static str, String)>,
    ) -> AgendouResult<Vec<Appointment>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * \
             FROM appointment \
             WHERE tenant_id = $tenant_id AND {filter} \
             ORDER BY date ASC, time ASC"
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("tenant_id", tenant_id.to_string()))
            .bind((key_name, key));
        if let Some((name, value)) = extra {
            builder = builder.bind((name, value));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<AppointmentRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_appointment())
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(items)
    }
}

impl<C: Connection> AppointmentRepository for SurrealAppointmentRepository<C> {
    async fn create_pending(&self, input: CreateAppointment) -> AgendouResult<Appointment> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(format!(
                "BEGIN TRANSACTION; \
                 LET $conflict = (SELECT count() AS total FROM appointment \
                     WHERE tenant_id = $tenant_id \
                     AND professional_id = $professional_id \
                     AND date = $date AND time = $time \
                     AND status != 'Cancelled' GROUP ALL); \
                 IF ($conflict[0].total ?? 0) > 0 {{ THROW '{SLOT_TAKEN}' }}; \
                 CREATE type::record('appointment', $id) SET \
                     tenant_id = $tenant_id, \
                     client_id = $client_id, \
                     professional_id = $professional_id, \
                     service_id = $service_id, \
                     date = $date, time = $time, \
                     status = 'Pending'; \
                 COMMIT TRANSACTION;"
            ))
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("client_id", input.client_id.to_string()))
            .bind(("professional_id", input.professional_id.to_string()))
            .bind(("service_id", input.service_id.to_string()))
            .bind(("date", input.date.format(DATE_FORMAT).to_string()))
            .bind(("time", input.time.format(TIME_FORMAT).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| {
            if e.to_string().contains(SLOT_TAKEN) {
                DbError::Conflict {
                    message: "the requested time slot is already booked".into(),
                }
            } else {
                DbError::from(e)
            }
        })?;

        // Statement 0 is the LET, 1 the IF guard, 2 the CREATE.
        let rows: Vec<AppointmentRow> = result.take(2).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "appointment".into(),
            id: id_str,
        })?;

        Ok(row.into_appointment(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AgendouResult<Appointment> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('appointment', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AppointmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "appointment".into(),
            id: id_str,
        })?;

        Ok(row.into_appointment(id)?)
    }

    async fn set_status(&self, id: Uuid, status: AppointmentStatus) -> AgendouResult<Appointment> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('appointment', $id) \
                 SET status = $status",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", status_to_string(status)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AppointmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "appointment".into(),
            id: id_str,
        })?;

        Ok(row.into_appointment(id)?)
    }

    async fn list_by_client(
        &self,
        tenant_id: Uuid,
        client_id: Uuid,
    ) -> AgendouResult<Vec<Appointment>> {
        self.list_where(
            "client_id = $client_id",
            tenant_id,
            "client_id",
            client_id.to_string(),
            None,
        )
        .await
    }

    async fn list_active_for_date(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> AgendouResult<Vec<Appointment>> {
        self.list_where(
            "professional_id = $professional_id \
             AND date = $date AND status != 'Cancelled'",
            tenant_id,
            "professional_id",
            professional_id.to_string(),
            Some(("date", date.format(DATE_FORMAT).to_string())),
        )
        .await
    }

    async fn list_done_since(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
        start: NaiveDate,
    ) -> AgendouResult<Vec<Appointment>> {
        // Lexicographic comparison on YYYY-MM-DD strings matches
        // chronological order.
        self.list_where(
            "professional_id = $professional_id \
             AND date >= $start AND status = 'Done'",
            tenant_id,
            "professional_id",
            professional_id.to_string(),
            Some(("start", start.format(DATE_FORMAT).to_string())),
        )
        .await
    }
}
