//! Appointment routes: booking, client history, cancellation, status
//! updates, and the professional revenue report.

use agendou_auth::{Identity, require_role};
use agendou_booking::{Period, RevenueSummary};
use agendou_core::models::appointment::{Appointment, AppointmentStatus, CreateAppointment};
use agendou_core::models::user::Role;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Extension, Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, validation};
use crate::guard::{self, BoundTenant};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/agendamentos/cliente", post(create).get(list_own))
        .route("/agendamentos/{id}/cancelar", patch(cancel))
        .route("/agendamentos/{id}/status", patch(update_status))
        .route("/agendamentos/profissional/faturamento", get(revenue))
}

fn parse_time(raw: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| validation("time must be formatted HH:MM"))
}

#[derive(Debug, Deserialize)]
struct CreateAppointmentRequest {
    professional_id: Uuid,
    service_id: Uuid,
    date: NaiveDate,
    time: String,
}

async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    tenant: Option<Extension<BoundTenant>>,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    require_role(&identity, &[Role::Client])?;
    let tenant_id = guard::bound_tenant(tenant.map(|Extension(t)| t))?;
    let time = parse_time(&req.time)?;

    let appointment = state
        .booking()
        .create(CreateAppointment {
            tenant_id,
            client_id: identity.user_id,
            professional_id: req.professional_id,
            service_id: req.service_id,
            date: req.date,
            time,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn list_own(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    tenant: Option<Extension<BoundTenant>>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    require_role(&identity, &[Role::Client])?;
    let tenant_id = guard::bound_tenant(tenant.map(|Extension(t)| t))?;

    let appointments = state
        .booking()
        .list_for_client(tenant_id, identity.user_id)
        .await?;
    Ok(Json(appointments))
}

async fn cancel(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, ApiError> {
    require_role(&identity, &[Role::Client])?;

    let appointment = state
        .booking()
        .cancel_by_client(id, identity.user_id)
        .await?;
    Ok(Json(appointment))
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: String,
}

async fn update_status(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Appointment>, ApiError> {
    require_role(&identity, &[Role::Professional])?;
    let status = AppointmentStatus::from_wire(&req.status)
        .ok_or_else(|| validation("invalid appointment status"))?;

    let appointment = state
        .booking()
        .update_status(id, identity.user_id, status)
        .await?;
    Ok(Json(appointment))
}

#[derive(Debug, Deserialize)]
struct RevenueQuery {
    periodo: String,
}

async fn revenue(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    tenant: Option<Extension<BoundTenant>>,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<RevenueSummary>, ApiError> {
    require_role(&identity, &[Role::Professional])?;
    let tenant_id = guard::bound_tenant(tenant.map(|Extension(t)| t))?;
    let period = Period::parse(&query.periodo)
        .ok_or_else(|| validation("period must be one of: day, month, year, all"))?;

    let summary = state
        .revenue()
        .summarize(tenant_id, identity.user_id, period)
        .await?;
    Ok(Json(summary))
}
