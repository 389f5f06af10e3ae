//! Availability routes: professionals declare open windows; clients
//! query bookable start times.

use agendou_auth::{Identity, require_role};
use agendou_core::models::availability::{AvailabilityWindow, CreateAvailabilityWindow};
use agendou_core::models::user::Role;
use agendou_core::repository::{AvailabilityRepository, ServiceRepository};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, validation};
use crate::guard::{self, BoundTenant};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/disponibilidades", post(create))
        .route("/disponibilidades/horarios-disponiveis", get(open_slots))
}

#[derive(Debug, Deserialize)]
struct OpenSlotsQuery {
    #[serde(rename = "profissionalId")]
    professional_id: Uuid,
    #[serde(rename = "data")]
    date: NaiveDate,
    #[serde(rename = "servicoId")]
    service_id: Uuid,
}

/// Bookable `HH:MM` start times for one professional, date, and
/// service. An empty list is the normal fully-booked answer.
async fn open_slots(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    tenant: Option<Extension<BoundTenant>>,
    Query(query): Query<OpenSlotsQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    require_role(&identity, &[Role::Client, Role::Professional])?;
    let tenant_id = guard::bound_tenant(tenant.map(|Extension(t)| t))?;

    let service = state.services.get_by_id(tenant_id, query.service_id).await?;

    let booking = state.booking();
    let times = booking
        .checker()
        .available_start_times(
            tenant_id,
            query.professional_id,
            query.date,
            service.duration_minutes,
        )
        .await?;

    Ok(Json(
        times
            .into_iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect(),
    ))
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CreateWindowRequest {
    date: NaiveDate,
    start_minute: u16,
    end_minute: u16,
    #[serde(default = "default_available")]
    available: bool,
}

async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    tenant: Option<Extension<BoundTenant>>,
    Json(req): Json<CreateWindowRequest>,
) -> Result<(StatusCode, Json<AvailabilityWindow>), ApiError> {
    require_role(&identity, &[Role::Professional])?;
    let tenant_id = guard::bound_tenant(tenant.map(|Extension(t)| t))?;

    if req.start_minute >= req.end_minute || req.end_minute > 1440 {
        return Err(validation(
            "window must satisfy 0 <= start < end <= 1440 minutes",
        ));
    }

    let window = state
        .windows
        .create(CreateAvailabilityWindow {
            tenant_id,
            professional_id: identity.user_id,
            date: req.date,
            start_minute: req.start_minute,
            end_minute: req.end_minute,
            available: req.available,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(window)))
}
