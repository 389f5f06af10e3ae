//! Service configuration routes.

use agendou_auth::{Identity, require_role};
use agendou_core::error::AgendouError;
use agendou_core::models::service::{CreateService, Service};
use agendou_core::models::user::Role;
use agendou_core::repository::ServiceRepository;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Extension, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, validation};
use crate::guard::{self, BoundTenant};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/servicos", post(create).get(list))
        .route("/servicos/{id}", delete(deactivate))
}

#[derive(Debug, Deserialize)]
struct CreateServiceRequest {
    name: String,
    price: Decimal,
    duration_minutes: u32,
}

async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    tenant: Option<Extension<BoundTenant>>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    require_role(&identity, &[Role::Professional])?;
    let tenant_id = guard::bound_tenant(tenant.map(|Extension(t)| t))?;

    if req.duration_minutes == 0 || req.duration_minutes > 1440 {
        return Err(validation("duration must be between 1 and 1440 minutes"));
    }
    if req.price < Decimal::ZERO {
        return Err(validation("price must not be negative"));
    }

    let service = state
        .services
        .create(CreateService {
            tenant_id,
            professional_id: identity.user_id,
            name: req.name,
            price: req.price,
            duration_minutes: req.duration_minutes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(service)))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "profissionalId")]
    professional_id: Uuid,
}

async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    tenant: Option<Extension<BoundTenant>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Service>>, ApiError> {
    require_role(&identity, &[Role::Client, Role::Professional, Role::Admin])?;
    let tenant_id = guard::bound_tenant(tenant.map(|Extension(t)| t))?;

    let services = state
        .services
        .list_active_by_professional(tenant_id, query.professional_id)
        .await?;
    Ok(Json(services))
}

/// Soft-disable: the service disappears from booking but stays on past
/// appointments.
async fn deactivate(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    tenant: Option<Extension<BoundTenant>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_role(&identity, &[Role::Professional, Role::Admin])?;
    let tenant_id = guard::bound_tenant(tenant.map(|Extension(t)| t))?;

    let service = state.services.get_by_id(tenant_id, id).await?;
    if identity.role == Role::Professional && service.professional_id != identity.user_id {
        return Err(AgendouError::Forbidden {
            reason: "professionals can only manage their own services".into(),
        }
        .into());
    }

    state.services.deactivate(tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
