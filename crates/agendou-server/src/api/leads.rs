//! Public lead form: prospective businesses register interest and get
//! a Pending tenant an administrator can later activate.

use agendou_core::models::tenant::{CreateTenant, PaymentStatus, PlanTier};
use agendou_core::repository::TenantRepository;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/leads", post(create))
}

#[derive(Debug, Deserialize)]
struct LeadRequest {
    name: String,
    slug: String,
    custom_domain: Option<String>,
    plan: Option<PlanTier>,
}

#[derive(Debug, Serialize)]
struct LeadResponse {
    id: Uuid,
    name: String,
    slug: String,
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<LeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), ApiError> {
    let tenant = state
        .tenants
        .create(CreateTenant {
            name: req.name,
            slug: req.slug,
            custom_domain: req.custom_domain,
            plan: req.plan.unwrap_or(PlanTier::Basic),
            payment_status: PaymentStatus::Pending,
            grace_days: None,
            limits: None,
        })
        .await?;

    tracing::info!(business = %tenant.slug, "lead registered");

    Ok((
        StatusCode::CREATED,
        Json(LeadResponse {
            id: tenant.id,
            name: tenant.name,
            slug: tenant.slug,
        }),
    ))
}
