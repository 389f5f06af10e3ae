//! Platform administration routes: tenant billing lifecycle and
//! access-code provisioning.

use agendou_auth::{Identity, access_code};
use agendou_core::models::access_code::{AccessCode, CreateAccessCode};
use agendou_core::models::tenant::{
    CreateTenant, PaymentStatus, PlanTier, Tenant, UpdateTenant, UsageLimits,
};
use agendou_core::repository::{AccessCodeRepository, Pagination, TenantRepository};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::guard::require_platform_admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/businesses", get(list).post(create))
        .route("/admin/businesses/{id}", patch(update))
        .route("/admin/businesses/{id}/payments", post(register_payment))
        .route("/admin/access-codes", post(create_access_code))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    offset: Option<u64>,
    limit: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    items: Vec<Tenant>,
    total: u64,
    offset: u64,
    limit: u64,
}

async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    require_platform_admin(&identity)?;

    let defaults = Pagination::default();
    let page = state
        .tenants
        .list(Pagination {
            offset: query.offset.unwrap_or(defaults.offset),
            limit: query.limit.unwrap_or(defaults.limit),
        })
        .await?;

    Ok(Json(ListResponse {
        items: page.items,
        total: page.total,
        offset: page.offset,
        limit: page.limit,
    }))
}

#[derive(Debug, Deserialize)]
struct CreateBusinessRequest {
    name: String,
    slug: String,
    custom_domain: Option<String>,
    plan: Option<PlanTier>,
    grace_days: Option<i64>,
    limits: Option<UsageLimits>,
}

/// Admin-provisioned businesses start out Active, unlike lead-form
/// submissions.
async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateBusinessRequest>,
) -> Result<(StatusCode, Json<Tenant>), ApiError> {
    require_platform_admin(&identity)?;

    let tenant = state
        .tenants
        .create(CreateTenant {
            name: req.name,
            slug: req.slug,
            custom_domain: req.custom_domain,
            plan: req.plan.unwrap_or(PlanTier::Basic),
            payment_status: PaymentStatus::Active,
            grace_days: req.grace_days,
            limits: req.limits,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTenant>,
) -> Result<Json<Tenant>, ApiError> {
    require_platform_admin(&identity)?;

    let tenant = state.tenants.update(id, input).await?;
    tracing::info!(business = %tenant.slug, payment_status = ?tenant.payment_status, "business updated");
    Ok(Json(tenant))
}

async fn register_payment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Tenant>, ApiError> {
    require_platform_admin(&identity)?;

    let tenant = state.tenants.register_payment(id, Utc::now()).await?;
    tracing::info!(business = %tenant.slug, "payment registered");
    Ok(Json(tenant))
}

#[derive(Debug, Deserialize)]
struct CreateAccessCodeRequest {
    business_id: Uuid,
    /// Generated when absent.
    code: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    description: Option<String>,
}

async fn create_access_code(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateAccessCodeRequest>,
) -> Result<(StatusCode, Json<AccessCode>), ApiError> {
    require_platform_admin(&identity)?;

    let code = state
        .access_codes
        .create(CreateAccessCode {
            tenant_id: req.business_id,
            code: req.code.unwrap_or_else(access_code::generate_code),
            expires_at: req.expires_at,
            description: req.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(code)))
}
