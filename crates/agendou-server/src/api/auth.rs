//! Authentication routes: login and registration.

use agendou_auth::{LoginInput, RegisterInput};
use agendou_core::models::user::{Role, User};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, validation};
use crate::guard::BUSINESS_ID_HEADER;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// User representation safe to return to clients.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub public_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            instagram: user.instagram,
            public_message: user.public_message,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
    expires_in: u64,
    user: UserDto,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let output = state
        .auth()
        .login(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: output.access_token,
        expires_in: output.expires_in,
        user: output.user.into(),
    }))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    role: Role,
    /// Tenant to register under; the X-Business-Id header also works.
    business_id: Option<Uuid>,
    access_code: Option<String>,
    phone: Option<String>,
    instagram: Option<String>,
    public_message: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let header_tenant = match headers.get(BUSINESS_ID_HEADER) {
        Some(raw) => {
            let raw = raw
                .to_str()
                .map_err(|_| validation("malformed X-Business-Id header"))?;
            Some(
                Uuid::parse_str(raw)
                    .map_err(|_| validation("malformed X-Business-Id header"))?,
            )
        }
        None => None,
    };

    let user = state
        .auth()
        .register(RegisterInput {
            tenant_id: req.business_id.or(header_tenant),
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
            access_code: req.access_code,
            phone: req.phone,
            instagram: req.instagram,
            public_message: req.public_message,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}
