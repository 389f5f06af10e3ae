//! Request guard pipeline.
//!
//! An ordered chain of middleware runs in front of protected handlers:
//! identity resolution first, then (for tenant-scoped routes) tenant
//! binding plus the tenant status gate. Each guard returns a result
//! instead of mutating shared request state; what it proves is attached
//! to the request as typed extensions.

use agendou_auth::{Identity, bind_tenant, token};
use agendou_core::error::AgendouError;
use agendou_core::models::user::Role;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::{ApiError, validation};
use crate::state::AppState;

/// Header carrying the tenant context for a request.
pub const BUSINESS_ID_HEADER: &str = "x-business-id";

/// Tenant the request was bound to after the gate let it through.
#[derive(Debug, Clone, Copy)]
pub struct BoundTenant(pub Uuid);

/// Resolve the bearer credential and attach the [`Identity`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(token::extract_bearer)
        .ok_or(AgendouError::AuthenticationFailed {
            reason: "missing bearer credential".into(),
        })?;

    let identity = state.resolver().resolve(bearer).await?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Bind the request to a tenant and run the status gate.
///
/// Requires [`require_auth`] to have run. Admin identities without a
/// tenant context pass through ungated.
pub async fn tenant_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or(AgendouError::AuthenticationFailed {
            reason: "missing bearer credential".into(),
        })?;

    let requested = match req.headers().get(BUSINESS_ID_HEADER) {
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

    let bound = bind_tenant(&identity, requested)?;
    if let Some(tenant_id) = bound {
        state.gate().enforce(tenant_id).await?;
        req.extensions_mut().insert(BoundTenant(tenant_id));
    }
    Ok(next.run(req).await)
}

/// The bound tenant for a handler that must be tenant-scoped.
pub fn bound_tenant(req_tenant: Option<BoundTenant>) -> Result<Uuid, ApiError> {
    req_tenant
        .map(|t| t.0)
        .ok_or_else(|| validation("tenant context is required"))
}

/// Platform administrators only: the Admin role with no tenant binding.
pub fn require_platform_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.role == Role::Admin && identity.tenant_id.is_none() {
        Ok(())
    } else {
        Err(AgendouError::Forbidden {
            reason: "platform administrator access required".into(),
        }
        .into())
    }
}
