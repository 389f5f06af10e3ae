//! Route assembly.
//!
//! Three surfaces with distinct guard chains: public (login, register,
//! leads), tenant-scoped (identity → tenant binding + status gate →
//! role checks inside handlers), and admin (identity → platform-admin
//! check inside handlers).

mod admin;
mod appointments;
mod auth;
mod availability;
mod leads;
mod services;

use axum::Router;
use axum::middleware;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::guard;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let public = Router::new().merge(auth::router()).merge(leads::router());

    let tenant_scoped = Router::new()
        .merge(appointments::router())
        .merge(availability::router())
        .merge(services::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::tenant_gate,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_auth,
        ));

    let admin = admin::router().layer(middleware::from_fn_with_state(
        state.clone(),
        guard::require_auth,
    ));

    Router::new()
        .merge(public)
        .merge(tenant_scoped)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
