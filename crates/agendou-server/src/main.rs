//! Agendou Server — application entry point.

mod api;
mod config;
mod error;
mod guard;
mod state;

use agendou_db::DbManager;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("agendou=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Agendou server...");

    let config = ServerConfig::from_env();

    let db = DbManager::connect(&config.db)
        .await
        .expect("failed to connect to SurrealDB");
    agendou_db::run_migrations(db.client())
        .await
        .expect("failed to run migrations");

    let state = AppState::new(db.client().clone(), config.auth.clone());
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind listen address");
    tracing::info!(addr = %config.bind_addr, "Agendou server listening");

    axum::serve(listener, app).await.expect("server error");
}
