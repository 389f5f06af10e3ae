//! Environment-driven server configuration.

use agendou_auth::AuthConfig;
use agendou_db::DbConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Assemble configuration from environment variables, falling back
    /// to development defaults.
    pub fn from_env() -> Self {
        let db_defaults = DbConfig::default();
        let auth_defaults = AuthConfig::default();

        Self {
            bind_addr: env_or("AGENDOU_BIND_ADDR", "0.0.0.0:3000"),
            db: DbConfig {
                url: env_or("AGENDOU_DB_URL", &db_defaults.url),
                namespace: env_or("AGENDOU_DB_NAMESPACE", &db_defaults.namespace),
                database: env_or("AGENDOU_DB_DATABASE", &db_defaults.database),
                username: env_or("AGENDOU_DB_USERNAME", &db_defaults.username),
                password: env_or("AGENDOU_DB_PASSWORD", &db_defaults.password),
            },
            auth: AuthConfig {
                jwt_private_key_pem: env_or("AGENDOU_JWT_PRIVATE_KEY", ""),
                jwt_public_key_pem: env_or("AGENDOU_JWT_PUBLIC_KEY", ""),
                jwt_issuer: env_or("AGENDOU_JWT_ISSUER", &auth_defaults.jwt_issuer),
                pepper: std::env::var("AGENDOU_PASSWORD_PEPPER").ok(),
                ..auth_defaults
            },
        }
    }
}
