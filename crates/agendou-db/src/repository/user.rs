//! SurrealDB implementation of [`UserRepository`].

use agendou_core::error::{AgendouError, AgendouResult};
use agendou_core::models::user::{CreateUser, Role, User};
use agendou_core::repository::UserRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

fn parse_role(s: &str) -> Result<Role, DbError> {
    match s {
        "Admin" => Ok(Role::Admin),
        "Professional" => Ok(Role::Professional),
        "Client" => Ok(Role::Client),
        other => Err(DbError::Data(format!("unknown role: {other}"))),
    }
}

fn role_to_string(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::Professional => "Professional",
        Role::Client => "Client",
    }
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    tenant_id: Option<String>,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    phone: Option<String>,
    instagram: Option<String>,
    public_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        let tenant_id = match &self.tenant_id {
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|e| DbError::Data(format!("invalid tenant UUID: {e}")))?,
            ),
            None => None,
        };
        Ok(User {
            id,
            tenant_id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            phone: self.phone,
            instagram: self.instagram,
            public_message: self.public_message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    tenant_id: Option<String>,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    phone: Option<String>,
    instagram: Option<String>,
    public_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Data(format!("invalid UUID: {e}")))?;
        let tenant_id = match &self.tenant_id {
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|e| DbError::Data(format!("invalid tenant UUID: {e}")))?,
            ),
            None => None,
        };
        Ok(User {
            id,
            tenant_id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            phone: self.phone,
            instagram: self.instagram,
            public_message: self.public_message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> AgendouResult<User> {
        // Email is globally unique; the unique index backs this check
        // against races.
        match self.get_by_email(&input.email).await {
            Ok(_) => {
                return Err(AgendouError::AlreadyExists {
                    entity: "user".into(),
                });
            }
            Err(AgendouError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 tenant_id = $tenant_id, \
                 name = $name, email = $email, \
                 password_hash = $password_hash, \
                 role = $role, \
                 phone = $phone, instagram = $instagram, \
                 public_message = $public_message",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.map(|t| t.to_string())))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("password_hash", input.password_hash))
            .bind(("role", role_to_string(input.role)))
            .bind(("phone", input.phone))
            .bind(("instagram", input.instagram))
            .bind(("public_message", input.public_message))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AgendouResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_email(&self, email: &str) -> AgendouResult<User> {
        let email_owned = email.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM user \
                 WHERE email = $email",
            )
            .bind(("email", email_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn count_by_role(&self, tenant_id: Uuid, role: Role) -> AgendouResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM user \
                 WHERE tenant_id = $tenant_id AND role = $role \
                 GROUP ALL",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("role", role_to_string(role)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
