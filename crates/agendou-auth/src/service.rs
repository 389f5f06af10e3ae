//! Authentication service — login and registration orchestration.

use agendou_core::clock::Clock;
use agendou_core::error::{AgendouError, AgendouResult};
use agendou_core::models::user::{CreateUser, Role, User};
use agendou_core::repository::{AccessCodeRepository, TenantRepository, UserRepository};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::gate::TenantGate;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub user: User,
}

/// Input for the registration flow.
#[derive(Debug)]
pub struct RegisterInput {
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Required for professional/admin self-registration.
    pub access_code: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub public_message: Option<String>,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate.
pub struct AuthService<U, T, A, C>
where
    U: UserRepository,
    T: TenantRepository + Clone,
    A: AccessCodeRepository,
    C: Clock + Clone,
{
    user_repo: U,
    tenant_repo: T,
    access_codes: A,
    clock: C,
    gate: TenantGate<T, C>,
    config: AuthConfig,
}

impl<U, T, A, C> AuthService<U, T, A, C>
where
    U: UserRepository,
    T: TenantRepository + Clone,
    A: AccessCodeRepository,
    C: Clock + Clone,
{
    pub fn new(user_repo: U, tenant_repo: T, access_codes: A, clock: C, config: AuthConfig) -> Self {
        let gate = TenantGate::new(tenant_repo.clone(), clock.clone());
        Self {
            user_repo,
            tenant_repo,
            access_codes,
            clock,
            gate,
            config,
        }
    }

    /// Authenticate with email + password and issue a token.
    ///
    /// The tenant status gate runs before any token is issued, so a
    /// blocked or cancelled business denies its users at the door.
    pub async fn login(&self, input: LoginInput) -> AgendouResult<LoginOutput> {
        // 1. Global email lookup. Unknown email and wrong password are
        //    indistinguishable to the caller.
        let user = match self.user_repo.get_by_email(&input.email).await {
            Ok(user) => user,
            Err(AgendouError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredential.into());
            }
            Err(e) => return Err(e),
        };

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredential.into());
        }

        // 3. Tenant status gate for tenant-bound users.
        if let Some(tenant_id) = user.tenant_id {
            self.gate.enforce(tenant_id).await?;
        }

        // 4. Issue JWT access token.
        let access_token = token::issue_access_token(
            user.id,
            user.role,
            user.tenant_id,
            self.clock.now(),
            &self.config,
        )?;

        Ok(LoginOutput {
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
            user,
        })
    }

    /// Register a new user within a tenant.
    ///
    /// Clients register freely; professionals and business admins must
    /// present a valid access code, and nothing is written when the
    /// code check fails. Professional head count is capped by the
    /// tenant's plan limits.
    pub async fn register(&self, input: RegisterInput) -> AgendouResult<User> {
        if input.password.len() < self.config.min_password_length {
            return Err(AgendouError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        let tenant_id = input.tenant_id.ok_or_else(|| AgendouError::Validation {
            message: "tenant context is required for registration".into(),
        })?;

        if matches!(input.role, Role::Professional | Role::Admin) {
            self.check_access_code(tenant_id, input.access_code.as_deref())
                .await?;
        }

        if input.role == Role::Professional {
            let tenant = self.tenant_repo.get_by_id(tenant_id).await?;
            let count = self
                .user_repo
                .count_by_role(tenant_id, Role::Professional)
                .await?;
            if count >= u64::from(tenant.limits.max_professionals) {
                return Err(AuthError::LimitReached {
                    resource: "professionals",
                }
                .into());
            }
        }

        let password_hash =
            password::hash_password(&input.password, self.config.pepper.as_deref())?;

        self.user_repo
            .create(CreateUser {
                tenant_id: Some(tenant_id),
                name: input.name,
                email: input.email,
                password_hash,
                role: input.role,
                phone: input.phone,
                instagram: input.instagram,
                public_message: input.public_message,
            })
            .await
    }

    async fn check_access_code(
        &self,
        tenant_id: Uuid,
        code: Option<&str>,
    ) -> AgendouResult<()> {
        let code = code.ok_or(AuthError::AccessCodeInvalid)?;
        let access = match self.access_codes.get_by_code(tenant_id, code).await {
            Ok(access) => access,
            Err(AgendouError::NotFound { .. }) => {
                return Err(AuthError::AccessCodeInvalid.into());
            }
            Err(e) => return Err(e),
        };

        if !access.is_valid_at(self.clock.now()) {
            return Err(AuthError::AccessCodeInvalid.into());
        }
        Ok(())
    }
}
