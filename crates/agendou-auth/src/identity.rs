//! Identity resolution and tenant binding.
//!
//! [`IdentityResolver::resolve`] turns a bearer token into a live
//! [`Identity`]; [`bind_tenant`] and [`require_role`] are the pure
//! request guards composed in front of every handler.

use agendou_core::error::{AgendouError, AgendouResult};
use agendou_core::models::user::Role;
use agendou_core::repository::UserRepository;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token;

/// A verified acting user.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
    /// The user's stored tenant binding (`None` for platform admins).
    pub tenant_id: Option<Uuid>,
    /// The tenant claim embedded in the presented credential.
    pub claim_tenant_id: Option<Uuid>,
}

/// Resolves bearer credentials against the user store.
pub struct IdentityResolver<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> IdentityResolver<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    /// Verify the token and confirm the subject still exists.
    ///
    /// Any verification failure (bad signature, expiry, malformed
    /// subject, or a deleted user) collapses into the same
    /// invalid-credential error.
    pub async fn resolve(&self, bearer_token: &str) -> AgendouResult<Identity> {
        let claims = token::decode_access_token(bearer_token, &self.config)
            .map_err(|_| AuthError::InvalidCredential)?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidCredential)?;
        let claim_tenant_id = match &claims.tenant_id {
            Some(raw) => {
                Some(Uuid::parse_str(raw).map_err(|_| AuthError::InvalidCredential)?)
            }
            None => None,
        };

        let user = match self.user_repo.get_by_id(user_id).await {
            Ok(user) => user,
            Err(AgendouError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredential.into());
            }
            Err(e) => return Err(e),
        };

        Ok(Identity {
            user_id: user.id,
            role: user.role,
            tenant_id: user.tenant_id,
            claim_tenant_id,
        })
    }
}

/// Reconcile the tenant id from the request header against the one
/// embedded in the credential.
///
/// When both are present they must agree. Non-admin identities must
/// additionally land on their stored tenant binding. Admin identities
/// bypass binding entirely.
pub fn bind_tenant(
    identity: &Identity,
    requested: Option<Uuid>,
) -> Result<Option<Uuid>, AuthError> {
    if identity.role == Role::Admin {
        return Ok(requested.or(identity.claim_tenant_id));
    }

    if let (Some(header), Some(claim)) = (requested, identity.claim_tenant_id) {
        if header != claim {
            return Err(AuthError::TenantMismatch);
        }
    }

    let resolved = requested.or(identity.claim_tenant_id);
    match (resolved, identity.tenant_id) {
        (Some(tenant), Some(stored)) if tenant == stored => Ok(Some(tenant)),
        (None, Some(stored)) => Ok(Some(stored)),
        _ => Err(AuthError::TenantMismatch),
    }
}

/// Fail with a forbidden error unless the identity's role is allowed.
pub fn require_role(identity: &Identity, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.contains(&identity.role) {
        Ok(())
    } else {
        Err(AuthError::RoleNotAllowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role, tenant_id: Option<Uuid>, claim: Option<Uuid>) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            role,
            tenant_id,
            claim_tenant_id: claim,
        }
    }

    #[test]
    fn matching_header_and_claim_bind() {
        let tenant = Uuid::new_v4();
        let id = identity(Role::Client, Some(tenant), Some(tenant));
        assert_eq!(bind_tenant(&id, Some(tenant)).unwrap(), Some(tenant));
    }

    #[test]
    fn header_claim_disagreement_is_rejected() {
        let tenant = Uuid::new_v4();
        let id = identity(Role::Client, Some(tenant), Some(tenant));
        assert!(matches!(
            bind_tenant(&id, Some(Uuid::new_v4())),
            Err(AuthError::TenantMismatch)
        ));
    }

    #[test]
    fn missing_header_falls_back_to_claim() {
        let tenant = Uuid::new_v4();
        let id = identity(Role::Professional, Some(tenant), Some(tenant));
        assert_eq!(bind_tenant(&id, None).unwrap(), Some(tenant));
    }

    #[test]
    fn claim_must_match_stored_binding() {
        let stored = Uuid::new_v4();
        let foreign = Uuid::new_v4();
        // Credential claims a tenant the user does not belong to.
        let id = identity(Role::Client, Some(stored), Some(foreign));
        assert!(matches!(
            bind_tenant(&id, None),
            Err(AuthError::TenantMismatch)
        ));
    }

    #[test]
    fn admin_bypasses_binding() {
        let id = identity(Role::Admin, None, None);
        let requested = Uuid::new_v4();
        assert_eq!(bind_tenant(&id, Some(requested)).unwrap(), Some(requested));
        assert_eq!(bind_tenant(&id, None).unwrap(), None);
    }

    #[test]
    fn role_membership_is_enforced() {
        let id = identity(Role::Client, Some(Uuid::new_v4()), None);
        assert!(require_role(&id, &[Role::Client, Role::Professional]).is_ok());
        assert!(matches!(
            require_role(&id, &[Role::Admin]),
            Err(AuthError::RoleNotAllowed)
        ));
    }
}
