//! Tenant status gate — the persisting half.
//!
//! Wraps the pure predicate in `agendou_core::gate` with the repository
//! write that makes the overdue auto-block durable. This runs at login
//! and on every authenticated tenant-scoped request.

use agendou_core::clock::Clock;
use agendou_core::error::{AgendouError, AgendouResult};
use agendou_core::gate::{self, TenantGateError};
use agendou_core::models::tenant::Tenant;
use agendou_core::repository::TenantRepository;
use uuid::Uuid;

pub struct TenantGate<T: TenantRepository, C: Clock> {
    tenant_repo: T,
    clock: C,
}

impl<T: TenantRepository, C: Clock> TenantGate<T, C> {
    pub fn new(tenant_repo: T, clock: C) -> Self {
        Self { tenant_repo, clock }
    }

    /// Load the tenant, evaluate the gate, and persist the auto-block
    /// transition when the verdict is overdue-beyond-grace.
    ///
    /// Idempotent: once blocked, later calls short-circuit through the
    /// `Blocked` branch of the predicate without another write.
    pub async fn enforce(&self, tenant_id: Uuid) -> AgendouResult<Tenant> {
        let tenant = match self.tenant_repo.get_by_id(tenant_id).await {
            Ok(tenant) => tenant,
            Err(AgendouError::NotFound { .. }) => {
                return Err(TenantGateError::Inactive.into());
            }
            Err(e) => return Err(e),
        };

        let now = self.clock.now();
        match gate::evaluate(&tenant, now) {
            Ok(()) => Ok(tenant),
            Err(err @ TenantGateError::OverdueBlocked { days_overdue, .. }) => {
                self.tenant_repo.mark_blocked(tenant.id, now).await?;
                tracing::warn!(
                    tenant = %tenant.slug,
                    days_overdue,
                    "tenant auto-blocked after exhausting grace period"
                );
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}
