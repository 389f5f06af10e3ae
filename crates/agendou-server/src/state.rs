//! Shared application state: repository handles and service factories.

use agendou_auth::{AuthConfig, AuthService, IdentityResolver, TenantGate};
use agendou_booking::{BookingService, RevenueService};
use agendou_core::clock::SystemClock;
use agendou_db::repository::{
    SurrealAccessCodeRepository, SurrealAppointmentRepository, SurrealAvailabilityRepository,
    SurrealServiceRepository, SurrealTenantRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;

pub type Db = Client;

/// Cloneable per-request state. Repository handles share one SurrealDB
/// connection; services are assembled on demand from cheap clones.
#[derive(Clone)]
pub struct AppState {
    pub tenants: SurrealTenantRepository<Db>,
    pub users: SurrealUserRepository<Db>,
    pub services: SurrealServiceRepository<Db>,
    pub windows: SurrealAvailabilityRepository<Db>,
    pub appointments: SurrealAppointmentRepository<Db>,
    pub access_codes: SurrealAccessCodeRepository<Db>,
    pub auth_config: AuthConfig,
}

impl AppState {
    pub fn new(db: Surreal<Db>, auth_config: AuthConfig) -> Self {
        Self {
            tenants: SurrealTenantRepository::new(db.clone()),
            users: SurrealUserRepository::new(db.clone()),
            services: SurrealServiceRepository::new(db.clone()),
            windows: SurrealAvailabilityRepository::new(db.clone()),
            appointments: SurrealAppointmentRepository::new(db.clone()),
            access_codes: SurrealAccessCodeRepository::new(db),
            auth_config,
        }
    }

    pub fn auth(
        &self,
    ) -> AuthService<
        SurrealUserRepository<Db>,
        SurrealTenantRepository<Db>,
        SurrealAccessCodeRepository<Db>,
        SystemClock,
    > {
        AuthService::new(
            self.users.clone(),
            self.tenants.clone(),
            self.access_codes.clone(),
            SystemClock,
            self.auth_config.clone(),
        )
    }

    pub fn resolver(&self) -> IdentityResolver<SurrealUserRepository<Db>> {
        IdentityResolver::new(self.users.clone(), self.auth_config.clone())
    }

    pub fn gate(&self) -> TenantGate<SurrealTenantRepository<Db>, SystemClock> {
        TenantGate::new(self.tenants.clone(), SystemClock)
    }

    pub fn booking(
        &self,
    ) -> BookingService<
        SurrealServiceRepository<Db>,
        SurrealAvailabilityRepository<Db>,
        SurrealAppointmentRepository<Db>,
        SystemClock,
    > {
        BookingService::new(
            self.services.clone(),
            self.windows.clone(),
            self.appointments.clone(),
            SystemClock,
        )
    }

    pub fn revenue(
        &self,
    ) -> RevenueService<SurrealAppointmentRepository<Db>, SurrealServiceRepository<Db>, SystemClock>
    {
        RevenueService::new(self.appointments.clone(), self.services.clone(), SystemClock)
    }
}
