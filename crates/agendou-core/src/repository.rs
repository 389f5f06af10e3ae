//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories take a
//! `tenant_id` parameter to enforce data isolation; users and
//! appointments are addressed by globally unique ids with ownership
//! checked by the service layer.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::AgendouResult;
use crate::models::{
    access_code::{AccessCode, CreateAccessCode},
    appointment::{Appointment, AppointmentStatus, CreateAppointment},
    availability::{AvailabilityWindow, CreateAvailabilityWindow},
    service::{CreateService, Service},
    tenant::{CreateTenant, Tenant, UpdateTenant},
    user::{CreateUser, Role, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = AgendouResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgendouResult<Tenant>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = AgendouResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = AgendouResult<Tenant>> + Send;

    /// Persist the gate's auto-block transition: payment status becomes
    /// `Blocked` and `blocked_at` is stamped.
    fn mark_blocked(
        &self,
        id: Uuid,
        blocked_at: DateTime<Utc>,
    ) -> impl Future<Output = AgendouResult<Tenant>> + Send;

    /// Register a payment: status back to `Active`, `last_payment_at`
    /// stamped, `blocked_at` cleared, due date advanced.
    fn register_payment(
        &self,
        id: Uuid,
        paid_at: DateTime<Utc>,
    ) -> impl Future<Output = AgendouResult<Tenant>> + Send;

    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = AgendouResult<PaginatedResult<Tenant>>> + Send;
}

pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the email is taken.
    fn create(&self, input: CreateUser) -> impl Future<Output = AgendouResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgendouResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = AgendouResult<User>> + Send;
    /// Head count for usage-limit enforcement.
    fn count_by_role(
        &self,
        tenant_id: Uuid,
        role: Role,
    ) -> impl Future<Output = AgendouResult<u64>> + Send;
}

pub trait ServiceRepository: Send + Sync {
    fn create(&self, input: CreateService) -> impl Future<Output = AgendouResult<Service>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AgendouResult<Service>> + Send;
    fn list_active_by_professional(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
    ) -> impl Future<Output = AgendouResult<Vec<Service>>> + Send;
    /// Soft-disable: clears the active flag, keeps the row.
    fn deactivate(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AgendouResult<()>> + Send;
}

pub trait AvailabilityRepository: Send + Sync {
    fn create(
        &self,
        input: CreateAvailabilityWindow,
    ) -> impl Future<Output = AgendouResult<AvailabilityWindow>> + Send;
    /// All windows (regardless of the available flag) for one
    /// professional on one calendar date.
    fn list_for_date(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> impl Future<Output = AgendouResult<Vec<AvailabilityWindow>>> + Send;
}

pub trait AppointmentRepository: Send + Sync {
    /// Insert a `Pending` appointment. Runs the conflict check and the
    /// insert in one transaction; fails with `BusinessRule` when a
    /// non-cancelled appointment already holds that exact slot.
    fn create_pending(
        &self,
        input: CreateAppointment,
    ) -> impl Future<Output = AgendouResult<Appointment>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AgendouResult<Appointment>> + Send;
    fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> impl Future<Output = AgendouResult<Appointment>> + Send;
    fn list_by_client(
        &self,
        tenant_id: Uuid,
        client_id: Uuid,
    ) -> impl Future<Output = AgendouResult<Vec<Appointment>>> + Send;
    /// Non-cancelled appointments for one professional on one date.
    fn list_active_for_date(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
        date: NaiveDate,
    ) -> impl Future<Output = AgendouResult<Vec<Appointment>>> + Send;
    /// `Done` appointments with date >= start, for revenue reporting.
    fn list_done_since(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
        start: NaiveDate,
    ) -> impl Future<Output = AgendouResult<Vec<Appointment>>> + Send;
}

pub trait AccessCodeRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the code is taken within the
    /// tenant.
    fn create(
        &self,
        input: CreateAccessCode,
    ) -> impl Future<Output = AgendouResult<AccessCode>> + Send;
    fn get_by_code(
        &self,
        tenant_id: Uuid,
        code: &str,
    ) -> impl Future<Output = AgendouResult<AccessCode>> + Send;
}
