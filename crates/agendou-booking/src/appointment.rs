//! Appointment lifecycle — creation, client cancellation, and
//! professional status updates.

use agendou_core::clock::Clock;
use agendou_core::error::{AgendouError, AgendouResult};
use agendou_core::models::appointment::{Appointment, AppointmentStatus, CreateAppointment};
use agendou_core::repository::{AppointmentRepository, AvailabilityRepository, ServiceRepository};
use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

use crate::availability::AvailabilityChecker;
use crate::error::BookingError;

/// Minimum lead time for a client-side cancellation.
const CANCEL_LEAD_TIME_HOURS: i64 = 2;

pub struct BookingService<S, A, P, C>
where
    S: ServiceRepository + Clone,
    A: AvailabilityRepository + Clone,
    P: AppointmentRepository + Clone,
    C: Clock,
{
    services: S,
    appointments: P,
    checker: AvailabilityChecker<S, A, P>,
    clock: C,
}

impl<S, A, P, C> BookingService<S, A, P, C>
where
    S: ServiceRepository + Clone,
    A: AvailabilityRepository + Clone,
    P: AppointmentRepository + Clone,
    C: Clock,
{
    pub fn new(services: S, windows: A, appointments: P, clock: C) -> Self {
        let checker =
            AvailabilityChecker::new(services.clone(), windows, appointments.clone());
        Self {
            services,
            appointments,
            checker,
            clock,
        }
    }

    pub fn checker(&self) -> &AvailabilityChecker<S, A, P> {
        &self.checker
    }

    /// Book a pending appointment for a client.
    ///
    /// The requested time must be in the checker's current result set,
    /// and the insert re-verifies slot ownership transactionally: two
    /// concurrent requests for the same slot produce exactly one
    /// booking.
    pub async fn create(&self, input: CreateAppointment) -> AgendouResult<Appointment> {
        let service = match self
            .services
            .get_by_id(input.tenant_id, input.service_id)
            .await
        {
            Ok(service) => service,
            Err(AgendouError::NotFound { .. }) => {
                return Err(BookingError::ServiceNotFound {
                    id: input.service_id,
                }
                .into());
            }
            Err(e) => return Err(e),
        };

        if !service.active || service.professional_id != input.professional_id {
            return Err(BookingError::ServiceNotFound {
                id: input.service_id,
            }
            .into());
        }

        let open = self
            .checker
            .available_start_times(
                input.tenant_id,
                input.professional_id,
                input.date,
                service.duration_minutes,
            )
            .await?;
        if !open.contains(&input.time) {
            return Err(BookingError::SlotUnavailable.into());
        }

        match self.appointments.create_pending(input).await {
            Ok(appointment) => {
                tracing::info!(
                    appointment = %appointment.id,
                    professional = %appointment.professional_id,
                    date = %appointment.date,
                    "appointment booked"
                );
                Ok(appointment)
            }
            // Lost the race for the slot between check and insert.
            Err(AgendouError::BusinessRule { .. }) => Err(BookingError::SlotUnavailable.into()),
            Err(e) => Err(e),
        }
    }

    /// Client-side cancellation, allowed only while the appointment is
    /// pending and starts at least two hours from now.
    pub async fn cancel_by_client(
        &self,
        appointment_id: Uuid,
        client_id: Uuid,
    ) -> AgendouResult<Appointment> {
        let appointment = self.get_owned(appointment_id).await?;
        if appointment.client_id != client_id {
            return Err(BookingError::NotFound { id: appointment_id }.into());
        }

        match appointment.status {
            AppointmentStatus::Cancelled => Err(BookingError::AlreadyCancelled.into()),
            AppointmentStatus::Done => Err(BookingError::AlreadyCompleted.into()),
            AppointmentStatus::InProgress => Err(BookingError::InProgressLocked.into()),
            AppointmentStatus::Pending => {
                let starts_at = NaiveDateTime::new(appointment.date, appointment.time);
                let now = self.clock.now().naive_utc();
                if starts_at.signed_duration_since(now)
                    < Duration::hours(CANCEL_LEAD_TIME_HOURS)
                {
                    return Err(BookingError::LeadTimeViolation.into());
                }
                self.appointments
                    .set_status(appointment_id, AppointmentStatus::Cancelled)
                    .await
            }
        }
    }

    /// Professional-side status transition, constrained by the closed
    /// transition table on [`AppointmentStatus`].
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        professional_id: Uuid,
        new_status: AppointmentStatus,
    ) -> AgendouResult<Appointment> {
        let appointment = self.get_owned(appointment_id).await?;
        if appointment.professional_id != professional_id {
            return Err(BookingError::NotFound { id: appointment_id }.into());
        }

        if !appointment.status.can_transition_to(new_status) {
            return Err(BookingError::IllegalTransition {
                from: appointment.status,
                to: new_status,
            }
            .into());
        }

        self.appointments
            .set_status(appointment_id, new_status)
            .await
    }

    /// A client's own appointment history.
    pub async fn list_for_client(
        &self,
        tenant_id: Uuid,
        client_id: Uuid,
    ) -> AgendouResult<Vec<Appointment>> {
        self.appointments.list_by_client(tenant_id, client_id).await
    }

    async fn get_owned(&self, appointment_id: Uuid) -> AgendouResult<Appointment> {
        match self.appointments.get_by_id(appointment_id).await {
            Ok(appointment) => Ok(appointment),
            Err(AgendouError::NotFound { .. }) => {
                Err(BookingError::NotFound { id: appointment_id }.into())
            }
            Err(e) => Err(e),
        }
    }
}
