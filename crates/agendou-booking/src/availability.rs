//! Slot availability checking.
//!
//! The bookable start times for a professional on a date are the
//! intersection of their declared availability windows with the gaps
//! left by existing non-cancelled appointments. The arithmetic is a
//! pure function over minute offsets; the service wrapper feeds it from
//! the repositories.

use std::collections::{BTreeSet, HashMap};

use agendou_core::error::AgendouResult;
use agendou_core::models::availability::AvailabilityWindow;
use agendou_core::repository::{AppointmentRepository, AvailabilityRepository, ServiceRepository};
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// A minute range already taken by a booking.
#[derive(Debug, Clone, Copy)]
pub struct BusyInterval {
    pub start_minute: u16,
    pub duration_minutes: u32,
}

impl BusyInterval {
    fn overlaps(&self, start: u32, end: u32) -> bool {
        let busy_start = u32::from(self.start_minute);
        let busy_end = busy_start + self.duration_minutes;
        start < busy_end && busy_start < end
    }
}

/// Compute eligible start offsets (minutes from midnight), ascending
/// and deduplicated across windows.
///
/// Candidates step through each available window from its start in
/// increments of the service duration; a candidate survives when the
/// whole `[start, start + duration)` range fits the window and touches
/// no busy interval.
pub fn eligible_starts(
    windows: &[AvailabilityWindow],
    busy: &[BusyInterval],
    duration_minutes: u32,
) -> Vec<u16> {
    if duration_minutes == 0 {
        return Vec::new();
    }

    let mut starts = BTreeSet::new();
    for window in windows.iter().filter(|w| w.available) {
        let mut candidate = u32::from(window.start_minute);
        while candidate + duration_minutes <= u32::from(window.end_minute) {
            let end = candidate + duration_minutes;
            if !busy.iter().any(|b| b.overlaps(candidate, end)) {
                starts.insert(candidate as u16);
            }
            candidate += duration_minutes;
        }
    }
    starts.into_iter().collect()
}

/// Repository-backed slot availability checker.
pub struct AvailabilityChecker<S, A, P>
where
    S: ServiceRepository,
    A: AvailabilityRepository,
    P: AppointmentRepository,
{
    services: S,
    windows: A,
    appointments: P,
}

impl<S, A, P> AvailabilityChecker<S, A, P>
where
    S: ServiceRepository,
    A: AvailabilityRepository,
    P: AppointmentRepository,
{
    pub fn new(services: S, windows: A, appointments: P) -> Self {
        Self {
            services,
            windows,
            appointments,
        }
    }

    /// Bookable start times for a service of the given duration.
    ///
    /// An empty result is the normal fully-booked / nothing-configured
    /// case, not an error. The date is treated as a plain calendar date
    /// end to end.
    pub async fn available_start_times(
        &self,
        tenant_id: Uuid,
        professional_id: Uuid,
        date: NaiveDate,
        service_duration_minutes: u32,
    ) -> AgendouResult<Vec<NaiveTime>> {
        let windows = self
            .windows
            .list_for_date(tenant_id, professional_id, date)
            .await?;
        if windows.iter().all(|w| !w.available) {
            return Ok(Vec::new());
        }

        let appointments = self
            .appointments
            .list_active_for_date(tenant_id, professional_id, date)
            .await?;

        // Each booking blocks its own service's duration, which can
        // differ from the duration being searched for.
        let mut durations: HashMap<Uuid, u32> = HashMap::new();
        for appointment in &appointments {
            if !durations.contains_key(&appointment.service_id) {
                let service = self
                    .services
                    .get_by_id(tenant_id, appointment.service_id)
                    .await?;
                durations.insert(service.id, service.duration_minutes);
            }
        }

        let busy: Vec<BusyInterval> = appointments
            .iter()
            .map(|a| BusyInterval {
                start_minute: a.start_minute(),
                duration_minutes: durations.get(&a.service_id).copied().unwrap_or(0),
            })
            .collect();

        let starts = eligible_starts(&windows, &busy, service_duration_minutes);
        Ok(starts
            .into_iter()
            .filter_map(|m| NaiveTime::from_hms_opt(u32::from(m) / 60, u32::from(m) % 60, 0))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn window(start_minute: u16, end_minute: u16, available: bool) -> AvailabilityWindow {
        AvailabilityWindow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            professional_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            start_minute,
            end_minute,
            available,
            created_at: Utc::now(),
        }
    }

    fn busy(start_minute: u16, duration_minutes: u32) -> BusyInterval {
        BusyInterval {
            start_minute,
            duration_minutes,
        }
    }

    #[test]
    fn empty_day_yields_half_hour_grid() {
        // 09:00-12:00 window, 30-minute service: last valid start is
        // 11:30 (11:30 + 30 = 12:00).
        let starts = eligible_starts(&[window(540, 720, true)], &[], 30);
        assert_eq!(starts, vec![540, 570, 600, 630, 660, 690]);
    }

    #[test]
    fn no_windows_means_no_slots() {
        assert!(eligible_starts(&[], &[], 30).is_empty());
    }

    #[test]
    fn unavailable_windows_are_skipped() {
        assert!(eligible_starts(&[window(540, 720, false)], &[], 30).is_empty());
    }

    #[test]
    fn window_shorter_than_service_yields_nothing() {
        assert!(eligible_starts(&[window(540, 560, true)], &[], 30).is_empty());
    }

    #[test]
    fn booking_blocks_its_own_slot() {
        let starts = eligible_starts(&[window(540, 720, true)], &[busy(600, 30)], 30);
        assert_eq!(starts, vec![540, 570, 630, 660, 690]);
    }

    #[test]
    fn long_booking_blocks_every_overlapping_candidate() {
        // A 60-minute booking at 10:00 shadows both the 10:00 and 10:30
        // starts of a 30-minute service.
        let starts = eligible_starts(&[window(540, 720, true)], &[busy(600, 60)], 30);
        assert_eq!(starts, vec![540, 570, 660, 690]);
    }

    #[test]
    fn overlapping_windows_deduplicate() {
        let starts = eligible_starts(&[window(540, 660, true), window(540, 720, true)], &[], 60);
        assert_eq!(starts, vec![540, 600, 660]);
    }

    #[test]
    fn zero_duration_produces_no_grid() {
        assert!(eligible_starts(&[window(540, 720, true)], &[], 0).is_empty());
    }

    #[test]
    fn no_returned_start_overlaps_a_booking() {
        let windows = [window(480, 1080, true)];
        let bookings = [busy(540, 45), busy(700, 90), busy(1000, 15)];
        for duration in [15u32, 30, 45, 60] {
            for start in eligible_starts(&windows, &bookings, duration) {
                let end = u32::from(start) + duration;
                assert!(
                    !bookings.iter().any(|b| b.overlaps(u32::from(start), end)),
                    "start {start} (duration {duration}) overlaps a booking"
                );
            }
        }
    }
}
