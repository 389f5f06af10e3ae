//! Agendou Booking — slot availability, appointment lifecycle, and
//! revenue aggregation.
//!
//! Services here are generic over the repository traits in
//! `agendou-core` and the injected clock, so all booking rules are
//! testable against the in-memory database engine.

pub mod appointment;
pub mod availability;
pub mod error;
pub mod revenue;

pub use appointment::BookingService;
pub use availability::AvailabilityChecker;
pub use error::BookingError;
pub use revenue::{Period, RevenueService, RevenueSummary};
