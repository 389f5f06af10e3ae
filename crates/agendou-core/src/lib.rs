//! Agendou Core — domain models, repository traits, and shared types.
//!
//! This crate holds everything the other layers agree on: the entities of
//! the scheduling domain, the async repository traits that abstract the
//! persistence layer, the error taxonomy, the injected clock, and the pure
//! tenant status gate predicate.

pub mod clock;
pub mod error;
pub mod gate;
pub mod models;
pub mod repository;
