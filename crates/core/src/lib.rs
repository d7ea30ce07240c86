//! # Bookwise Core
//!
//! The scheduling core of the Bookwise appointment-booking service. Everything
//! in this crate is pure computation: availability resolution, conflict
//! detection, booking validation, and the appointment status state machine are
//! deterministic transforms of their inputs with no I/O, no logging, and no
//! shared state. Persistence and notification are collaborators owned by the
//! `bookwise-db` and `bookwise-api` crates.

pub mod errors;
pub mod models;
pub mod scheduling;
