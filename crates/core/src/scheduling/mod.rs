//! Pure scheduling logic: availability resolution, conflict detection,
//! booking validation, and the appointment status state machine.
//!
//! Callers are responsible for serializing writes per staff member so that
//! the conflict check and the subsequent persistence write are atomic with
//! respect to other writers (see `bookwise-db::repositories::appointment`).

pub mod availability;
pub mod conflict;
pub mod state_machine;
pub mod validate;
