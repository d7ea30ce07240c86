//! # Appointment State Machine
//!
//! Governs status changes after creation. The initial status (`scheduled`,
//! or `confirmed` when booked by staff directly) is a creation-time choice,
//! not a transition.
//!
//! Legal transitions:
//!
//! | From      | To        | Gate                 |
//! |-----------|-----------|----------------------|
//! | scheduled | confirmed |                      |
//! | scheduled | cancelled |                      |
//! | scheduled | no_show   | `start_time <= now`  |
//! | confirmed | completed | `end_time <= now`    |
//! | confirmed | cancelled |                      |
//! | confirmed | no_show   | `start_time <= now`  |
//!
//! `completed`, `cancelled`, and `no_show` are terminal: no outbound
//! transitions at all. An accepted transition returns the side effects the
//! caller is now authorized to run; the machine itself runs none of them.

use chrono::{DateTime, Utc};

use crate::errors::TransitionError;
use crate::models::appointment::{Appointment, AppointmentStatus};

/// Side effects a transition authorizes. Execution (cancelling queued
/// reminders, invoking the notification collaborator) belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Entering a confirmed state: reminders for this appointment may be
    /// scheduled.
    ScheduleReminders,
    /// Entering `cancelled`: any pending reminder must be withdrawn.
    CancelReminders,
    /// Entering `cancelled`: the client should be told.
    SendCancellationNotice,
}

/// Structurally legal destination states, ignoring time gates.
pub fn valid_transitions(from: AppointmentStatus) -> &'static [AppointmentStatus] {
    match from {
        AppointmentStatus::Scheduled => &[
            AppointmentStatus::Confirmed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ],
        AppointmentStatus::Confirmed => &[
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ],
        AppointmentStatus::Completed
        | AppointmentStatus::Cancelled
        | AppointmentStatus::NoShow => &[],
    }
}

/// Checks a requested status change against the transition table and its
/// time gates, returning the authorized side effects on success.
pub fn transition(
    appointment: &Appointment,
    to: AppointmentStatus,
    now: DateTime<Utc>,
) -> Result<Vec<TransitionEffect>, TransitionError> {
    let from = appointment.status;

    let rejected = TransitionError::InvalidTransition { from, to };

    if !valid_transitions(from).contains(&to) {
        return Err(rejected);
    }

    // Time gates: an appointment cannot be completed before it ends, nor
    // marked a no-show before it was due to start.
    match to {
        AppointmentStatus::Completed if appointment.end_time > now => return Err(rejected),
        AppointmentStatus::NoShow if appointment.start_time > now => return Err(rejected),
        _ => {}
    }

    let effects = match to {
        AppointmentStatus::Confirmed => vec![TransitionEffect::ScheduleReminders],
        AppointmentStatus::Cancelled => vec![
            TransitionEffect::CancelReminders,
            TransitionEffect::SendCancellationNotice,
        ],
        _ => Vec::new(),
    };

    Ok(effects)
}
