//! # Conflict Detector
//!
//! Strict-overlap test between a candidate interval and a staff member's
//! existing appointments. Two closed-open intervals conflict iff
//! `candidate.start < existing.end && existing.start < candidate.end`, so
//! touching endpoints alone never conflict.
//!
//! The buffer is applied asymmetrically: each existing appointment's end is
//! extended by `buffer_minutes` (staff need idle time *after* a session, not
//! before). A candidate ending exactly at an existing appointment's start is
//! therefore fine; one starting exactly at its end is not until the buffer
//! has passed.
//!
//! Callers editing an existing appointment must drop its own prior record
//! from `existing` first; the validator does this via
//! `CandidateAppointment::exclude_appointment_id`.

use chrono::Duration;

use crate::models::appointment::{Appointment, AppointmentStatus, CandidateAppointment};

/// The first existing appointment the candidate collides with, if any.
/// Appointments for other staff members and cancelled ones never conflict.
pub fn find_conflict<'a>(
    candidate: &CandidateAppointment,
    existing: &'a [Appointment],
    buffer_minutes: i64,
) -> Option<&'a Appointment> {
    let buffer = Duration::minutes(buffer_minutes);

    existing.iter().find(|appt| {
        appt.staff_id == candidate.staff_id
            && appt.status != AppointmentStatus::Cancelled
            && candidate.start_time < appt.end_time + buffer
            && appt.start_time < candidate.end_time
    })
}

/// Boolean form of [`find_conflict`]. Never errors; the caller decides what
/// a conflict means.
pub fn has_conflict(
    candidate: &CandidateAppointment,
    existing: &[Appointment],
    buffer_minutes: i64,
) -> bool {
    find_conflict(candidate, existing, buffer_minutes).is_some()
}
