//! # Appointment Validator
//!
//! The single server-trusted choke point for booking rules. Client-side
//! checks are advisory duplicates at best; every create, and every update
//! that changes staff or times, goes through [`validate`].
//!
//! Checks run in a fixed order and the first failure wins, so cheap,
//! user-fixable errors (duration, working hours) surface before the conflict
//! scan. Validation is pure and idempotent: identical inputs always produce
//! identical results, and the candidate is never mutated.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::errors::ValidationError;
use crate::models::appointment::{Appointment, CandidateAppointment};
use crate::models::business::BusinessSettings;
use crate::models::service::Service;
use crate::models::staff::StaffMember;
use crate::scheduling::{availability, conflict};

/// Everything the validator needs, threaded explicitly — no ambient lookup.
///
/// `existing` holds the staff member's other appointments for the affected
/// day; the persistence layer is responsible for reading it atomically with
/// the subsequent write (advisory lock per staff member).
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub staff: &'a StaffMember,
    pub service: &'a Service,
    pub settings: &'a BusinessSettings,
    pub timezone: Tz,
    pub existing: &'a [Appointment],
    pub now: DateTime<Utc>,
}

/// Accepts or rejects a candidate appointment against the business rules.
///
/// On success the candidate is valid as-is; persistence stays with the
/// caller.
pub fn validate(
    candidate: &CandidateAppointment,
    ctx: &ValidationContext<'_>,
) -> Result<(), ValidationError> {
    check_duration(candidate, ctx.service)?;
    check_service_offered(candidate, ctx.staff)?;
    check_working_hours(candidate, ctx)?;
    check_notice(candidate, ctx)?;
    check_booking_window(candidate, ctx)?;
    check_conflicts(candidate, ctx)?;
    Ok(())
}

fn check_duration(
    candidate: &CandidateAppointment,
    service: &Service,
) -> Result<(), ValidationError> {
    let actual_minutes = candidate.duration_minutes();
    let invalid = if candidate.custom_duration {
        candidate.end_time <= candidate.start_time
    } else {
        candidate.end_time <= candidate.start_time || actual_minutes != service.duration_minutes
    };

    if invalid {
        return Err(ValidationError::InvalidDuration {
            actual_minutes,
            expected_minutes: service.duration_minutes,
        });
    }
    Ok(())
}

fn check_service_offered(
    candidate: &CandidateAppointment,
    staff: &StaffMember,
) -> Result<(), ValidationError> {
    if !staff.offers_service(candidate.service_id) {
        return Err(ValidationError::ServiceNotOffered {
            service_id: candidate.service_id,
        });
    }
    Ok(())
}

/// The candidate must be fully contained in the enabled working window for
/// the start's business-local weekday. Existing bookings do not count here;
/// overlap with them is the conflict check's job, so a taken slot inside
/// working hours reports `Conflict`, not `OutsideWorkingHours`.
fn check_working_hours(
    candidate: &CandidateAppointment,
    ctx: &ValidationContext<'_>,
) -> Result<(), ValidationError> {
    let local_date = candidate
        .start_time
        .with_timezone(&ctx.timezone)
        .date_naive();

    let window = availability::working_window(&ctx.staff.working_hours, local_date, ctx.timezone);
    match window {
        Some((window_start, window_end))
            if candidate.start_time >= window_start && candidate.end_time <= window_end =>
        {
            Ok(())
        }
        _ => Err(ValidationError::OutsideWorkingHours),
    }
}

fn check_notice(
    candidate: &CandidateAppointment,
    ctx: &ValidationContext<'_>,
) -> Result<(), ValidationError> {
    let min_notice_hours = ctx.settings.min_notice_hours;
    if ctx.now + Duration::hours(min_notice_hours) > candidate.start_time {
        return Err(ValidationError::InsufficientNotice { min_notice_hours });
    }
    Ok(())
}

fn check_booking_window(
    candidate: &CandidateAppointment,
    ctx: &ValidationContext<'_>,
) -> Result<(), ValidationError> {
    let booking_window_days = ctx.settings.booking_window_days;
    if candidate.start_time > ctx.now + Duration::days(booking_window_days) {
        return Err(ValidationError::BeyondBookingWindow {
            booking_window_days,
        });
    }
    Ok(())
}

fn check_conflicts(
    candidate: &CandidateAppointment,
    ctx: &ValidationContext<'_>,
) -> Result<(), ValidationError> {
    // When an existing appointment is being moved, its prior record is not a
    // conflict with itself.
    let conflicting = match candidate.exclude_appointment_id {
        Some(own_id) => {
            let others: Vec<Appointment> = ctx
                .existing
                .iter()
                .filter(|appt| appt.id != own_id)
                .cloned()
                .collect();
            conflict::find_conflict(candidate, &others, ctx.settings.buffer_minutes)
                .map(|appt| appt.id)
        }
        None => conflict::find_conflict(candidate, ctx.existing, ctx.settings.buffer_minutes)
            .map(|appt| appt.id),
    };

    match conflicting {
        Some(conflicting_appointment_id) => Err(ValidationError::Conflict {
            conflicting_appointment_id,
        }),
        None => Ok(()),
    }
}
