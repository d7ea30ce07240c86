//! Appointment persistence, including the serialized booking write path.
//!
//! The scheduling core only defines the conflict check; this module makes the
//! check-then-write atomic. `book_appointment` and `reschedule_appointment`
//! take a transaction-scoped advisory lock keyed on the staff id, re-read the
//! staff member's appointments under that lock, run the validator, and only
//! then write. Two near-simultaneous bookings for the same staff member
//! therefore cannot both read "no conflict" before either insert commits.

use bookwise_core::errors::{BookingError, BookingResult, TransitionError};
use bookwise_core::models::appointment::{AppointmentStatus, CandidateAppointment};
use bookwise_core::models::business::Business;
use bookwise_core::models::service::Service;
use bookwise_core::models::staff::StaffMember;
use bookwise_core::scheduling::validate::{validate, ValidationContext};
use chrono::{Duration, Utc};
use eyre::Result;
use sqlx::{PgPool, Pool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::models::{into_appointments, DbAppointment};

const APPOINTMENT_COLUMNS: &str = "id, business_id, service_id, staff_id, client_id, \
     start_time, end_time, status, notes, reminders_sent, created_at";

/// Advisory-lock key for a staff member: the first eight bytes of the UUID.
fn staff_lock_key(staff_id: Uuid) -> i64 {
    let b = staff_id.into_bytes();
    i64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Appointments for one staff member overlapping `[from_millis, to_millis)`,
/// ordered by start. Cancelled appointments are excluded unless asked for.
pub async fn get_staff_appointments_in_range(
    pool: &Pool<Postgres>,
    staff_id: Uuid,
    from_millis: i64,
    to_millis: i64,
    include_cancelled: bool,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE staff_id = $1
          AND start_time < $3
          AND end_time > $2
          AND (status != 'cancelled' OR $4)
        ORDER BY start_time ASC
        "#
    ))
    .bind(staff_id)
    .bind(from_millis)
    .bind(to_millis)
    .bind(include_cancelled)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Validates and inserts a new appointment atomically with respect to other
/// writers targeting the same staff member.
pub async fn book_appointment(
    pool: &PgPool,
    business: &Business,
    staff: &StaffMember,
    service: &Service,
    candidate: &CandidateAppointment,
    initial_status: AppointmentStatus,
    notes: Option<&str>,
) -> BookingResult<DbAppointment> {
    let mut tx = pool.begin().await.map_err(eyre::Report::from)?;

    validate_under_lock(&mut tx, business, staff, service, candidate).await?;

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments
            (business_id, service_id, staff_id, client_id, start_time, end_time, status, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(business.id)
    .bind(candidate.service_id)
    .bind(candidate.staff_id)
    .bind(candidate.client_id)
    .bind(candidate.start_time.timestamp_millis())
    .bind(candidate.end_time.timestamp_millis())
    .bind(initial_status.as_str())
    .bind(notes)
    .bind(Utc::now().timestamp_millis())
    .fetch_one(&mut *tx)
    .await
    .map_err(eyre::Report::from)?;

    tx.commit().await.map_err(eyre::Report::from)?;

    debug!(appointment_id = %appointment.id, staff_id = %staff.id, "appointment booked");
    Ok(appointment)
}

/// Moves an existing appointment (times and/or staff), re-running the full
/// validator under the same per-staff lock as creation. The candidate must
/// carry `exclude_appointment_id` so the prior record is not treated as a
/// conflict with itself.
pub async fn reschedule_appointment(
    pool: &PgPool,
    business: &Business,
    staff: &StaffMember,
    service: &Service,
    appointment_id: Uuid,
    candidate: &CandidateAppointment,
) -> BookingResult<DbAppointment> {
    let mut tx = pool.begin().await.map_err(eyre::Report::from)?;

    validate_under_lock(&mut tx, business, staff, service, candidate).await?;

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET staff_id = $2, start_time = $3, end_time = $4
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(appointment_id)
    .bind(candidate.staff_id)
    .bind(candidate.start_time.timestamp_millis())
    .bind(candidate.end_time.timestamp_millis())
    .fetch_one(&mut *tx)
    .await
    .map_err(eyre::Report::from)?;

    tx.commit().await.map_err(eyre::Report::from)?;

    debug!(appointment_id = %appointment.id, staff_id = %staff.id, "appointment rescheduled");
    Ok(appointment)
}

/// Takes the per-staff advisory lock, re-reads the surrounding appointments,
/// and runs the scheduling-core validator inside the caller's transaction.
async fn validate_under_lock(
    tx: &mut Transaction<'_, Postgres>,
    business: &Business,
    staff: &StaffMember,
    service: &Service,
    candidate: &CandidateAppointment,
) -> BookingResult<()> {
    let timezone = business
        .tz()
        .map_err(|e| BookingError::Internal(e.into()))?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(staff_lock_key(candidate.staff_id))
        .execute(&mut **tx)
        .await
        .map_err(eyre::Report::from)?;

    // A day of slack on each side covers buffer expansion and timezone skew.
    let from_millis = (candidate.start_time - Duration::days(1)).timestamp_millis();
    let to_millis = (candidate.end_time + Duration::days(1)).timestamp_millis();

    let rows = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE staff_id = $1
          AND start_time < $3
          AND end_time > $2
          AND status != 'cancelled'
        ORDER BY start_time ASC
        "#
    ))
    .bind(candidate.staff_id)
    .bind(from_millis)
    .bind(to_millis)
    .fetch_all(&mut **tx)
    .await
    .map_err(eyre::Report::from)?;

    let existing = into_appointments(rows)?;

    let ctx = ValidationContext {
        staff,
        service,
        settings: &business.settings,
        timezone,
        existing: &existing,
        now: Utc::now(),
    };
    validate(candidate, &ctx)?;

    Ok(())
}

/// Status write guarded against stale reads: the update only lands while the
/// row still carries `from`, so a transition validated against a snapshot
/// cannot overwrite a status another request committed in between. A miss is
/// reported as an invalid transition from the row's actual status.
pub async fn update_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    from: AppointmentStatus,
    to: AppointmentStatus,
) -> BookingResult<DbAppointment> {
    let updated = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = $3
        WHERE id = $1 AND status = $2
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(from.as_str())
    .bind(to.as_str())
    .fetch_optional(pool)
    .await
    .map_err(eyre::Report::from)?;

    if let Some(appointment) = updated {
        return Ok(appointment);
    }

    let current = get_appointment_by_id(pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;
    let actual = current
        .status
        .parse::<AppointmentStatus>()
        .map_err(|e| BookingError::Database(eyre::eyre!(e)))?;

    Err(BookingError::Transition(
        TransitionError::InvalidTransition { from: actual, to },
    ))
}

pub async fn update_notes(
    pool: &Pool<Postgres>,
    id: Uuid,
    notes: Option<&str>,
) -> Result<DbAppointment> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET notes = $2
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(notes)
    .fetch_one(pool)
    .await?;

    Ok(appointment)
}

/// Appends a reminder label to the appointment's sent set. Returns `None`
/// when the label was already recorded, so repeated delivery attempts are
/// visible to the caller.
pub async fn record_reminder_sent(
    pool: &Pool<Postgres>,
    id: Uuid,
    reminder: &str,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET reminders_sent = array_append(reminders_sent, $2)
        WHERE id = $1 AND NOT ($2 = ANY(reminders_sent))
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(reminder)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}
