//! # Appointment Handlers
//!
//! The booking flow and dashboard lifecycle actions. Handlers assemble the
//! validation context from the persistence layer, delegate every rule to the
//! scheduling core, and invoke the notification collaborator with the side
//! effects an accepted transition authorizes.
//!
//! The create and reschedule paths go through
//! `bookwise_db::repositories::appointment`, which serializes writes per
//! staff member; handlers never insert an appointment directly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bookwise_core::{
    errors::BookingError,
    models::appointment::{
        Appointment, AppointmentStatus, CandidateAppointment, CreateAppointmentRequest,
        TransitionRequest, UpdateAppointmentRequest,
    },
    models::business::Business,
    models::notification::{Notification, NotificationKind},
    models::service::Service,
    models::staff::StaffMember,
    scheduling::state_machine::{self, TransitionEffect},
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Staff, service, and business context for one candidate, loaded fresh per
/// request — never from ambient state.
struct BookingContext {
    business: Business,
    staff: StaffMember,
    service: Service,
}

async fn load_booking_context(
    state: &ApiState,
    business_id: Uuid,
    staff_id: Uuid,
    service_id: Uuid,
) -> Result<BookingContext, AppError> {
    let business: Business =
        bookwise_db::repositories::business::get_business_by_id(&state.db_pool, business_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Business with ID {} not found", business_id))
            })?
            .into();

    let staff: StaffMember =
        bookwise_db::repositories::staff::get_staff_member_by_id(&state.db_pool, staff_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Staff member with ID {} not found", staff_id))
            })?
            .into();

    let service: Service =
        bookwise_db::repositories::service::get_service_by_id(&state.db_pool, service_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Service with ID {} not found", service_id))
            })?
            .into();

    if staff.business_id != business.id || service.business_id != business.id {
        return Err(AppError(BookingError::BadRequest(
            "staff member and service must belong to the business".to_string(),
        )));
    }

    Ok(BookingContext {
        business,
        staff,
        service,
    })
}

fn appointment_summary(ctx: &BookingContext, appointment: &Appointment) -> String {
    format!(
        "{} with {} at {}",
        ctx.service.name,
        ctx.staff.name,
        appointment.start_time.to_rfc3339()
    )
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let appointment =
        bookwise_db::repositories::appointment::get_appointment_by_id(&state.db_pool, id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Appointment with ID {} not found", id))
            })?
            .into_appointment()?;

    Ok(Json(appointment))
}

/// Books a new appointment.
///
/// The end time defaults to the service duration when omitted. Appointments
/// booked by staff start out `confirmed`; client bookings start `scheduled`.
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let ctx = load_booking_context(
        &state,
        payload.business_id,
        payload.staff_id,
        payload.service_id,
    )
    .await?;

    if !ctx.service.is_active {
        return Err(AppError(BookingError::BadRequest(format!(
            "service '{}' is no longer offered",
            ctx.service.name
        ))));
    }

    let end_time = payload.end_time.unwrap_or_else(|| {
        payload.start_time + Duration::minutes(ctx.service.duration_minutes)
    });

    let candidate = CandidateAppointment {
        staff_id: payload.staff_id,
        service_id: payload.service_id,
        client_id: payload.client_id,
        start_time: payload.start_time,
        end_time,
        custom_duration: payload.custom_duration,
        exclude_appointment_id: None,
    };

    let initial_status = if payload.booked_by_staff {
        AppointmentStatus::Confirmed
    } else {
        AppointmentStatus::Scheduled
    };

    let appointment = bookwise_db::repositories::appointment::book_appointment(
        &state.db_pool,
        &ctx.business,
        &ctx.staff,
        &ctx.service,
        &candidate,
        initial_status,
        payload.notes.as_deref(),
    )
    .await
    .map_err(AppError)?
    .into_appointment()?;

    let summary = appointment_summary(&ctx, &appointment);
    if let Some(client_email) = &payload.client_email {
        state
            .notifier
            .notify(&Notification {
                to: client_email.clone(),
                subject: "Your appointment is booked".to_string(),
                appointment_summary: summary.clone(),
                kind: NotificationKind::Creation,
            })
            .await;
    }
    state
        .notifier
        .notify(&Notification {
            to: ctx.staff.email.clone(),
            subject: "New booking".to_string(),
            appointment_summary: summary,
            kind: NotificationKind::Staff,
        })
        .await;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Updates an appointment. Any change to staff or times re-runs the full
/// validator against the target staff member's calendar; a notes-only update
/// skips validation entirely.
#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let current =
        bookwise_db::repositories::appointment::get_appointment_by_id(&state.db_pool, id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Appointment with ID {} not found", id))
            })?
            .into_appointment()?;

    let mut updated = current.clone();

    if payload.reschedules() {
        if current.status.is_terminal() {
            return Err(AppError(BookingError::BadRequest(format!(
                "cannot reschedule a {} appointment",
                current.status
            ))));
        }

        let staff_id = payload.staff_id.unwrap_or(current.staff_id);
        let start_time = payload.start_time.unwrap_or(current.start_time);
        // Moving only the start preserves the booked length.
        let end_time = payload
            .end_time
            .unwrap_or(start_time + (current.end_time - current.start_time));

        let ctx =
            load_booking_context(&state, current.business_id, staff_id, current.service_id)
                .await?;

        // The original may already carry a non-standard length; an explicit
        // new end is an explicit choice. Either way duration equality with
        // the service is not re-imposed.
        let booked_minutes = (current.end_time - current.start_time).num_minutes();
        let custom_duration =
            payload.end_time.is_some() || booked_minutes != ctx.service.duration_minutes;

        let candidate = CandidateAppointment {
            staff_id,
            service_id: current.service_id,
            client_id: current.client_id,
            start_time,
            end_time,
            custom_duration,
            exclude_appointment_id: Some(id),
        };

        updated = bookwise_db::repositories::appointment::reschedule_appointment(
            &state.db_pool,
            &ctx.business,
            &ctx.staff,
            &ctx.service,
            id,
            &candidate,
        )
        .await
        .map_err(AppError)?
        .into_appointment()?;
    }

    if let Some(notes) = &payload.notes {
        updated = bookwise_db::repositories::appointment::update_notes(
            &state.db_pool,
            id,
            Some(notes.as_str()),
        )
        .await?
        .into_appointment()?;
    }

    Ok(Json(updated))
}

/// Applies a status transition through the state machine and runs the side
/// effects an accepted transition authorizes.
#[axum::debug_handler]
pub async fn transition_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionRequest>,
) -> Result<Json<Appointment>, AppError> {
    let current =
        bookwise_db::repositories::appointment::get_appointment_by_id(&state.db_pool, id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Appointment with ID {} not found", id))
            })?
            .into_appointment()?;

    let effects = state_machine::transition(&current, payload.status, Utc::now())
        .map_err(BookingError::Transition)?;

    // Gather everything the effects need before committing anything, so a
    // failed lookup cannot leave a persisted transition unreported.
    let ctx = load_booking_context(
        &state,
        current.business_id,
        current.staff_id,
        current.service_id,
    )
    .await?;

    // The write lands only if the status is still the one the state machine
    // saw; a concurrent transition in between surfaces as InvalidTransition.
    let updated = bookwise_db::repositories::appointment::update_status(
        &state.db_pool,
        id,
        current.status,
        payload.status,
    )
    .await
    .map_err(AppError)?
    .into_appointment()?;

    for effect in effects {
        match effect {
            TransitionEffect::SendCancellationNotice => {
                state
                    .notifier
                    .notify(&Notification {
                        to: ctx.staff.email.clone(),
                        subject: "Appointment cancelled".to_string(),
                        appointment_summary: appointment_summary(&ctx, &updated),
                        kind: NotificationKind::Cancellation,
                    })
                    .await;
            }
            TransitionEffect::ScheduleReminders => {
                debug!(appointment_id = %updated.id, "reminder scheduling delegated to notification service");
            }
            TransitionEffect::CancelReminders => {
                debug!(appointment_id = %updated.id, "pending reminders withdrawn");
            }
        }
    }

    Ok(Json(updated))
}
