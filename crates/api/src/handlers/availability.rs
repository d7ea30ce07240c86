//! # Availability Handlers
//!
//! Serves the public booking page's slot picker: for one staff member and one
//! business-local calendar day, returns the free windows computed by the
//! scheduling core from working hours and existing bookings.
//!
//! The handler only gathers context (staff, business, that day's
//! appointments) and shapes the response; the interval arithmetic lives in
//! `bookwise_core::scheduling::availability`.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use bookwise_core::{
    errors::BookingError,
    models::appointment::{AvailabilityResponse, AvailabilitySlot},
    models::business::Business,
    models::staff::StaffMember,
    scheduling::availability,
};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the availability endpoint.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Business-local calendar day, `YYYY-MM-DD`.
    pub date: String,
}

/// Free slots for one staff member on one day.
///
/// # Endpoint
///
/// ```text
/// GET /api/staff/:id/availability?date=2025-06-02
/// ```
#[axum::debug_handler]
pub async fn get_staff_availability(
    State(state): State<Arc<ApiState>>,
    Path(staff_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d").map_err(|_| {
        BookingError::BadRequest(format!("invalid date '{}', expected YYYY-MM-DD", query.date))
    })?;

    let staff: StaffMember =
        bookwise_db::repositories::staff::get_staff_member_by_id(&state.db_pool, staff_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Staff member with ID {} not found", staff_id))
            })?
            .into();

    let business: Business =
        bookwise_db::repositories::business::get_business_by_id(&state.db_pool, staff.business_id)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "Business with ID {} not found",
                    staff.business_id
                ))
            })?
            .into();

    let tz = business.tz().map_err(BookingError::Database)?;

    // The day's appointments, bounded by local midnights resolved to instants.
    let day_start = availability::local_instant(date, NaiveTime::MIN, tz);
    let day_end = date
        .succ_opt()
        .and_then(|next| availability::local_instant(next, NaiveTime::MIN, tz));
    let (Some(day_start), Some(day_end)) = (day_start, day_end) else {
        return Err(AppError(BookingError::BadRequest(format!(
            "date '{}' is not representable in timezone {}",
            query.date, business.timezone
        ))));
    };

    let rows = bookwise_db::repositories::appointment::get_staff_appointments_in_range(
        &state.db_pool,
        staff_id,
        day_start.timestamp_millis(),
        day_end.timestamp_millis(),
        false,
    )
    .await?;
    let existing = bookwise_db::models::into_appointments(rows)?;

    let slots: Vec<AvailabilitySlot> = availability::free_intervals(
        &staff.working_hours,
        date,
        tz,
        &existing,
        business.settings.buffer_minutes,
    )
    .into_iter()
    .map(|(start, end)| AvailabilitySlot { start, end })
    .collect();

    Ok(Json(AvailabilityResponse {
        staff_id,
        date: query.date,
        slots,
    }))
}
