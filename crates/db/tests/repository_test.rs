//! Repository tests against a real Postgres instance.
//!
//! These run only when `TEST_DATABASE_URL` is set; without it every test
//! skips. The booking tests cover the serialized write path end to end:
//! schema bootstrap, a successful booking, the double-booking rejection, and
//! the reminder dedup guard.

use bookwise_core::errors::{BookingError, TransitionError, ValidationError};
use bookwise_core::models::appointment::{AppointmentStatus, CandidateAppointment};
use bookwise_core::models::business::{Business, BusinessSettings};
use bookwise_core::models::service::Service;
use bookwise_core::models::staff::{DayHours, StaffMember, WorkingHours};
use bookwise_db::repositories::{appointment, business, service, staff};
use bookwise_db::{create_pool, schema::initialize_database, DbPool};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use pretty_assertions::assert_eq;
use uuid::Uuid;

async fn test_pool() -> Option<DbPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping repository test");
            return None;
        }
    };
    let pool = create_pool(&url).await.unwrap();
    initialize_database(&pool).await.unwrap();
    Some(pool)
}

fn all_day_hours() -> WorkingHours {
    let day = DayHours::new(
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(23, 59, 59).unwrap(),
    );
    WorkingHours {
        monday: Some(day),
        tuesday: Some(day),
        wednesday: Some(day),
        thursday: Some(day),
        friday: Some(day),
        saturday: Some(day),
        sunday: Some(day),
    }
}

/// Midday two days out: inside any notice/window policy used below and never
/// near a midnight boundary.
fn slot_start() -> DateTime<Utc> {
    (Utc::now() + Duration::days(2))
        .date_naive()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
}

struct Fixture {
    business: Business,
    staff: StaffMember,
    service: Service,
}

async fn seed(pool: &DbPool) -> Fixture {
    let business: Business = business::create_business(
        pool,
        "Shear Genius",
        "UTC",
        &BusinessSettings {
            booking_window_days: 30,
            min_notice_hours: 2,
            buffer_minutes: 0,
        },
    )
    .await
    .unwrap()
    .into();

    let service: Service = service::create_service(pool, business.id, "Haircut", 30, 3000, "#336699")
        .await
        .unwrap()
        .into();

    let staff: StaffMember = staff::create_staff_member(
        pool,
        business.id,
        Uuid::new_v4(),
        "Sam",
        "sam@shear-genius.test",
        &[service.id],
        &all_day_hours(),
    )
    .await
    .unwrap()
    .into();

    Fixture {
        business,
        staff,
        service,
    }
}

fn candidate(fx: &Fixture, start: DateTime<Utc>) -> CandidateAppointment {
    CandidateAppointment {
        staff_id: fx.staff.id,
        service_id: fx.service.id,
        client_id: Uuid::new_v4(),
        start_time: start,
        end_time: start + Duration::minutes(30),
        custom_duration: false,
        exclude_appointment_id: None,
    }
}

#[tokio::test]
async fn booking_round_trip_and_double_booking_rejection() {
    let Some(pool) = test_pool().await else { return };
    let fx = seed(&pool).await;
    let start = slot_start();

    let booked = appointment::book_appointment(
        &pool,
        &fx.business,
        &fx.staff,
        &fx.service,
        &candidate(&fx, start),
        AppointmentStatus::Scheduled,
        Some("first visit"),
    )
    .await
    .unwrap();

    assert_eq!(booked.status, "scheduled");
    assert_eq!(booked.start_time, start.timestamp_millis());
    assert_eq!(booked.notes.as_deref(), Some("first visit"));

    // The same slot again must be rejected and must name the winner.
    let err = appointment::book_appointment(
        &pool,
        &fx.business,
        &fx.staff,
        &fx.service,
        &candidate(&fx, start + Duration::minutes(10)),
        AppointmentStatus::Scheduled,
        None,
    )
    .await
    .unwrap_err();

    match err {
        BookingError::Validation(ValidationError::Conflict {
            conflicting_appointment_id,
        }) => assert_eq!(conflicting_appointment_id, booked.id),
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn reschedule_excludes_the_moved_appointment_from_conflicts() {
    let Some(pool) = test_pool().await else { return };
    let fx = seed(&pool).await;
    let start = slot_start();

    let booked = appointment::book_appointment(
        &pool,
        &fx.business,
        &fx.staff,
        &fx.service,
        &candidate(&fx, start),
        AppointmentStatus::Confirmed,
        None,
    )
    .await
    .unwrap();

    // Nudge by ten minutes: overlaps the prior slot, which must not count
    // against itself.
    let mut moved = candidate(&fx, start + Duration::minutes(10));
    moved.exclude_appointment_id = Some(booked.id);

    let rescheduled = appointment::reschedule_appointment(
        &pool,
        &fx.business,
        &fx.staff,
        &fx.service,
        booked.id,
        &moved,
    )
    .await
    .unwrap();

    assert_eq!(rescheduled.id, booked.id);
    assert_eq!(
        rescheduled.start_time,
        (start + Duration::minutes(10)).timestamp_millis()
    );
}

#[tokio::test]
async fn stale_transition_cannot_overwrite_a_newer_status() {
    let Some(pool) = test_pool().await else { return };
    let fx = seed(&pool).await;

    let booked = appointment::book_appointment(
        &pool,
        &fx.business,
        &fx.staff,
        &fx.service,
        &candidate(&fx, slot_start()),
        AppointmentStatus::Scheduled,
        None,
    )
    .await
    .unwrap();

    appointment::update_status(
        &pool,
        booked.id,
        AppointmentStatus::Scheduled,
        AppointmentStatus::Cancelled,
    )
    .await
    .unwrap();

    // A second request that read the row before the cancellation committed:
    // its write must miss instead of resurrecting the appointment.
    let err = appointment::update_status(
        &pool,
        booked.id,
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
    )
    .await
    .unwrap_err();

    match err {
        BookingError::Transition(TransitionError::InvalidTransition { from, to }) => {
            assert_eq!(from, AppointmentStatus::Cancelled);
            assert_eq!(to, AppointmentStatus::Confirmed);
        }
        other => panic!("expected an invalid transition, got {other:?}"),
    }

    let row = appointment::get_appointment_by_id(&pool, booked.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, "cancelled");
}

#[tokio::test]
async fn reminder_recording_is_deduplicated() {
    let Some(pool) = test_pool().await else { return };
    let fx = seed(&pool).await;

    let booked = appointment::book_appointment(
        &pool,
        &fx.business,
        &fx.staff,
        &fx.service,
        &candidate(&fx, slot_start()),
        AppointmentStatus::Confirmed,
        None,
    )
    .await
    .unwrap();

    let first = appointment::record_reminder_sent(&pool, booked.id, "24h")
        .await
        .unwrap();
    assert_eq!(first.unwrap().reminders_sent, vec!["24h".to_string()]);

    let second = appointment::record_reminder_sent(&pool, booked.id, "24h")
        .await
        .unwrap();
    assert!(second.is_none());
}

#[tokio::test]
async fn cancelled_appointments_free_their_slot() {
    let Some(pool) = test_pool().await else { return };
    let fx = seed(&pool).await;
    let start = slot_start();

    let booked = appointment::book_appointment(
        &pool,
        &fx.business,
        &fx.staff,
        &fx.service,
        &candidate(&fx, start),
        AppointmentStatus::Scheduled,
        None,
    )
    .await
    .unwrap();

    appointment::update_status(
        &pool,
        booked.id,
        AppointmentStatus::Scheduled,
        AppointmentStatus::Cancelled,
    )
    .await
    .unwrap();

    appointment::book_appointment(
        &pool,
        &fx.business,
        &fx.staff,
        &fx.service,
        &candidate(&fx, start),
        AppointmentStatus::Scheduled,
        None,
    )
    .await
    .unwrap();
}
