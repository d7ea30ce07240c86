//! Handler-logic tests against mock repositories: the fetch → state machine →
//! persist sequence the transition handler runs, without a database.

use bookwise_core::errors::{BookingError, TransitionError, ValidationError};
use bookwise_core::models::appointment::{Appointment, AppointmentStatus, CandidateAppointment};
use bookwise_core::scheduling::state_machine::{self, TransitionEffect};
use bookwise_db::mock::repositories::MockAppointmentRepo;
use bookwise_db::models::DbAppointment;
use chrono::{Duration, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn db_row(status: &str, start_offset_hours: i64, duration_minutes: i64) -> DbAppointment {
    let start = Utc::now() + Duration::hours(start_offset_hours);
    DbAppointment {
        id: Uuid::new_v4(),
        business_id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        staff_id: Uuid::new_v4(),
        client_id: Uuid::new_v4(),
        start_time: start.timestamp_millis(),
        end_time: (start + Duration::minutes(duration_minutes)).timestamp_millis(),
        status: status.to_string(),
        notes: None,
        reminders_sent: vec![],
        created_at: Utc::now().timestamp_millis(),
    }
}

/// The transition handler's decision sequence: load, run the state machine,
/// persist only when the machine accepts.
async fn apply_transition(
    repo: &MockAppointmentRepo,
    id: Uuid,
    to: AppointmentStatus,
) -> Result<(Appointment, Vec<TransitionEffect>), BookingError> {
    let current = repo
        .get_appointment_by_id(id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?
        .into_appointment()?;

    let effects = state_machine::transition(&current, to, Utc::now())
        .map_err(BookingError::Transition)?;

    let updated = repo
        .update_status(id, current.status, to)
        .await?
        .into_appointment()?;
    Ok((updated, effects))
}

#[tokio::test]
async fn confirming_a_scheduled_appointment_authorizes_reminders() {
    let mut repo = MockAppointmentRepo::new();
    let row = db_row("scheduled", 24, 30);
    let id = row.id;

    let fetched = row.clone();
    repo.expect_get_appointment_by_id()
        .with(predicate::eq(id))
        .returning(move |_| Ok(Some(fetched.clone())));

    let mut confirmed = row.clone();
    confirmed.status = "confirmed".to_string();
    repo.expect_update_status()
        .with(
            predicate::eq(id),
            predicate::eq(AppointmentStatus::Scheduled),
            predicate::eq(AppointmentStatus::Confirmed),
        )
        .returning(move |_, _, _| Ok(confirmed.clone()));

    let (updated, effects) = apply_transition(&repo, id, AppointmentStatus::Confirmed)
        .await
        .unwrap();

    assert_eq!(updated.status, AppointmentStatus::Confirmed);
    assert_eq!(effects, vec![TransitionEffect::ScheduleReminders]);
}

#[tokio::test]
async fn cancelling_authorizes_reminder_withdrawal_and_notice() {
    let mut repo = MockAppointmentRepo::new();
    let row = db_row("confirmed", 24, 30);
    let id = row.id;

    let fetched = row.clone();
    repo.expect_get_appointment_by_id()
        .returning(move |_| Ok(Some(fetched.clone())));

    let mut cancelled = row.clone();
    cancelled.status = "cancelled".to_string();
    repo.expect_update_status()
        .returning(move |_, _, _| Ok(cancelled.clone()));

    let (updated, effects) = apply_transition(&repo, id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    assert_eq!(updated.status, AppointmentStatus::Cancelled);
    assert_eq!(
        effects,
        vec![
            TransitionEffect::CancelReminders,
            TransitionEffect::SendCancellationNotice,
        ]
    );
}

#[tokio::test]
async fn premature_completion_never_touches_the_repository() {
    let mut repo = MockAppointmentRepo::new();
    // Starts in an hour, so completion is gated out.
    let row = db_row("confirmed", 1, 30);
    let id = row.id;

    let fetched = row.clone();
    repo.expect_get_appointment_by_id()
        .returning(move |_| Ok(Some(fetched.clone())));
    // No update_status expectation: persisting here would fail the test.

    let err = apply_transition(&repo, id, AppointmentStatus::Completed)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::Transition(TransitionError::InvalidTransition {
            from: AppointmentStatus::Confirmed,
            to: AppointmentStatus::Completed,
        })
    ));
}

#[tokio::test]
async fn stale_status_write_surfaces_the_newer_status() {
    let mut repo = MockAppointmentRepo::new();
    let row = db_row("scheduled", 24, 30);
    let id = row.id;

    let fetched = row.clone();
    repo.expect_get_appointment_by_id()
        .returning(move |_| Ok(Some(fetched.clone())));

    // Another request cancelled the appointment between this handler's read
    // and its write; the guarded update reports the row's actual status.
    repo.expect_update_status().returning(|_, _, to| {
        Err(BookingError::Transition(TransitionError::InvalidTransition {
            from: AppointmentStatus::Cancelled,
            to,
        }))
    });

    let err = apply_transition(&repo, id, AppointmentStatus::Confirmed)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BookingError::Transition(TransitionError::InvalidTransition {
            from: AppointmentStatus::Cancelled,
            to: AppointmentStatus::Confirmed,
        })
    ));
}

#[tokio::test]
async fn missing_appointment_reports_not_found() {
    let mut repo = MockAppointmentRepo::new();
    repo.expect_get_appointment_by_id().returning(|_| Ok(None));

    let err = apply_transition(&repo, Uuid::new_v4(), AppointmentStatus::Confirmed)
        .await
        .unwrap_err();

    assert!(matches!(err, BookingError::NotFound(_)));
}

#[tokio::test]
async fn booking_surfaces_the_conflicting_appointment() {
    let mut repo = MockAppointmentRepo::new();
    let conflicting = Uuid::new_v4();

    repo.expect_book_appointment().returning(move |_, _, _, _, _, _| {
        Err(BookingError::Validation(ValidationError::Conflict {
            conflicting_appointment_id: conflicting,
        }))
    });

    let row = db_row("scheduled", 24, 30);
    let candidate = CandidateAppointment {
        staff_id: row.staff_id,
        service_id: row.service_id,
        client_id: row.client_id,
        start_time: Utc::now() + Duration::hours(24),
        end_time: Utc::now() + Duration::hours(24) + Duration::minutes(30),
        custom_duration: false,
        exclude_appointment_id: None,
    };

    let err = repo
        .book_appointment(
            bookwise_db::models::DbBusiness {
                id: row.business_id,
                name: "Shear Genius".to_string(),
                timezone: "UTC".to_string(),
                booking_window_days: 30,
                min_notice_hours: 2,
                buffer_minutes: 0,
                created_at: Utc::now(),
            }
            .into(),
            stub_staff(row.staff_id, row.business_id, row.service_id),
            bookwise_db::models::DbService {
                id: row.service_id,
                business_id: row.business_id,
                name: "Haircut".to_string(),
                duration_minutes: 30,
                price_cents: 3000,
                color: "#336699".to_string(),
                is_active: true,
            }
            .into(),
            candidate,
            AppointmentStatus::Scheduled,
            None,
        )
        .await
        .unwrap_err();

    match err {
        BookingError::Validation(ValidationError::Conflict {
            conflicting_appointment_id,
        }) => assert_eq!(conflicting_appointment_id, conflicting),
        other => panic!("expected a conflict, got {other:?}"),
    }
}

fn stub_staff(
    id: Uuid,
    business_id: Uuid,
    service_id: Uuid,
) -> bookwise_core::models::staff::StaffMember {
    bookwise_core::models::staff::StaffMember {
        id,
        business_id,
        user_id: Uuid::new_v4(),
        name: "Sam".to_string(),
        email: "sam@shear-genius.test".to_string(),
        assigned_service_ids: vec![service_id],
        working_hours: Default::default(),
    }
}
