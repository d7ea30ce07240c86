use axum::{http::StatusCode, response::IntoResponse};
use bookwise_api::middleware::error_handling::AppError;
use bookwise_core::errors::{BookingError, TransitionError, ValidationError};
use bookwise_core::models::appointment::AppointmentStatus;
use pretty_assertions::assert_eq;
use serde_json::Value;
use uuid::Uuid;

async fn response_parts(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn not_found_maps_to_404() {
    let (status, body) =
        response_parts(AppError(BookingError::NotFound("Appointment".into()))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Resource not found: Appointment");
}

#[tokio::test]
async fn bad_request_maps_to_400() {
    let (status, body) = response_parts(AppError(BookingError::BadRequest(
        "invalid date".into(),
    )))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid date"));
}

#[tokio::test]
async fn conflict_maps_to_409_with_conflicting_id() {
    let conflicting = Uuid::new_v4();
    let (status, body) = response_parts(AppError(BookingError::Validation(
        ValidationError::Conflict {
            conflicting_appointment_id: conflicting,
        },
    )))
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");
    assert_eq!(body["conflictingAppointmentId"], conflicting.to_string());
}

#[tokio::test]
async fn other_validation_errors_map_to_422_with_kind() {
    let (status, body) = response_parts(AppError(BookingError::Validation(
        ValidationError::InsufficientNotice { min_notice_hours: 2 },
    )))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "insufficient_notice");
    assert!(body["error"].as_str().unwrap().contains("2 hours"));
}

#[tokio::test]
async fn invalid_transition_maps_to_422() {
    let (status, body) = response_parts(AppError(BookingError::Transition(
        TransitionError::InvalidTransition {
            from: AppointmentStatus::Completed,
            to: AppointmentStatus::Scheduled,
        },
    )))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_transition");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("from completed to scheduled"));
}

#[tokio::test]
async fn database_errors_map_to_500() {
    let (status, body) = response_parts(AppError(BookingError::Database(eyre::eyre!(
        "connection reset"
    ))))
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("connection reset"));
    assert!(body.get("kind").is_none());
}
