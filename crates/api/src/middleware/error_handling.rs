//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error responses so the
//! whole API fails uniformly.
//!
//! Validation failures carry a machine-readable `kind` tag so the booking UI
//! can render a precise message ("slot taken, pick another time") instead of
//! a generic one; a conflict additionally carries the conflicting
//! appointment's id.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookwise_core::errors::{BookingError, ValidationError};
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `BookingError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::BadRequest(_) => StatusCode::BAD_REQUEST,
            BookingError::Validation(ValidationError::Conflict { .. }) => StatusCode::CONFLICT,
            BookingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Transition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = match &self.0 {
            BookingError::Validation(err) => {
                let mut body = json!({ "error": message, "kind": err.kind() });
                if let ValidationError::Conflict {
                    conflicting_appointment_id,
                } = err
                {
                    body["conflictingAppointmentId"] = json!(conflicting_appointment_id);
                }
                body
            }
            BookingError::Transition(_) => {
                json!({ "error": message, "kind": "invalid_transition" })
            }
            _ => json!({ "error": message }),
        };

        // Combine status code and JSON body into a response
        (status, Json(body)).into_response()
    }
}

/// Automatic conversion from BookingError to AppError, enabling `?` in
/// handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError. Raw repository errors
/// surface as the Database variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}
