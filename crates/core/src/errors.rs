use thiserror::Error;
use uuid::Uuid;

use crate::models::appointment::AppointmentStatus;

/// Booking validation failures, tagged with the offending value so the
/// calling layer can render a precise user-facing message.
///
/// Every check in the validator maps to exactly one variant; the first
/// failing check short-circuits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid duration of {actual_minutes} minutes (service expects {expected_minutes})")]
    InvalidDuration {
        actual_minutes: i64,
        expected_minutes: i64,
    },

    #[error("staff member does not offer service {service_id}")]
    ServiceNotOffered { service_id: Uuid },

    #[error("requested time falls outside the staff member's working hours")]
    OutsideWorkingHours,

    #[error("booking requires at least {min_notice_hours} hours notice")]
    InsufficientNotice { min_notice_hours: i64 },

    #[error("booking is more than {booking_window_days} days in the future")]
    BeyondBookingWindow { booking_window_days: i64 },

    #[error("requested slot overlaps appointment {conflicting_appointment_id}")]
    Conflict { conflicting_appointment_id: Uuid },
}

impl ValidationError {
    /// Stable machine-readable tag, used as the `kind` field of API error
    /// bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidDuration { .. } => "invalid_duration",
            ValidationError::ServiceNotOffered { .. } => "service_not_offered",
            ValidationError::OutsideWorkingHours => "outside_working_hours",
            ValidationError::InsufficientNotice { .. } => "insufficient_notice",
            ValidationError::BeyondBookingWindow { .. } => "beyond_booking_window",
            ValidationError::Conflict { .. } => "conflict",
        }
    }
}

/// Rejected status change. Premature transitions (completing an appointment
/// that has not ended, marking a no-show before the start time) are reported
/// through the same variant: the transition table is closed and callers only
/// need to know the move was illegal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
}

/// Application-level error for the persistence and API layers.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BookingResult<T> = Result<T, BookingError>;
