use std::fmt;
use std::str::FromStr;

use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an appointment.
///
/// Serialized (JSON and database) exactly as
/// `scheduled | confirmed | completed | cancelled | no_show`. `Completed`,
/// `Cancelled`, and `NoShow` are terminal; re-booking requires a new
/// appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "no_show" => Ok(AppointmentStatus::NoShow),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

/// A booked appointment: one staff member, one client, one service.
///
/// Instants are serialized as millisecond Unix timestamps for direct
/// arithmetic on the wire and in storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub business_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub reminders_sent: Vec<String>,
    #[serde(with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// A proposed appointment interval, before validation and persistence.
///
/// `exclude_appointment_id` carries the prior record's id when an existing
/// appointment is being moved, so the validator can drop it from the conflict
/// set (self-conflict is not an error). `custom_duration` relaxes the
/// duration-equals-service check to positivity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAppointment {
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub custom_duration: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_appointment_id: Option<Uuid>,
}

impl CandidateAppointment {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub business_id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    #[serde(with = "ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    /// Omitted for the common case; the service duration then implies the end.
    #[serde(default, with = "ts_milliseconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Appointments booked by staff directly start out `confirmed`.
    #[serde(default)]
    pub booked_by_staff: bool,
    /// Accept a duration that differs from the service's; length must still
    /// be positive.
    #[serde(default)]
    pub custom_duration: bool,
    /// Used only to address the creation notification; client records are
    /// referenced by id and never stored by this service.
    #[serde(default)]
    pub client_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[serde(default)]
    pub staff_id: Option<Uuid>,
    #[serde(default, with = "ts_milliseconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_milliseconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateAppointmentRequest {
    /// Whether this update touches anything the validator must re-check.
    pub fn reschedules(&self) -> bool {
        self.staff_id.is_some() || self.start_time.is_some() || self.end_time.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub status: AppointmentStatus,
}

/// One bookable `[start, end)` window from the availability resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    #[serde(with = "ts_milliseconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub staff_id: Uuid,
    pub date: String,
    pub slots: Vec<AvailabilitySlot>,
}
