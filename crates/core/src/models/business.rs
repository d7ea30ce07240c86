use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking policy knobs, configured per business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSettings {
    /// How far into the future a client may book, in days.
    pub booking_window_days: i64,
    /// Minimum lead time between "now" and a bookable start, in hours.
    pub min_notice_hours: i64,
    /// Idle minutes required after an appointment before the same staff
    /// member can start another.
    pub buffer_minutes: i64,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            booking_window_days: 30,
            min_notice_hours: 2,
            buffer_minutes: 0,
        }
    }
}

/// A tenant. The single IANA timezone interprets every wall-clock value
/// (working hours) belonging to this business.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub timezone: String,
    pub settings: BusinessSettings,
    #[serde(with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Business {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| eyre!("invalid business timezone: {}", self.timezone))
    }
}
