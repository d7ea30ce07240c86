use bookwise_core::models::appointment::{Appointment, AppointmentStatus};
use bookwise_core::models::business::{Business, BusinessSettings};
use bookwise_core::models::service::Service;
use bookwise_core::models::staff::{StaffMember, WorkingHours};
use chrono::{DateTime, Utc};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBusiness {
    pub id: Uuid,
    pub name: String,
    pub timezone: String,
    pub booking_window_days: i64,
    pub min_notice_hours: i64,
    pub buffer_minutes: i64,
    pub created_at: DateTime<Utc>,
}

impl From<DbBusiness> for Business {
    fn from(row: DbBusiness) -> Self {
        Business {
            id: row.id,
            name: row.name,
            timezone: row.timezone,
            settings: BusinessSettings {
                booking_window_days: row.booking_window_days,
                min_notice_hours: row.min_notice_hours,
                buffer_minutes: row.buffer_minutes,
            },
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbStaffMember {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub assigned_service_ids: Vec<Uuid>,
    pub working_hours: Json<WorkingHours>,
    pub created_at: DateTime<Utc>,
}

impl From<DbStaffMember> for StaffMember {
    fn from(row: DbStaffMember) -> Self {
        StaffMember {
            id: row.id,
            business_id: row.business_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            assigned_service_ids: row.assigned_service_ids,
            working_hours: row.working_hours.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub color: String,
    pub is_active: bool,
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            business_id: row.business_id,
            name: row.name,
            duration_minutes: row.duration_minutes,
            price_cents: row.price_cents,
            color: row.color,
            is_active: row.is_active,
        }
    }
}

/// Appointment row. Instants are BIGINT millisecond timestamps and `status`
/// is the exact persisted string, so the conversion to the core model is
/// fallible on malformed rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub business_id: Uuid,
    pub service_id: Uuid,
    pub staff_id: Uuid,
    pub client_id: Uuid,
    pub start_time: i64,
    pub end_time: i64,
    pub status: String,
    pub notes: Option<String>,
    pub reminders_sent: Vec<String>,
    pub created_at: i64,
}

fn instant_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| eyre!("timestamp out of range: {millis}"))
}

impl DbAppointment {
    pub fn into_appointment(self) -> Result<Appointment> {
        let status = self
            .status
            .parse::<AppointmentStatus>()
            .map_err(|e| eyre!(e))?;

        Ok(Appointment {
            id: self.id,
            business_id: self.business_id,
            service_id: self.service_id,
            staff_id: self.staff_id,
            client_id: self.client_id,
            start_time: instant_from_millis(self.start_time)?,
            end_time: instant_from_millis(self.end_time)?,
            status,
            notes: self.notes,
            reminders_sent: self.reminders_sent,
            created_at: instant_from_millis(self.created_at)?,
        })
    }
}

/// Converts a batch of rows, surfacing the first malformed one.
pub fn into_appointments(rows: Vec<DbAppointment>) -> Result<Vec<Appointment>> {
    rows.into_iter().map(DbAppointment::into_appointment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(status: &str) -> DbAppointment {
        DbAppointment {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            service_id: Uuid::new_v4(),
            staff_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            start_time: 1_748_854_800_000,
            end_time: 1_748_856_600_000,
            status: status.to_string(),
            notes: None,
            reminders_sent: vec![],
            created_at: 1_748_000_000_000,
        }
    }

    #[test]
    fn appointment_row_converts_with_exact_status_strings() {
        let appointment = row("no_show").into_appointment().unwrap();
        assert_eq!(appointment.status, AppointmentStatus::NoShow);
        assert_eq!(appointment.start_time.timestamp_millis(), 1_748_854_800_000);
        assert_eq!(appointment.end_time.timestamp_millis(), 1_748_856_600_000);
    }

    #[test]
    fn unknown_status_string_is_an_error() {
        assert!(row("pending").into_appointment().is_err());
    }

    #[test]
    fn business_row_carries_settings() {
        let business: Business = DbBusiness {
            id: Uuid::new_v4(),
            name: "Shear Genius".to_string(),
            timezone: "UTC".to_string(),
            booking_window_days: 14,
            min_notice_hours: 4,
            buffer_minutes: 10,
            created_at: Utc::now(),
        }
        .into();

        assert_eq!(business.settings.booking_window_days, 14);
        assert_eq!(business.settings.min_notice_hours, 4);
        assert_eq!(business.settings.buffer_minutes, 10);
    }
}
