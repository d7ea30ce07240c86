use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The bookable window for a single weekday, wall-clock in the business's
/// timezone. `start < end` must hold whenever `enabled` is true; a disabled
/// day makes the staff member unavailable for the entire day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub enabled: bool,
}

impl DayHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start,
            end,
            enabled: true,
        }
    }
}

/// Weekly working hours for one staff member. A missing day is treated the
/// same as a disabled one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(default)]
    pub monday: Option<DayHours>,
    #[serde(default)]
    pub tuesday: Option<DayHours>,
    #[serde(default)]
    pub wednesday: Option<DayHours>,
    #[serde(default)]
    pub thursday: Option<DayHours>,
    #[serde(default)]
    pub friday: Option<DayHours>,
    #[serde(default)]
    pub saturday: Option<DayHours>,
    #[serde(default)]
    pub sunday: Option<DayHours>,
}

impl WorkingHours {
    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DayHours> {
        match weekday {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }

    /// The enabled window for a weekday, or `None` when the day is off.
    pub fn enabled_window(&self, weekday: Weekday) -> Option<&DayHours> {
        self.for_weekday(weekday).filter(|day| day.enabled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    /// Services this staff member may be booked for; appointments for any
    /// other service are rejected by the validator.
    pub assigned_service_ids: Vec<Uuid>,
    pub working_hours: WorkingHours,
}

impl StaffMember {
    pub fn offers_service(&self, service_id: Uuid) -> bool {
        self.assigned_service_ids.contains(&service_id)
    }
}
