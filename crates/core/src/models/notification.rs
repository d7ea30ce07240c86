use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Creation,
    Reminder,
    Staff,
    Cancellation,
}

/// Plain description handed to the notification collaborator after a
/// successful creation or status transition. Formatting and delivery (email,
/// SMS) happen outside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub appointment_summary: String,
    pub kind: NotificationKind,
}
