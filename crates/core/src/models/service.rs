use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookable service offered by a business. Once referenced by an
/// appointment only `is_active` may change; deactivation never invalidates
/// appointments already booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub color: String,
    pub is_active: bool,
}
