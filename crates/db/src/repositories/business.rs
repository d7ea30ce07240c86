use crate::models::DbBusiness;
use bookwise_core::models::business::BusinessSettings;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_business(
    pool: &Pool<Postgres>,
    name: &str,
    timezone: &str,
    settings: &BusinessSettings,
) -> Result<DbBusiness> {
    let business = sqlx::query_as::<_, DbBusiness>(
        r#"
        INSERT INTO businesses (name, timezone, booking_window_days, min_notice_hours, buffer_minutes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, timezone, booking_window_days, min_notice_hours, buffer_minutes, created_at
        "#,
    )
    .bind(name)
    .bind(timezone)
    .bind(settings.booking_window_days)
    .bind(settings.min_notice_hours)
    .bind(settings.buffer_minutes)
    .fetch_one(pool)
    .await?;

    Ok(business)
}

pub async fn get_business_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBusiness>> {
    let business = sqlx::query_as::<_, DbBusiness>(
        r#"
        SELECT id, name, timezone, booking_window_days, min_notice_hours, buffer_minutes, created_at
        FROM businesses
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(business)
}

pub async fn update_settings(
    pool: &Pool<Postgres>,
    id: Uuid,
    settings: &BusinessSettings,
) -> Result<DbBusiness> {
    let business = sqlx::query_as::<_, DbBusiness>(
        r#"
        UPDATE businesses
        SET booking_window_days = $2, min_notice_hours = $3, buffer_minutes = $4
        WHERE id = $1
        RETURNING id, name, timezone, booking_window_days, min_notice_hours, buffer_minutes, created_at
        "#,
    )
    .bind(id)
    .bind(settings.booking_window_days)
    .bind(settings.min_notice_hours)
    .bind(settings.buffer_minutes)
    .fetch_one(pool)
    .await?;

    Ok(business)
}
