use crate::models::DbService;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_service(
    pool: &Pool<Postgres>,
    business_id: Uuid,
    name: &str,
    duration_minutes: i64,
    price_cents: i64,
    color: &str,
) -> Result<DbService> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (business_id, name, duration_minutes, price_cents, color)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, business_id, name, duration_minutes, price_cents, color, is_active
        "#,
    )
    .bind(business_id)
    .bind(name)
    .bind(duration_minutes)
    .bind(price_cents)
    .bind(color)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, business_id, name, duration_minutes, price_cents, color, is_active
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn list_services_by_business(
    pool: &Pool<Postgres>,
    business_id: Uuid,
    active_only: bool,
) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, business_id, name, duration_minutes, price_cents, color, is_active
        FROM services
        WHERE business_id = $1 AND (is_active OR NOT $2)
        ORDER BY name ASC
        "#,
    )
    .bind(business_id)
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(services)
}

/// Deactivation hides the service from new bookings; appointments already
/// referencing it are untouched.
pub async fn deactivate_service(pool: &Pool<Postgres>, id: Uuid) -> Result<DbService> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        UPDATE services
        SET is_active = FALSE
        WHERE id = $1
        RETURNING id, business_id, name, duration_minutes, price_cents, color, is_active
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(service)
}
