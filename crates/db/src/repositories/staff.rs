use crate::models::DbStaffMember;
use bookwise_core::models::staff::WorkingHours;
use eyre::Result;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_staff_member(
    pool: &Pool<Postgres>,
    business_id: Uuid,
    user_id: Uuid,
    name: &str,
    email: &str,
    assigned_service_ids: &[Uuid],
    working_hours: &WorkingHours,
) -> Result<DbStaffMember> {
    let staff = sqlx::query_as::<_, DbStaffMember>(
        r#"
        INSERT INTO staff_members (business_id, user_id, name, email, assigned_service_ids, working_hours)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, business_id, user_id, name, email, assigned_service_ids, working_hours, created_at
        "#,
    )
    .bind(business_id)
    .bind(user_id)
    .bind(name)
    .bind(email)
    .bind(assigned_service_ids)
    .bind(Json(working_hours))
    .fetch_one(pool)
    .await?;

    Ok(staff)
}

pub async fn get_staff_member_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbStaffMember>> {
    let staff = sqlx::query_as::<_, DbStaffMember>(
        r#"
        SELECT id, business_id, user_id, name, email, assigned_service_ids, working_hours, created_at
        FROM staff_members
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(staff)
}

pub async fn list_staff_by_business(
    pool: &Pool<Postgres>,
    business_id: Uuid,
) -> Result<Vec<DbStaffMember>> {
    let staff = sqlx::query_as::<_, DbStaffMember>(
        r#"
        SELECT id, business_id, user_id, name, email, assigned_service_ids, working_hours, created_at
        FROM staff_members
        WHERE business_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(business_id)
    .fetch_all(pool)
    .await?;

    Ok(staff)
}

pub async fn update_working_hours(
    pool: &Pool<Postgres>,
    id: Uuid,
    working_hours: &WorkingHours,
) -> Result<DbStaffMember> {
    let staff = sqlx::query_as::<_, DbStaffMember>(
        r#"
        UPDATE staff_members
        SET working_hours = $2
        WHERE id = $1
        RETURNING id, business_id, user_id, name, email, assigned_service_ids, working_hours, created_at
        "#,
    )
    .bind(id)
    .bind(Json(working_hours))
    .fetch_one(pool)
    .await?;

    Ok(staff)
}

pub async fn assign_services(
    pool: &Pool<Postgres>,
    id: Uuid,
    assigned_service_ids: &[Uuid],
) -> Result<DbStaffMember> {
    let staff = sqlx::query_as::<_, DbStaffMember>(
        r#"
        UPDATE staff_members
        SET assigned_service_ids = $2
        WHERE id = $1
        RETURNING id, business_id, user_id, name, email, assigned_service_ids, working_hours, created_at
        "#,
    )
    .bind(id)
    .bind(assigned_service_ids)
    .fetch_one(pool)
    .await?;

    Ok(staff)
}
