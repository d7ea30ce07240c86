use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Creates the Bookwise tables. Appointment instants are stored as BIGINT
/// millisecond Unix timestamps so that interval arithmetic in queries and in
/// the scheduling core operates on the same representation.
pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create businesses table (booking policy lives on the business row)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS businesses (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            booking_window_days BIGINT NOT NULL DEFAULT 30,
            min_notice_hours BIGINT NOT NULL DEFAULT 2,
            buffer_minutes BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create staff_members table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS staff_members (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            business_id UUID NOT NULL REFERENCES businesses(id),
            user_id UUID NOT NULL,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            assigned_service_ids UUID[] NOT NULL DEFAULT '{}',
            working_hours JSONB NOT NULL DEFAULT '{}',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            business_id UUID NOT NULL REFERENCES businesses(id),
            name VARCHAR(255) NOT NULL,
            duration_minutes BIGINT NOT NULL,
            price_cents BIGINT NOT NULL DEFAULT 0,
            color VARCHAR(16) NOT NULL DEFAULT '#000000',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            CONSTRAINT positive_duration CHECK (duration_minutes > 0),
            CONSTRAINT non_negative_price CHECK (price_cents >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            business_id UUID NOT NULL REFERENCES businesses(id),
            service_id UUID NOT NULL REFERENCES services(id),
            staff_id UUID NOT NULL REFERENCES staff_members(id),
            client_id UUID NOT NULL,
            start_time BIGINT NOT NULL,
            end_time BIGINT NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'scheduled',
            notes TEXT NULL,
            reminders_sent TEXT[] NOT NULL DEFAULT '{}',
            created_at BIGINT NOT NULL,
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT known_status CHECK (
                status IN ('scheduled', 'confirmed', 'completed', 'cancelled', 'no_show')
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_staff_members_business_id ON staff_members(business_id);
        CREATE INDEX IF NOT EXISTS idx_services_business_id ON services(business_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_business_id ON appointments(business_id);
        CREATE INDEX IF NOT EXISTS idx_appointments_staff_start ON appointments(staff_id, start_time);
        CREATE INDEX IF NOT EXISTS idx_appointments_status ON appointments(status);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
