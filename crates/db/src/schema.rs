use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Provider profiles (timezone and tenant scope)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS providers (
            id UUID PRIMARY KEY,
            organization_id UUID NOT NULL,
            display_name VARCHAR(255) NULL,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Recurring weekly slots
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS base_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            provider_id UUID NOT NULL,
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_minute SMALLINT NOT NULL,
            end_minute SMALLINT NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            CONSTRAINT valid_base_range CHECK (start_minute >= 0 AND end_minute <= 1440 AND end_minute > start_minute)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One row per override date, present even when it has no slots
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS override_days (
            provider_id UUID NOT NULL,
            week_start_date DATE NOT NULL,
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            override_date DATE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (provider_id, week_start_date, day_of_week),
            UNIQUE (provider_id, override_date)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS override_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            provider_id UUID NOT NULL,
            override_date DATE NOT NULL,
            start_minute SMALLINT NOT NULL,
            end_minute SMALLINT NOT NULL,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            FOREIGN KEY (provider_id, override_date)
                REFERENCES override_days(provider_id, override_date) ON DELETE CASCADE,
            CONSTRAINT valid_override_range CHECK (start_minute >= 0 AND end_minute <= 1440 AND end_minute > start_minute)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Committed bookings
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS occupancy (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            provider_id UUID NOT NULL,
            occupancy_date DATE NOT NULL,
            start_minute SMALLINT NOT NULL,
            end_minute SMALLINT NOT NULL,
            source_booking_id UUID NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_occupancy_range CHECK (start_minute >= 0 AND end_minute <= 1440 AND end_minute > start_minute)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_providers_organization_id ON providers(organization_id);
        CREATE INDEX IF NOT EXISTS idx_base_slots_provider_id ON base_slots(provider_id);
        CREATE INDEX IF NOT EXISTS idx_override_slots_provider_date ON override_slots(provider_id, override_date);
        CREATE INDEX IF NOT EXISTS idx_occupancy_provider_date ON occupancy(provider_id, occupancy_date);
        CREATE INDEX IF NOT EXISTS idx_occupancy_source_booking_id ON occupancy(source_booking_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
