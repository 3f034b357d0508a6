use crate::models::{day_to_db, wall_time_to_db, DbOverrideDay, DbOverrideSlot};
use chrono::NaiveDate;
use eyre::Result;
use slotkeeper_core::models::{schedule::OverrideDay, time::DayOfWeek};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::lock_provider;

/// Replaces any override stored under the same provider, week and day.
pub async fn upsert_override(pool: &Pool<Postgres>, day: &OverrideDay) -> Result<()> {
    let mut tx = pool.begin().await?;
    lock_provider(&mut tx, day.provider_id).await?;

    // Slots go with the day row through ON DELETE CASCADE
    sqlx::query(
        r#"
        DELETE FROM override_days
        WHERE provider_id = $1 AND week_start_date = $2 AND day_of_week = $3
        "#,
    )
    .bind(day.provider_id)
    .bind(day.week_start_date)
    .bind(day_to_db(day.day_of_week))
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO override_days (provider_id, week_start_date, day_of_week, override_date)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(day.provider_id)
    .bind(day.week_start_date)
    .bind(day_to_db(day.day_of_week))
    .bind(day.date)
    .execute(&mut *tx)
    .await?;

    for slot in &day.slots {
        sqlx::query(
            r#"
            INSERT INTO override_slots (provider_id, override_date, start_minute, end_minute, is_available)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(day.provider_id)
        .bind(day.date)
        .bind(wall_time_to_db(slot.start))
        .bind(wall_time_to_db(slot.end))
        .bind(slot.is_available)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!(
        "Override stored: provider_id={}, date={}, slots={}",
        day.provider_id,
        day.date,
        day.slots.len()
    );
    Ok(())
}

pub async fn get_override_days(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbOverrideDay>> {
    let days = sqlx::query_as::<_, DbOverrideDay>(
        r#"
        SELECT provider_id, week_start_date, day_of_week, override_date
        FROM override_days
        WHERE provider_id = $1 AND override_date BETWEEN $2 AND $3
        ORDER BY override_date ASC
        "#,
    )
    .bind(provider_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(days)
}

pub async fn get_override_slots(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbOverrideSlot>> {
    let slots = sqlx::query_as::<_, DbOverrideSlot>(
        r#"
        SELECT provider_id, override_date, start_minute, end_minute, is_available
        FROM override_slots
        WHERE provider_id = $1 AND override_date BETWEEN $2 AND $3
        ORDER BY override_date ASC, start_minute ASC
        "#,
    )
    .bind(provider_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn delete_override(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    week_start_date: NaiveDate,
    day_of_week: DayOfWeek,
) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM override_days
        WHERE provider_id = $1 AND week_start_date = $2 AND day_of_week = $3
        "#,
    )
    .bind(provider_id)
    .bind(week_start_date)
    .bind(day_to_db(day_of_week))
    .execute(pool)
    .await?;

    Ok(())
}
