use crate::models::{day_to_db, wall_time_to_db, DbBaseSlot};
use eyre::Result;
use slotkeeper_core::models::schedule::WeeklyBaseSlot;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::lock_provider;

/// Deletes the provider's base slots and inserts `slots` in one transaction.
pub async fn replace_base_slots(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    slots: &[WeeklyBaseSlot],
) -> Result<()> {
    let mut tx = pool.begin().await?;
    lock_provider(&mut tx, provider_id).await?;

    sqlx::query(
        r#"
        DELETE FROM base_slots
        WHERE provider_id = $1
        "#,
    )
    .bind(provider_id)
    .execute(&mut *tx)
    .await?;

    for slot in slots {
        sqlx::query(
            r#"
            INSERT INTO base_slots (provider_id, day_of_week, start_minute, end_minute, is_available)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(provider_id)
        .bind(day_to_db(slot.day_of_week))
        .bind(wall_time_to_db(slot.start))
        .bind(wall_time_to_db(slot.end))
        .bind(slot.is_available)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!(
        "Base slots replaced: provider_id={}, slots={}",
        provider_id,
        slots.len()
    );
    Ok(())
}

pub async fn get_base_slots(pool: &Pool<Postgres>, provider_id: Uuid) -> Result<Vec<DbBaseSlot>> {
    let slots = sqlx::query_as::<_, DbBaseSlot>(
        r#"
        SELECT provider_id, day_of_week, start_minute, end_minute, is_available
        FROM base_slots
        WHERE provider_id = $1
        ORDER BY day_of_week ASC, start_minute ASC
        "#,
    )
    .bind(provider_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn delete_base_slots(pool: &Pool<Postgres>, provider_id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM base_slots
        WHERE provider_id = $1
        "#,
    )
    .bind(provider_id)
    .execute(pool)
    .await?;

    Ok(())
}
