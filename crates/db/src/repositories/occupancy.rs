use crate::models::{wall_time_to_db, DbOccupancy};
use chrono::NaiveDate;
use eyre::{Result, WrapErr};
use slotkeeper_core::{
    errors::EngineResult,
    models::occupancy::OccupancyInterval,
    validation::check_occupancy_conflicts,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::lock_provider;

/// Inserts the batch under the provider lock, or nothing if any interval
/// collides with committed occupancy.
pub async fn insert_occupancies(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    batch: &[OccupancyInterval],
) -> EngineResult<()> {
    let mut tx = pool.begin().await.wrap_err("Failed to open transaction")?;
    lock_provider(&mut tx, provider_id).await?;

    let mut dates: Vec<NaiveDate> = batch.iter().map(|o| o.date).collect();
    dates.sort();
    dates.dedup();

    let existing = sqlx::query_as::<_, DbOccupancy>(
        r#"
        SELECT id, provider_id, occupancy_date, start_minute, end_minute, source_booking_id, created_at
        FROM occupancy
        WHERE provider_id = $1 AND occupancy_date = ANY($2)
        "#,
    )
    .bind(provider_id)
    .bind(&dates)
    .fetch_all(&mut *tx)
    .await
    .wrap_err("Failed to load existing occupancy")?
    .into_iter()
    .map(OccupancyInterval::try_from)
    .collect::<Result<Vec<_>>>()?;

    // Dropping `tx` on the error path rolls back
    check_occupancy_conflicts(&existing, batch)?;

    for interval in batch {
        sqlx::query(
            r#"
            INSERT INTO occupancy (provider_id, occupancy_date, start_minute, end_minute, source_booking_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(provider_id)
        .bind(interval.date)
        .bind(wall_time_to_db(interval.start))
        .bind(wall_time_to_db(interval.end))
        .bind(interval.source_booking_id)
        .execute(&mut *tx)
        .await
        .wrap_err("Failed to insert occupancy")?;
    }

    tx.commit().await.wrap_err("Failed to commit occupancy")?;

    tracing::debug!(
        "Occupancy committed: provider_id={}, intervals={}",
        provider_id,
        batch.len()
    );
    Ok(())
}

pub async fn get_occupancy_in_range(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbOccupancy>> {
    let rows = sqlx::query_as::<_, DbOccupancy>(
        r#"
        SELECT id, provider_id, occupancy_date, start_minute, end_minute, source_booking_id, created_at
        FROM occupancy
        WHERE provider_id = $1 AND occupancy_date BETWEEN $2 AND $3
        ORDER BY occupancy_date ASC, start_minute ASC
        "#,
    )
    .bind(provider_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_booking_providers(
    pool: &Pool<Postgres>,
    source_booking_id: Uuid,
) -> Result<Vec<Uuid>> {
    let providers = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT DISTINCT provider_id
        FROM occupancy
        WHERE source_booking_id = $1
        ORDER BY provider_id
        "#,
    )
    .bind(source_booking_id)
    .fetch_all(pool)
    .await
    .wrap_err("Failed to look up booking providers")?;

    Ok(providers)
}

pub async fn delete_provider_booking(
    pool: &Pool<Postgres>,
    provider_id: Uuid,
    source_booking_id: Uuid,
) -> Result<Vec<DbOccupancy>> {
    let rows = sqlx::query_as::<_, DbOccupancy>(
        r#"
        DELETE FROM occupancy
        WHERE provider_id = $1 AND source_booking_id = $2
        RETURNING id, provider_id, occupancy_date, start_minute, end_minute, source_booking_id, created_at
        "#,
    )
    .bind(provider_id)
    .bind(source_booking_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
