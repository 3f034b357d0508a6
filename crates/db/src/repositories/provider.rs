use crate::models::DbProvider;
use eyre::Result;
use slotkeeper_core::models::provider::Provider;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn upsert_provider(pool: &Pool<Postgres>, provider: &Provider) -> Result<DbProvider> {
    tracing::debug!(
        "Upserting provider: id={}, organization_id={}, timezone={}",
        provider.id, provider.organization_id, provider.timezone
    );

    let row = sqlx::query_as::<_, DbProvider>(
        r#"
        INSERT INTO providers (id, organization_id, display_name, timezone, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO UPDATE
        SET organization_id = EXCLUDED.organization_id,
            display_name = EXCLUDED.display_name,
            timezone = EXCLUDED.timezone,
            updated_at = EXCLUDED.updated_at
        RETURNING id, organization_id, display_name, timezone, updated_at
        "#,
    )
    .bind(provider.id)
    .bind(provider.organization_id)
    .bind(provider.display_name.as_deref())
    .bind(&provider.timezone)
    .bind(provider.updated_at)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_provider_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProvider>> {
    tracing::debug!("Getting provider by id: {}", id);

    let row = sqlx::query_as::<_, DbProvider>(
        r#"
        SELECT id, organization_id, display_name, timezone, updated_at
        FROM providers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if row.is_none() {
        tracing::debug!("Provider not found: id={}", id);
    }

    Ok(row)
}
