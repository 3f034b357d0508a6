pub mod base_schedule;
pub mod occupancy;
pub mod override_day;
pub mod provider;

use eyre::Result;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Serializes writers for one provider until the transaction ends.
pub(crate) async fn lock_provider(tx: &mut Transaction<'_, Postgres>, provider_id: Uuid) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(provider_id.to_string())
        .execute(&mut **tx)
        .await?;

    Ok(())
}
