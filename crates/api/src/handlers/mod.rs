pub mod availability;
pub mod occupancy;
pub mod provider;
pub mod schedule;

use chrono::NaiveDate;
use serde::Deserialize;
use slotkeeper_core::{
    errors::EngineError,
    models::{provider::Provider, time::DateRange},
    AvailabilityEngine,
};
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both inclusive.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl RangeQuery {
    pub fn range(&self) -> Result<DateRange, AppError> {
        Ok(DateRange::new(self.from, self.to)?)
    }
}

/// Rejects a provider whose stored profile belongs to another organization.
///
/// Providers without a profile pass, since the engine trusts the ids the
/// calling layer hands it.
pub(crate) async fn scoped_provider(
    engine: &AvailabilityEngine,
    organization_id: Uuid,
    provider_id: Uuid,
) -> Result<Option<Provider>, AppError> {
    match engine.find_provider(provider_id).await? {
        Some(provider) if provider.organization_id != organization_id => {
            tracing::debug!(
                "Provider {} requested under organization {} but belongs to {}",
                provider_id,
                organization_id,
                provider.organization_id
            );
            Err(not_found(provider_id))
        }
        profile => Ok(profile),
    }
}

pub(crate) fn not_found(provider_id: Uuid) -> AppError {
    AppError(EngineError::NotFound(format!(
        "Provider with ID {} not found",
        provider_id
    )))
}
