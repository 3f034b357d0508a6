//! Storage seams for the three schedule layers and the provider directory.
//!
//! Implementations must serialize writes per provider. In particular two
//! concurrent `insert_occupancies` calls with overlapping intervals for the
//! same provider must never both succeed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::EngineResult;
use crate::models::occupancy::OccupancyInterval;
use crate::models::provider::Provider;
use crate::models::schedule::{OverrideDay, WeeklySchedule};
use crate::models::time::{DateRange, DayOfWeek};

#[async_trait]
pub trait ProviderStore: Send + Sync {
    async fn upsert_provider(&self, provider: Provider) -> EngineResult<Provider>;

    async fn get_provider(&self, provider_id: Uuid) -> EngineResult<Option<Provider>>;
}

#[async_trait]
pub trait BaseScheduleStore: Send + Sync {
    /// Replaces every base slot of `schedule.provider_id`.
    async fn replace_week(&self, schedule: WeeklySchedule) -> EngineResult<()>;

    /// Returns an empty week when nothing is stored.
    async fn get_week(&self, provider_id: Uuid) -> EngineResult<WeeklySchedule>;

    async fn delete_week(&self, provider_id: Uuid) -> EngineResult<()>;
}

#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// Inserts or replaces the override keyed by provider, week start and day.
    async fn upsert_override(&self, day: OverrideDay) -> EngineResult<()>;

    /// Overrides whose date falls in `range`, sorted by date.
    async fn overrides_in_range(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<Vec<OverrideDay>>;

    async fn delete_override(
        &self,
        provider_id: Uuid,
        week_start_date: NaiveDate,
        day_of_week: DayOfWeek,
    ) -> EngineResult<()>;
}

#[async_trait]
pub trait OccupancyStore: Send + Sync {
    /// Commits the whole batch or nothing. Fails with `EngineError::Conflict`
    /// if any interval overlaps committed occupancy.
    async fn insert_occupancies(
        &self,
        provider_id: Uuid,
        batch: Vec<OccupancyInterval>,
    ) -> EngineResult<()>;

    /// Intervals in `range`, sorted by date then start.
    async fn occupancy_in_range(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<Vec<OccupancyInterval>>;

    /// Providers holding at least one interval of the booking.
    async fn booking_providers(&self, source_booking_id: Uuid) -> EngineResult<Vec<Uuid>>;

    /// Removes the provider's intervals tied to the booking and returns them.
    async fn remove_provider_booking(
        &self,
        provider_id: Uuid,
        source_booking_id: Uuid,
    ) -> EngineResult<Vec<OccupancyInterval>>;
}

/// Handles to the stores backing an engine.
#[derive(Clone)]
pub struct Stores {
    pub providers: Arc<dyn ProviderStore>,
    pub base: Arc<dyn BaseScheduleStore>,
    pub overrides: Arc<dyn OverrideStore>,
    pub occupancy: Arc<dyn OccupancyStore>,
}

impl Stores {
    /// Uses one backend for every layer.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: ProviderStore + BaseScheduleStore + OverrideStore + OccupancyStore + 'static,
    {
        Self {
            providers: store.clone(),
            base: store.clone(),
            overrides: store.clone(),
            occupancy: store,
        }
    }
}
