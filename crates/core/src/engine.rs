//! # Availability Engine
//!
//! Façade over the stores. Writes are validated here before any store is
//! touched and invalidate cached windows for the provider once committed.
//! Reads take a snapshot of the three layers and run it through the
//! [`resolver`](crate::resolver).

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;
use uuid::Uuid;

use crate::cache::WindowCache;
use crate::errors::{EngineError, EngineResult};
use crate::models::availability::{ProviderStatus, ResolvedWindow};
use crate::models::occupancy::{NewOccupancy, OccupancyInterval};
use crate::models::provider::{parse_timezone, Provider, UpsertProviderRequest};
use crate::models::schedule::{OverrideDay, TimeSlot, WeeklySchedule};
use crate::models::time::{date_in_week, DateRange, DayOfWeek};
use crate::resolver::{self, ScheduleSnapshot};
use crate::status;
use crate::store::Stores;
use crate::validation;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Timezone used for providers without a stored profile.
    pub default_timezone: Tz,
    /// Days after today the status evaluator looks ahead for the next free window.
    pub status_horizon_days: u32,
    /// Largest date range a single query may cover.
    pub max_range_days: u32,
    pub cache_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timezone: Tz::UTC,
            status_horizon_days: 14,
            max_range_days: 92,
            cache_enabled: true,
        }
    }
}

#[derive(Clone)]
pub struct AvailabilityEngine {
    stores: Stores,
    config: EngineConfig,
    cache: Option<Arc<WindowCache>>,
}

impl AvailabilityEngine {
    pub fn new(stores: Stores, config: EngineConfig) -> Self {
        // Room for a full query range on either side of the latest fill
        let day_limit = (config.max_range_days as usize).saturating_mul(2);
        let cache = config
            .cache_enabled
            .then(|| Arc::new(WindowCache::with_day_limit(day_limit)));
        Self {
            stores,
            config,
            cache,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // Provider directory

    pub async fn upsert_provider(
        &self,
        provider_id: Uuid,
        organization_id: Uuid,
        request: UpsertProviderRequest,
    ) -> EngineResult<Provider> {
        parse_timezone(&request.timezone)?;

        let provider = Provider {
            id: provider_id,
            organization_id,
            display_name: request.display_name,
            timezone: request.timezone,
            updated_at: Utc::now(),
        };

        debug!(
            "Upserting provider: id={}, organization_id={}, timezone={}",
            provider.id, provider.organization_id, provider.timezone
        );
        let stored = self.stores.providers.upsert_provider(provider).await?;
        self.invalidate(provider_id).await;
        Ok(stored)
    }

    pub async fn find_provider(&self, provider_id: Uuid) -> EngineResult<Option<Provider>> {
        self.stores.providers.get_provider(provider_id).await
    }

    pub async fn get_provider(&self, provider_id: Uuid) -> EngineResult<Provider> {
        self.find_provider(provider_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Provider with ID {} not found", provider_id)))
    }

    /// The provider's timezone, or the configured default when no profile exists.
    pub async fn timezone_for(&self, provider_id: Uuid) -> EngineResult<Tz> {
        match self.find_provider(provider_id).await? {
            Some(provider) => provider.tz(),
            None => Ok(self.config.default_timezone),
        }
    }

    // Base schedule

    pub async fn set_week(
        &self,
        provider_id: Uuid,
        days: BTreeMap<DayOfWeek, Vec<TimeSlot>>,
    ) -> EngineResult<WeeklySchedule> {
        let schedule = WeeklySchedule {
            provider_id,
            days: validation::normalize_week(days)?,
        };

        debug!(
            "Replacing base week: provider_id={}, days={}",
            provider_id,
            schedule.days.len()
        );
        self.stores.base.replace_week(schedule.clone()).await?;
        self.invalidate(provider_id).await;
        Ok(schedule)
    }

    pub async fn get_week(&self, provider_id: Uuid) -> EngineResult<WeeklySchedule> {
        self.stores.base.get_week(provider_id).await
    }

    pub async fn delete_week(&self, provider_id: Uuid) -> EngineResult<()> {
        debug!("Deleting base week: provider_id={}", provider_id);
        self.stores.base.delete_week(provider_id).await?;
        self.invalidate(provider_id).await;
        Ok(())
    }

    // Overrides

    pub async fn add_override(
        &self,
        provider_id: Uuid,
        week_start_date: NaiveDate,
        day_of_week: DayOfWeek,
        slots: Vec<TimeSlot>,
    ) -> EngineResult<OverrideDay> {
        let date = date_in_week(week_start_date, day_of_week)?;
        let day = OverrideDay {
            provider_id,
            week_start_date,
            day_of_week,
            date,
            slots: validation::normalize_day_slots(slots)?,
        };

        debug!(
            "Upserting override: provider_id={}, date={}, slots={}",
            provider_id,
            date,
            day.slots.len()
        );
        self.stores.overrides.upsert_override(day.clone()).await?;
        self.invalidate(provider_id).await;
        Ok(day)
    }

    pub async fn get_overrides(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<Vec<OverrideDay>> {
        let range = validation::validate_range(range, self.config.max_range_days)?;
        self.stores.overrides.overrides_in_range(provider_id, range).await
    }

    pub async fn delete_override(
        &self,
        provider_id: Uuid,
        week_start_date: NaiveDate,
        day_of_week: DayOfWeek,
    ) -> EngineResult<()> {
        let date = date_in_week(week_start_date, day_of_week)?;

        debug!("Deleting override: provider_id={}, date={}", provider_id, date);
        self.stores
            .overrides
            .delete_override(provider_id, week_start_date, day_of_week)
            .await?;
        self.invalidate(provider_id).await;
        Ok(())
    }

    // Occupancy

    pub async fn add_occupancy(
        &self,
        provider_id: Uuid,
        occupancy: NewOccupancy,
    ) -> EngineResult<OccupancyInterval> {
        let interval = occupancy.for_provider(provider_id);
        self.commit_occupancy(provider_id, vec![interval.clone()]).await?;
        Ok(interval)
    }

    /// All-or-nothing import of several bookings. Returns the number committed.
    pub async fn add_all_occupancies(
        &self,
        provider_id: Uuid,
        batch: Vec<NewOccupancy>,
    ) -> EngineResult<usize> {
        let intervals: Vec<OccupancyInterval> = batch
            .iter()
            .map(|occupancy| occupancy.for_provider(provider_id))
            .collect();
        let count = intervals.len();
        self.commit_occupancy(provider_id, intervals).await?;
        Ok(count)
    }

    async fn commit_occupancy(
        &self,
        provider_id: Uuid,
        intervals: Vec<OccupancyInterval>,
    ) -> EngineResult<()> {
        validation::validate_occupancy_batch(&intervals)?;

        debug!(
            "Adding occupancy: provider_id={}, intervals={}",
            provider_id,
            intervals.len()
        );
        self.stores
            .occupancy
            .insert_occupancies(provider_id, intervals)
            .await?;
        self.invalidate(provider_id).await;
        Ok(())
    }

    pub async fn list_occupancy(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<Vec<OccupancyInterval>> {
        let range = validation::validate_range(range, self.config.max_range_days)?;
        self.stores.occupancy.occupancy_in_range(provider_id, range).await
    }

    /// Releases every interval held by a cancelled booking. Returns how many were removed.
    pub async fn remove_occupancy(&self, source_booking_id: Uuid) -> EngineResult<usize> {
        self.remove_booking(source_booking_id, None).await
    }

    /// Like [`remove_occupancy`](Self::remove_occupancy), but leaves intervals
    /// of providers whose profile belongs to another organization untouched.
    pub async fn remove_occupancy_in_organization(
        &self,
        organization_id: Uuid,
        source_booking_id: Uuid,
    ) -> EngineResult<usize> {
        self.remove_booking(source_booking_id, Some(organization_id)).await
    }

    async fn remove_booking(
        &self,
        source_booking_id: Uuid,
        organization_id: Option<Uuid>,
    ) -> EngineResult<usize> {
        let mut removed = 0;
        for provider_id in self.stores.occupancy.booking_providers(source_booking_id).await? {
            if let Some(organization_id) = organization_id {
                let foreign = self
                    .find_provider(provider_id)
                    .await?
                    .is_some_and(|provider| provider.organization_id != organization_id);
                if foreign {
                    debug!(
                        "Skipping occupancy of provider {} outside organization {}",
                        provider_id, organization_id
                    );
                    continue;
                }
            }

            let intervals = self
                .stores
                .occupancy
                .remove_provider_booking(provider_id, source_booking_id)
                .await?;
            if !intervals.is_empty() {
                self.invalidate(provider_id).await;
            }
            removed += intervals.len();
        }

        debug!(
            "Removed occupancy: booking_id={}, intervals={}",
            source_booking_id, removed
        );
        Ok(removed)
    }

    // Reads

    /// Free windows for every date in `range`.
    pub async fn resolve(&self, provider_id: Uuid, range: DateRange) -> EngineResult<Vec<ResolvedWindow>> {
        let (_, windows) = self.availability(provider_id, range, false).await?;
        Ok(windows)
    }

    /// Free and busy windows tiling every date in `range`.
    pub async fn resolve_timeline(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<Vec<ResolvedWindow>> {
        let (_, windows) = self.availability(provider_id, range, true).await?;
        Ok(windows)
    }

    /// Windows for `range` together with the timezone they were resolved in.
    /// Busy windows are only included when `include_busy` is set.
    pub async fn availability(
        &self,
        provider_id: Uuid,
        range: DateRange,
        include_busy: bool,
    ) -> EngineResult<(Tz, Vec<ResolvedWindow>)> {
        let range = validation::validate_range(range, self.config.max_range_days)?;
        let (tz, mut windows) = self.timeline(provider_id, range).await?;
        if !include_busy {
            windows.retain(|w| w.is_available);
        }
        Ok((tz, windows))
    }

    /// Whether the provider is free at `instant` and, if not, when they next are.
    pub async fn status(&self, provider_id: Uuid, instant: DateTime<Utc>) -> EngineResult<ProviderStatus> {
        let tz = self.timezone_for(provider_id).await?;
        let today = instant.with_timezone(&tz).date_naive();

        for offset in 0..=u64::from(self.config.status_horizon_days) {
            // The horizon ends early at the last representable date
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            let (_, windows) = self.timeline(provider_id, DateRange::single(date)).await?;
            let status = status::status_at(instant, &windows);
            if status.is_settled() {
                return Ok(status);
            }
        }

        Ok(ProviderStatus::unavailable())
    }

    /// Reads the timezone after recording the cache generation, so a profile
    /// change racing this read cannot leave stale windows cached.
    async fn timeline(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<(Tz, Vec<ResolvedWindow>)> {
        let generation = match &self.cache {
            Some(cache) => {
                if let Some(hit) = cache.get(provider_id, range).await {
                    return Ok(hit);
                }
                Some(cache.generation().await)
            }
            None => None,
        };

        let tz = self.timezone_for(provider_id).await?;
        let snapshot = self.snapshot(provider_id, range).await?;
        let days = resolver::timeline_by_day(range, &tz, &snapshot);
        let windows: Vec<ResolvedWindow> = days.values().flatten().copied().collect();

        if let (Some(cache), Some(generation)) = (&self.cache, generation) {
            cache.put(provider_id, generation, tz, days).await;
        }

        Ok((tz, windows))
    }

    async fn snapshot(&self, provider_id: Uuid, range: DateRange) -> EngineResult<ScheduleSnapshot> {
        let (week, overrides, occupancy) = tokio::try_join!(
            self.stores.base.get_week(provider_id),
            self.stores.overrides.overrides_in_range(provider_id, range),
            self.stores.occupancy.occupancy_in_range(provider_id, range),
        )?;

        Ok(ScheduleSnapshot {
            week,
            overrides,
            occupancy,
        })
    }

    async fn invalidate(&self, provider_id: Uuid) {
        if let Some(cache) = &self.cache {
            cache.invalidate(provider_id).await;
        }
    }
}
