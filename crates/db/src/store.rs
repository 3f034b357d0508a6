//! Postgres-backed implementation of the engine's store traits.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::Result;
use slotkeeper_core::{
    errors::EngineResult,
    models::{
        occupancy::OccupancyInterval,
        provider::Provider,
        schedule::{OverrideDay, TimeSlot, WeeklyBaseSlot, WeeklySchedule},
        time::{DateRange, DayOfWeek},
    },
    store::{BaseScheduleStore, OccupancyStore, OverrideStore, ProviderStore},
};
use uuid::Uuid;

use crate::models::{day_from_db, DbOverrideDay, DbOverrideSlot};
use crate::repositories::{base_schedule, occupancy, override_day, provider};
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProviderStore for PgStore {
    async fn upsert_provider(&self, profile: Provider) -> EngineResult<Provider> {
        let row = provider::upsert_provider(&self.pool, &profile).await?;
        Ok(row.into())
    }

    async fn get_provider(&self, provider_id: Uuid) -> EngineResult<Option<Provider>> {
        let row = provider::get_provider_by_id(&self.pool, provider_id).await?;
        Ok(row.map(Provider::from))
    }
}

#[async_trait]
impl BaseScheduleStore for PgStore {
    async fn replace_week(&self, schedule: WeeklySchedule) -> EngineResult<()> {
        base_schedule::replace_base_slots(&self.pool, schedule.provider_id, &schedule.to_rows()).await?;
        Ok(())
    }

    async fn get_week(&self, provider_id: Uuid) -> EngineResult<WeeklySchedule> {
        let rows = base_schedule::get_base_slots(&self.pool, provider_id)
            .await?
            .into_iter()
            .map(WeeklyBaseSlot::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(WeeklySchedule::from_rows(provider_id, &rows))
    }

    async fn delete_week(&self, provider_id: Uuid) -> EngineResult<()> {
        base_schedule::delete_base_slots(&self.pool, provider_id).await?;
        Ok(())
    }
}

#[async_trait]
impl OverrideStore for PgStore {
    async fn upsert_override(&self, day: OverrideDay) -> EngineResult<()> {
        override_day::upsert_override(&self.pool, &day).await?;
        Ok(())
    }

    async fn overrides_in_range(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<Vec<OverrideDay>> {
        let days = override_day::get_override_days(&self.pool, provider_id, range.from, range.to).await?;
        let slots = override_day::get_override_slots(&self.pool, provider_id, range.from, range.to).await?;
        Ok(assemble_overrides(days, slots)?)
    }

    async fn delete_override(
        &self,
        provider_id: Uuid,
        week_start_date: NaiveDate,
        day_of_week: DayOfWeek,
    ) -> EngineResult<()> {
        override_day::delete_override(&self.pool, provider_id, week_start_date, day_of_week).await?;
        Ok(())
    }
}

#[async_trait]
impl OccupancyStore for PgStore {
    async fn insert_occupancies(
        &self,
        provider_id: Uuid,
        batch: Vec<OccupancyInterval>,
    ) -> EngineResult<()> {
        occupancy::insert_occupancies(&self.pool, provider_id, &batch).await
    }

    async fn occupancy_in_range(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<Vec<OccupancyInterval>> {
        let rows = occupancy::get_occupancy_in_range(&self.pool, provider_id, range.from, range.to)
            .await?
            .into_iter()
            .map(OccupancyInterval::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(rows)
    }

    async fn booking_providers(&self, source_booking_id: Uuid) -> EngineResult<Vec<Uuid>> {
        Ok(occupancy::get_booking_providers(&self.pool, source_booking_id).await?)
    }

    async fn remove_provider_booking(
        &self,
        provider_id: Uuid,
        source_booking_id: Uuid,
    ) -> EngineResult<Vec<OccupancyInterval>> {
        let removed = occupancy::delete_provider_booking(&self.pool, provider_id, source_booking_id)
            .await?
            .into_iter()
            .map(OccupancyInterval::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(removed)
    }
}

fn assemble_overrides(
    days: Vec<DbOverrideDay>,
    slots: Vec<DbOverrideSlot>,
) -> Result<Vec<OverrideDay>> {
    let mut slots_by_date: HashMap<NaiveDate, Vec<TimeSlot>> = HashMap::new();
    for slot in &slots {
        slots_by_date
            .entry(slot.override_date)
            .or_default()
            .push(TimeSlot::try_from(slot)?);
    }

    days.into_iter()
        .map(|day| -> Result<OverrideDay> {
            Ok(OverrideDay {
                provider_id: day.provider_id,
                week_start_date: day.week_start_date,
                day_of_week: day_from_db(day.day_of_week)?,
                date: day.override_date,
                slots: slots_by_date.remove(&day.override_date).unwrap_or_default(),
            })
        })
        .collect()
}
