//! In-process store used when no database is configured, and in tests.
//!
//! Every provider owns one async mutex guarding all of its layers, so writes
//! for a provider are serialized while different providers proceed in
//! parallel.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use slotkeeper_core::{
    errors::EngineResult,
    models::{
        occupancy::OccupancyInterval,
        provider::Provider,
        schedule::{OverrideDay, TimeSlot, WeeklySchedule},
        time::{DateRange, DayOfWeek},
    },
    store::{BaseScheduleStore, OccupancyStore, OverrideStore, ProviderStore},
    validation::check_occupancy_conflicts,
};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Debug, Default)]
struct ProviderBook {
    profile: Option<Provider>,
    week: BTreeMap<DayOfWeek, Vec<TimeSlot>>,
    overrides: BTreeMap<(NaiveDate, DayOfWeek), OverrideDay>,
    occupancy: Vec<OccupancyInterval>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    books: Arc<RwLock<HashMap<Uuid, Arc<Mutex<ProviderBook>>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn book(&self, provider_id: Uuid) -> Arc<Mutex<ProviderBook>> {
        if let Some(book) = self.books.read().await.get(&provider_id) {
            return book.clone();
        }
        self.books
            .write()
            .await
            .entry(provider_id)
            .or_default()
            .clone()
    }

    async fn existing_book(&self, provider_id: Uuid) -> Option<Arc<Mutex<ProviderBook>>> {
        self.books.read().await.get(&provider_id).cloned()
    }
}

#[async_trait]
impl ProviderStore for MemoryStore {
    async fn upsert_provider(&self, provider: Provider) -> EngineResult<Provider> {
        let book = self.book(provider.id).await;
        book.lock().await.profile = Some(provider.clone());
        Ok(provider)
    }

    async fn get_provider(&self, provider_id: Uuid) -> EngineResult<Option<Provider>> {
        Ok(match self.existing_book(provider_id).await {
            Some(book) => book.lock().await.profile.clone(),
            None => None,
        })
    }
}

#[async_trait]
impl BaseScheduleStore for MemoryStore {
    async fn replace_week(&self, schedule: WeeklySchedule) -> EngineResult<()> {
        let book = self.book(schedule.provider_id).await;
        book.lock().await.week = schedule.days;
        Ok(())
    }

    async fn get_week(&self, provider_id: Uuid) -> EngineResult<WeeklySchedule> {
        let days = match self.existing_book(provider_id).await {
            Some(book) => book.lock().await.week.clone(),
            None => BTreeMap::new(),
        };
        Ok(WeeklySchedule { provider_id, days })
    }

    async fn delete_week(&self, provider_id: Uuid) -> EngineResult<()> {
        if let Some(book) = self.existing_book(provider_id).await {
            book.lock().await.week.clear();
        }
        Ok(())
    }
}

#[async_trait]
impl OverrideStore for MemoryStore {
    async fn upsert_override(&self, day: OverrideDay) -> EngineResult<()> {
        let book = self.book(day.provider_id).await;
        book.lock()
            .await
            .overrides
            .insert((day.week_start_date, day.day_of_week), day);
        Ok(())
    }

    async fn overrides_in_range(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<Vec<OverrideDay>> {
        let Some(book) = self.existing_book(provider_id).await else {
            return Ok(Vec::new());
        };

        let mut days: Vec<OverrideDay> = book
            .lock()
            .await
            .overrides
            .values()
            .filter(|day| range.contains(day.date))
            .cloned()
            .collect();
        days.sort_by_key(|day| day.date);
        Ok(days)
    }

    async fn delete_override(
        &self,
        provider_id: Uuid,
        week_start_date: NaiveDate,
        day_of_week: DayOfWeek,
    ) -> EngineResult<()> {
        if let Some(book) = self.existing_book(provider_id).await {
            book.lock().await.overrides.remove(&(week_start_date, day_of_week));
        }
        Ok(())
    }
}

#[async_trait]
impl OccupancyStore for MemoryStore {
    async fn insert_occupancies(
        &self,
        provider_id: Uuid,
        batch: Vec<OccupancyInterval>,
    ) -> EngineResult<()> {
        let book = self.book(provider_id).await;
        let mut book = book.lock().await;

        check_occupancy_conflicts(&book.occupancy, &batch)?;
        book.occupancy.extend(batch);

        tracing::debug!(
            "Occupancy committed: provider_id={}, total={}",
            provider_id,
            book.occupancy.len()
        );
        Ok(())
    }

    async fn occupancy_in_range(
        &self,
        provider_id: Uuid,
        range: DateRange,
    ) -> EngineResult<Vec<OccupancyInterval>> {
        let Some(book) = self.existing_book(provider_id).await else {
            return Ok(Vec::new());
        };

        let mut intervals: Vec<OccupancyInterval> = book
            .lock()
            .await
            .occupancy
            .iter()
            .filter(|o| range.contains(o.date))
            .cloned()
            .collect();
        intervals.sort_by_key(|o| (o.date, o.start));
        Ok(intervals)
    }

    async fn booking_providers(&self, source_booking_id: Uuid) -> EngineResult<Vec<Uuid>> {
        let books: Vec<(Uuid, Arc<Mutex<ProviderBook>>)> = self
            .books
            .read()
            .await
            .iter()
            .map(|(id, book)| (*id, book.clone()))
            .collect();

        let mut providers = Vec::new();
        for (provider_id, book) in books {
            let book = book.lock().await;
            if book.occupancy.iter().any(|o| o.source_booking_id == source_booking_id) {
                providers.push(provider_id);
            }
        }
        providers.sort();
        Ok(providers)
    }

    async fn remove_provider_booking(
        &self,
        provider_id: Uuid,
        source_booking_id: Uuid,
    ) -> EngineResult<Vec<OccupancyInterval>> {
        let Some(book) = self.existing_book(provider_id).await else {
            return Ok(Vec::new());
        };

        let mut book = book.lock().await;
        let (removed, kept) = std::mem::take(&mut book.occupancy)
            .into_iter()
            .partition(|o| o.source_booking_id == source_booking_id);
        book.occupancy = kept;
        Ok(removed)
    }
}
