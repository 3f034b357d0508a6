//! mockall doubles for the store traits, for exercising failure paths that
//! the in-memory store never produces.

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::mock;
use slotkeeper_core::{
    errors::EngineResult,
    models::{
        occupancy::OccupancyInterval,
        provider::Provider,
        schedule::{OverrideDay, WeeklySchedule},
        time::{DateRange, DayOfWeek},
    },
    store::{BaseScheduleStore, OccupancyStore, OverrideStore, ProviderStore},
};
use uuid::Uuid;

mock! {
    pub Store {}

    #[async_trait]
    impl ProviderStore for Store {
        async fn upsert_provider(&self, provider: Provider) -> EngineResult<Provider>;

        async fn get_provider(&self, provider_id: Uuid) -> EngineResult<Option<Provider>>;
    }

    #[async_trait]
    impl BaseScheduleStore for Store {
        async fn replace_week(&self, schedule: WeeklySchedule) -> EngineResult<()>;

        async fn get_week(&self, provider_id: Uuid) -> EngineResult<WeeklySchedule>;

        async fn delete_week(&self, provider_id: Uuid) -> EngineResult<()>;
    }

    #[async_trait]
    impl OverrideStore for Store {
        async fn upsert_override(&self, day: OverrideDay) -> EngineResult<()>;

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
    impl OccupancyStore for Store {
        async fn insert_occupancies(
            &self,
            provider_id: Uuid,
            batch: Vec<OccupancyInterval>,
        ) -> EngineResult<()>;

        async fn occupancy_in_range(
            &self,
            provider_id: Uuid,
            range: DateRange,
        ) -> EngineResult<Vec<OccupancyInterval>>;

        async fn booking_providers(&self, source_booking_id: Uuid) -> EngineResult<Vec<Uuid>>;
        async fn remove_provider_booking(
            &self,
            provider_id: Uuid,
            source_booking_id: Uuid,
        ) -> EngineResult<Vec<OccupancyInterval>>;
    }
}
