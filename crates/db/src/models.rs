use chrono::{DateTime, NaiveDate, Utc};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use slotkeeper_core::models::{
    occupancy::OccupancyInterval,
    provider::Provider,
    schedule::{TimeSlot, WeeklyBaseSlot},
    time::{DayOfWeek, WallTime},
};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProvider {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub display_name: Option<String>,
    pub timezone: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBaseSlot {
    pub provider_id: Uuid,
    pub day_of_week: i16,
    pub start_minute: i16,
    pub end_minute: i16,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOverrideDay {
    pub provider_id: Uuid,
    pub week_start_date: NaiveDate,
    pub day_of_week: i16,
    pub override_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOverrideSlot {
    pub provider_id: Uuid,
    pub override_date: NaiveDate,
    pub start_minute: i16,
    pub end_minute: i16,
    pub is_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbOccupancy {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub occupancy_date: NaiveDate,
    pub start_minute: i16,
    pub end_minute: i16,
    pub source_booking_id: Uuid,
    pub created_at: DateTime<Utc>,
}

pub fn day_from_db(value: i16) -> Result<DayOfWeek> {
    u8::try_from(value)
        .ok()
        .and_then(DayOfWeek::from_index)
        .ok_or_else(|| eyre!("Invalid stored day_of_week: {}", value))
}

pub fn day_to_db(day: DayOfWeek) -> i16 {
    i16::from(day.index())
}

pub fn wall_time_from_db(value: i16) -> Result<WallTime> {
    u16::try_from(value)
        .ok()
        .and_then(WallTime::from_minutes)
        .ok_or_else(|| eyre!("Invalid stored minute of day: {}", value))
}

pub fn wall_time_to_db(time: WallTime) -> i16 {
    // At most 1440, always fits.
    time.minutes() as i16
}

impl From<DbProvider> for Provider {
    fn from(row: DbProvider) -> Self {
        Provider {
            id: row.id,
            organization_id: row.organization_id,
            display_name: row.display_name,
            timezone: row.timezone,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<DbBaseSlot> for WeeklyBaseSlot {
    type Error = eyre::Report;

    fn try_from(row: DbBaseSlot) -> Result<Self> {
        Ok(WeeklyBaseSlot {
            provider_id: row.provider_id,
            day_of_week: day_from_db(row.day_of_week)?,
            start: wall_time_from_db(row.start_minute)?,
            end: wall_time_from_db(row.end_minute)?,
            is_available: row.is_available,
        })
    }
}

impl TryFrom<&DbOverrideSlot> for TimeSlot {
    type Error = eyre::Report;

    fn try_from(row: &DbOverrideSlot) -> Result<Self> {
        Ok(TimeSlot {
            start: wall_time_from_db(row.start_minute)?,
            end: wall_time_from_db(row.end_minute)?,
            is_available: row.is_available,
        })
    }
}

impl TryFrom<DbOccupancy> for OccupancyInterval {
    type Error = eyre::Report;

    fn try_from(row: DbOccupancy) -> Result<Self> {
        Ok(OccupancyInterval {
            provider_id: row.provider_id,
            date: row.occupancy_date,
            start: wall_time_from_db(row.start_minute)?,
            end: wall_time_from_db(row.end_minute)?,
            source_booking_id: row.source_booking_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DayOfWeek::Mon, 0)]
    #[case(DayOfWeek::Sun, 6)]
    fn days_map_to_monday_based_indexes(#[case] day: DayOfWeek, #[case] stored: i16) {
        assert_eq!(day_to_db(day), stored);
        assert_eq!(day_from_db(stored).unwrap(), day);
    }

    #[test]
    fn corrupt_rows_are_reported() {
        assert!(day_from_db(7).is_err());
        assert!(day_from_db(-1).is_err());
        assert!(wall_time_from_db(1441).is_err());
        assert_eq!(wall_time_from_db(1440).unwrap(), WallTime::END_OF_DAY);
    }
}
