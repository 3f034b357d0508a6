use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::{DayOfWeek, WallTime};

/// One wall-clock slot inside a base or override day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: WallTime,
    pub end: WallTime,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl TimeSlot {
    pub fn available(start: WallTime, end: WallTime) -> Self {
        Self { start, end, is_available: true }
    }

    pub fn closed(start: WallTime, end: WallTime) -> Self {
        Self { start, end, is_available: false }
    }
}

/// Flat row form of a base slot, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBaseSlot {
    pub provider_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start: WallTime,
    pub end: WallTime,
    pub is_available: bool,
}

impl From<&WeeklyBaseSlot> for TimeSlot {
    fn from(slot: &WeeklyBaseSlot) -> Self {
        TimeSlot {
            start: slot.start,
            end: slot.end,
            is_available: slot.is_available,
        }
    }
}

/// A provider's recurring week. Days without slots are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub provider_id: Uuid,
    pub days: BTreeMap<DayOfWeek, Vec<TimeSlot>>,
}

impl WeeklySchedule {
    pub fn empty(provider_id: Uuid) -> Self {
        Self {
            provider_id,
            days: BTreeMap::new(),
        }
    }

    pub fn from_rows(provider_id: Uuid, rows: &[WeeklyBaseSlot]) -> Self {
        let mut days: BTreeMap<DayOfWeek, Vec<TimeSlot>> = BTreeMap::new();
        for row in rows {
            days.entry(row.day_of_week).or_default().push(row.into());
        }
        for slots in days.values_mut() {
            slots.sort_by_key(|slot| slot.start);
        }
        Self { provider_id, days }
    }

    pub fn slots_for(&self, day: DayOfWeek) -> &[TimeSlot] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }

    pub fn to_rows(&self) -> Vec<WeeklyBaseSlot> {
        self.days
            .iter()
            .flat_map(|(day, slots)| {
                slots.iter().map(move |slot| WeeklyBaseSlot {
                    provider_id: self.provider_id,
                    day_of_week: *day,
                    start: slot.start,
                    end: slot.end,
                    is_available: slot.is_available,
                })
            })
            .collect()
    }
}

/// Date-specific exception that fully replaces the base slots for one day.
///
/// An empty `slots` list marks the day explicitly unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideDay {
    pub provider_id: Uuid,
    pub week_start_date: NaiveDate,
    pub day_of_week: DayOfWeek,
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetBaseWeekRequest {
    #[serde(default)]
    pub days: BTreeMap<DayOfWeek, Vec<TimeSlot>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetOverrideRequest {
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}
