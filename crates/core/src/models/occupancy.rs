use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time::WallTime;

/// A committed booking blocking part of a provider's local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyInterval {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub start: WallTime,
    pub end: WallTime,
    pub source_booking_id: Uuid,
}

impl OccupancyInterval {
    /// Half-open overlap on the same date; touching intervals do not overlap.
    pub fn overlaps(&self, other: &OccupancyInterval) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOccupancy {
    pub date: NaiveDate,
    pub start: WallTime,
    pub end: WallTime,
    #[serde(alias = "booking_id")]
    pub source_booking_id: Uuid,
}

impl NewOccupancy {
    pub fn for_provider(&self, provider_id: Uuid) -> OccupancyInterval {
        OccupancyInterval {
            provider_id,
            date: self.date,
            start: self.start,
            end: self.end,
            source_booking_id: self.source_booking_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkOccupancyRequest {
    pub intervals: Vec<NewOccupancy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyAccepted {
    pub provider_id: Uuid,
    pub accepted: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupancyRemoved {
    pub source_booking_id: Uuid,
    pub removed: usize,
}
