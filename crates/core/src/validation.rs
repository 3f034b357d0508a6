//! Write-boundary checks. Everything here runs before a store is touched, so a
//! rejected write is never partially applied.

use std::collections::BTreeMap;

use crate::errors::{EngineError, EngineResult};
use crate::models::occupancy::OccupancyInterval;
use crate::models::schedule::TimeSlot;
use crate::models::time::{DateRange, DayOfWeek};

/// Sorts a day's slots by start and rejects inverted bounds or overlaps.
///
/// Adjacent slots (one ends where the next starts) are accepted.
pub fn normalize_day_slots(mut slots: Vec<TimeSlot>) -> EngineResult<Vec<TimeSlot>> {
    for slot in &slots {
        if slot.start >= slot.end {
            return Err(EngineError::Validation(format!(
                "Slot {}-{} must start before it ends",
                slot.start, slot.end
            )));
        }
    }

    slots.sort_by_key(|slot| (slot.start, slot.end));

    for pair in slots.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(EngineError::Validation(format!(
                "Slot {}-{} overlaps slot {}-{}",
                pair[1].start, pair[1].end, pair[0].start, pair[0].end
            )));
        }
    }

    Ok(slots)
}

/// Validates every day of a weekly slot set; empty days are dropped.
pub fn normalize_week(
    days: BTreeMap<DayOfWeek, Vec<TimeSlot>>,
) -> EngineResult<BTreeMap<DayOfWeek, Vec<TimeSlot>>> {
    let mut normalized = BTreeMap::new();
    for (day, slots) in days {
        if slots.is_empty() {
            continue;
        }
        let slots = normalize_day_slots(slots)
            .map_err(|e| EngineError::Validation(format!("{}: {}", day, message(e))))?;
        normalized.insert(day, slots);
    }
    Ok(normalized)
}

/// Checks bounds and in-batch overlap of a set of new occupancy intervals.
pub fn validate_occupancy_batch(batch: &[OccupancyInterval]) -> EngineResult<()> {
    if batch.is_empty() {
        return Err(EngineError::Validation(
            "At least one occupancy interval must be provided".to_string(),
        ));
    }

    for interval in batch {
        if interval.start >= interval.end {
            return Err(EngineError::Validation(format!(
                "Occupancy {}-{} on {} must start before it ends",
                interval.start, interval.end, interval.date
            )));
        }
    }

    for (i, a) in batch.iter().enumerate() {
        if let Some(b) = batch[i + 1..].iter().find(|b| a.overlaps(b)) {
            return Err(EngineError::Conflict(format!(
                "Booking {} ({} {}-{}) overlaps booking {} in the same batch",
                a.source_booking_id, a.date, a.start, a.end, b.source_booking_id
            )));
        }
    }

    Ok(())
}

/// Rejects the batch if any interval collides with already committed occupancy.
///
/// Stores call this while holding the provider's write lock.
pub fn check_occupancy_conflicts(
    existing: &[OccupancyInterval],
    batch: &[OccupancyInterval],
) -> EngineResult<()> {
    for new in batch {
        if let Some(taken) = existing.iter().find(|taken| taken.overlaps(new)) {
            return Err(EngineError::Conflict(format!(
                "{} {}-{} is already occupied by booking {} ({}-{})",
                new.date, new.start, new.end, taken.source_booking_id, taken.start, taken.end
            )));
        }
    }
    Ok(())
}

pub fn validate_range(range: DateRange, max_days: u32) -> EngineResult<DateRange> {
    if range.len_days() > i64::from(max_days) {
        return Err(EngineError::Validation(format!(
            "Range {} to {} spans {} days, the maximum is {}",
            range.from,
            range.to,
            range.len_days(),
            max_days
        )));
    }
    Ok(range)
}

fn message(err: EngineError) -> String {
    match err {
        EngineError::Validation(msg) => msg,
        other => other.to_string(),
    }
}
