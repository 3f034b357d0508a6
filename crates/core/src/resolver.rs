//! # Availability Resolver
//!
//! Pure interval algebra over a snapshot of the three schedule layers. For each
//! calendar date the resolver:
//!
//! 1. Picks the effective slot set: the override for that date if one exists,
//!    otherwise the base slots for the date's weekday.
//! 2. Anchors each wall-clock bound to an instant in the provider's timezone.
//! 3. Drops closed slots.
//! 4. Subtracts every occupancy interval of the date.
//! 5. Merges windows that touch.
//!
//! Time not covered by an available slot is busy and never reported as free.
//! Nothing here performs I/O or can fail.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::availability::ResolvedWindow;
use crate::models::occupancy::OccupancyInterval;
use crate::models::schedule::{OverrideDay, TimeSlot, WeeklySchedule};
use crate::models::time::{DateRange, DayOfWeek, WallTime};

type Span = (DateTime<Utc>, DateTime<Utc>);

/// Longest local gap we walk across when a wall time does not exist. Covers
/// zones that skipped a whole calendar day, such as Pacific/Apia in 2011.
const GAP_SEARCH_MINUTES: i64 = 2 * 24 * 60;

/// The three schedule layers for one provider, read at query time.
#[derive(Debug, Clone, Default)]
pub struct ScheduleSnapshot {
    pub week: WeeklySchedule,
    pub overrides: Vec<OverrideDay>,
    pub occupancy: Vec<OccupancyInterval>,
}

/// Converts a wall time on `date` to an instant in `tz`.
///
/// Wall times inside a spring-forward gap move to the first valid local
/// instant after the gap. Ambiguous fall-back times take the earlier instant.
/// Local times with no valid instant in the following two days, which only
/// happens at the edge of the representable range, are read as UTC.
pub fn to_instant(tz: &Tz, date: NaiveDate, wall: WallTime) -> DateTime<Utc> {
    let local = wall.on(date);
    (0..=GAP_SEARCH_MINUTES)
        .map_while(|shift| local.checked_add_signed(Duration::minutes(shift)))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .map(|instant| instant.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&local))
}

/// Slots in effect on `date`. An override replaces the base day entirely,
/// including when its slot list is empty.
pub fn effective_slots<'a>(
    date: NaiveDate,
    week: &'a WeeklySchedule,
    overrides: &'a [OverrideDay],
) -> &'a [TimeSlot] {
    match overrides.iter().find(|o| o.date == date) {
        Some(day) => &day.slots,
        None => week.slots_for(DayOfWeek::of(date)),
    }
}

/// Free windows for a single date, sorted by start.
pub fn resolve_day(
    date: NaiveDate,
    tz: &Tz,
    slots: &[TimeSlot],
    occupancy: &[OccupancyInterval],
) -> Vec<ResolvedWindow> {
    free_spans(date, tz, slots, occupancy)
        .into_iter()
        .map(|(start, end)| ResolvedWindow {
            date,
            start,
            end,
            is_available: true,
        })
        .collect()
}

/// Free and busy windows for a single date. Together they tile the local day
/// from 00:00 to 24:00 with no gaps or overlaps.
pub fn day_timeline(
    date: NaiveDate,
    tz: &Tz,
    slots: &[TimeSlot],
    occupancy: &[OccupancyInterval],
) -> Vec<ResolvedWindow> {
    let day = (
        to_instant(tz, date, WallTime::MIDNIGHT),
        to_instant(tz, date, WallTime::END_OF_DAY),
    );
    let free = free_spans(date, tz, slots, occupancy);
    let busy = subtract(day, &free);

    let mut timeline: Vec<ResolvedWindow> = free
        .into_iter()
        .map(|span| (span, true))
        .chain(busy.into_iter().map(|span| (span, false)))
        .map(|((start, end), is_available)| ResolvedWindow {
            date,
            start,
            end,
            is_available,
        })
        .collect();
    timeline.sort_by_key(|w| (w.start, w.end));
    timeline
}

/// Free windows for every date in `range`, sorted by start.
pub fn resolve_range(range: DateRange, tz: &Tz, snapshot: &ScheduleSnapshot) -> Vec<ResolvedWindow> {
    let occupancy = occupancy_by_date(&snapshot.occupancy);
    range
        .dates()
        .flat_map(|date| {
            let slots = effective_slots(date, &snapshot.week, &snapshot.overrides);
            resolve_day(date, tz, slots, occupancy.get(&date).map(Vec::as_slice).unwrap_or(&[]))
        })
        .collect()
}

/// Full day timelines for every date in `range`, keyed by date.
pub fn timeline_by_day(
    range: DateRange,
    tz: &Tz,
    snapshot: &ScheduleSnapshot,
) -> BTreeMap<NaiveDate, Vec<ResolvedWindow>> {
    let occupancy = occupancy_by_date(&snapshot.occupancy);
    range
        .dates()
        .map(|date| {
            let slots = effective_slots(date, &snapshot.week, &snapshot.overrides);
            let day_occupancy = occupancy.get(&date).map(Vec::as_slice).unwrap_or(&[]);
            (date, day_timeline(date, tz, slots, day_occupancy))
        })
        .collect()
}

fn occupancy_by_date(occupancy: &[OccupancyInterval]) -> HashMap<NaiveDate, Vec<OccupancyInterval>> {
    let mut by_date: HashMap<NaiveDate, Vec<OccupancyInterval>> = HashMap::new();
    for interval in occupancy {
        by_date.entry(interval.date).or_default().push(interval.clone());
    }
    by_date
}

fn free_spans(
    date: NaiveDate,
    tz: &Tz,
    slots: &[TimeSlot],
    occupancy: &[OccupancyInterval],
) -> Vec<Span> {
    let busy = merge_spans(
        occupancy
            .iter()
            .filter(|o| o.date == date)
            .map(|o| (to_instant(tz, date, o.start), to_instant(tz, date, o.end)))
            .collect(),
    );

    let free = slots
        .iter()
        .filter(|slot| slot.is_available)
        .map(|slot| (to_instant(tz, date, slot.start), to_instant(tz, date, slot.end)))
        .flat_map(|slot| subtract(slot, &busy))
        .collect();

    merge_spans(free)
}

/// Sorts spans and merges the ones that overlap or touch. Empty spans are dropped.
fn merge_spans(mut spans: Vec<Span>) -> Vec<Span> {
    spans.retain(|(start, end)| start < end);
    spans.sort();

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

/// `window` minus every span in `holes`. `holes` must be sorted and merged.
fn subtract(window: Span, holes: &[Span]) -> Vec<Span> {
    let (window_start, window_end) = window;
    let mut remaining = Vec::new();
    let mut cursor = window_start;

    for &(hole_start, hole_end) in holes
        .iter()
        .filter(|(start, end)| *start < window_end && *end > window_start)
    {
        if cursor < hole_start {
            remaining.push((cursor, hole_start));
        }
        cursor = cursor.max(hole_end);
    }

    if cursor < window_end {
        remaining.push((cursor, window_end));
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    #[test]
    fn subtract_splits_around_holes() {
        let holes = vec![(utc(10, 0), utc(11, 0)), (utc(12, 0), utc(18, 0))];
        let remaining = subtract((utc(9, 0), utc(17, 0)), &holes);
        assert_eq!(remaining, vec![(utc(9, 0), utc(10, 0)), (utc(11, 0), utc(12, 0))]);
    }

    #[test]
    fn subtract_ignores_holes_outside_the_window() {
        let holes = vec![(utc(6, 0), utc(8, 0)), (utc(17, 0), utc(19, 0))];
        assert_eq!(subtract((utc(9, 0), utc(17, 0)), &holes), vec![(utc(9, 0), utc(17, 0))]);
    }

    #[test]
    fn merge_joins_touching_spans() {
        let spans = vec![(utc(13, 0), utc(14, 0)), (utc(9, 0), utc(13, 0)), (utc(15, 0), utc(15, 0))];
        assert_eq!(merge_spans(spans), vec![(utc(9, 0), utc(14, 0))]);
    }

    #[test]
    fn gap_times_move_past_spring_forward() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let inside_gap = to_instant(&tz, date, "02:30".parse().unwrap());
        let after_gap = to_instant(&tz, date, "03:00".parse().unwrap());
        assert_eq!(inside_gap, after_gap);
    }

    #[test]
    fn skipped_calendar_days_move_to_the_next_valid_day() {
        // Samoa jumped from 2011-12-29 24:00 (UTC-10) to 2011-12-31 00:00 (UTC+14)
        let tz: Tz = "Pacific/Apia".parse().unwrap();
        let skipped = NaiveDate::from_ymd_opt(2011, 12, 30).unwrap();
        let next = NaiveDate::from_ymd_opt(2011, 12, 31).unwrap();

        let morning = to_instant(&tz, skipped, "09:00".parse().unwrap());

        assert_eq!(morning, to_instant(&tz, next, WallTime::MIDNIGHT));
        assert_eq!(morning.with_timezone(&tz).date_naive(), next);
    }

    #[test]
    fn ambiguous_times_take_the_earlier_instant() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        let instant = to_instant(&tz, date, "01:30".parse().unwrap());
        // 01:30 EDT (UTC-4), not 01:30 EST (UTC-5).
        assert_eq!(instant, Utc.with_ymd_and_hms(2025, 11, 2, 5, 30, 0).unwrap());
    }
}
