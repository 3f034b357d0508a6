//! Calendar primitives shared by every schedule layer.
//!
//! Schedules are authored in provider-local wall-clock time. Nothing in this
//! module knows about timezones; conversion to instants happens in the
//! resolver.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{EngineError, EngineResult};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time of day with minute precision.
///
/// Serialized as `"HH:mm"`. `24:00` is accepted so a slot can run to the end
/// of the local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime(u16);

impl WallTime {
    pub const MIDNIGHT: WallTime = WallTime(0);
    pub const END_OF_DAY: WallTime = WallTime(MINUTES_PER_DAY);

    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Local date-time of this wall time on `date`; `24:00` rolls into the next day.
    ///
    /// Saturates at `NaiveDateTime::MAX` on the last representable date.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN)
            .checked_add_signed(Duration::minutes(i64::from(self.0)))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WallTime {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation(format!("Invalid wall time '{}', expected HH:mm", s));

        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u16 = hour.parse().map_err(|_| invalid())?;
        let minute: u16 = minute.parse().map_err(|_| invalid())?;

        WallTime::new(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
        DayOfWeek::Sat,
        DayOfWeek::Sun,
    ];

    /// Days since Monday (`MON` = 0).
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Mon => "MON",
            DayOfWeek::Tue => "TUE",
            DayOfWeek::Wed => "WED",
            DayOfWeek::Thu => "THU",
            DayOfWeek::Fri => "FRI",
            DayOfWeek::Sat => "SAT",
            DayOfWeek::Sun => "SUN",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Mon,
            Weekday::Tue => DayOfWeek::Tue,
            Weekday::Wed => DayOfWeek::Wed,
            Weekday::Thu => DayOfWeek::Thu,
            Weekday::Fri => DayOfWeek::Fri,
            Weekday::Sat => DayOfWeek::Sat,
            Weekday::Sun => DayOfWeek::Sun,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| EngineError::Validation(format!("Invalid day of week '{}'", s)))
    }
}

/// Calendar date of `day` in the week anchored at `week_start`.
///
/// `week_start` must be a Monday.
pub fn date_in_week(week_start: NaiveDate, day: DayOfWeek) -> EngineResult<NaiveDate> {
    if week_start.weekday() != Weekday::Mon {
        return Err(EngineError::Validation(format!(
            "Week start {} is a {}, expected a Monday",
            week_start,
            week_start.weekday()
        )));
    }
    week_start
        .checked_add_days(Days::new(u64::from(day.index())))
        .ok_or_else(|| {
            EngineError::Validation(format!("{} of the week starting {} is out of range", day, week_start))
        })
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> EngineResult<Self> {
        if from > to {
            return Err(EngineError::Validation(format!(
                "Range start {} is after range end {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of calendar days covered, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |date| *date <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("00:00", 0)]
    #[case("09:30", 570)]
    #[case("23:59", 1439)]
    #[case("24:00", 1440)]
    fn parses_wall_times(#[case] raw: &str, #[case] minutes: u16) {
        let parsed: WallTime = raw.parse().unwrap();
        assert_eq!(parsed.minutes(), minutes);
        assert_eq!(parsed.to_string(), raw);
    }

    #[rstest]
    #[case("24:01")]
    #[case("9:00")]
    #[case("09:60")]
    #[case("0900")]
    #[case("ab:cd")]
    fn rejects_malformed_wall_times(#[case] raw: &str) {
        assert!(matches!(raw.parse::<WallTime>(), Err(EngineError::Validation(_))));
    }

    #[test]
    fn end_of_day_rolls_into_next_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let next = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert_eq!(WallTime::END_OF_DAY.on(date), next.and_time(NaiveTime::MIN));
    }

    #[test]
    fn override_dates_are_anchored_on_monday() {
        let monday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            date_in_week(monday, DayOfWeek::Thu).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 13).unwrap()
        );
        assert!(date_in_week(monday.succ_opt().unwrap(), DayOfWeek::Mon).is_err());
    }

    #[test]
    fn last_representable_week_does_not_overflow() {
        let last = NaiveDate::MAX;
        let last_day = DayOfWeek::of(last);
        let last_monday = last
            .checked_sub_days(Days::new(u64::from(last_day.index())))
            .unwrap();
        let past_the_end = DayOfWeek::from_index(last_day.index() + 1).unwrap();

        assert_eq!(date_in_week(last_monday, last_day).unwrap(), last);
        assert!(matches!(
            date_in_week(last_monday, past_the_end),
            Err(EngineError::Validation(_))
        ));
        assert_eq!(WallTime::END_OF_DAY.on(last), NaiveDateTime::MAX);
    }

    #[test]
    fn date_range_iterates_inclusively() {
        let from = NaiveDate::from_ymd_opt(2025, 2, 27).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let range = DateRange::new(from, to).unwrap();
        assert_eq!(range.len_days(), 4);
        assert_eq!(range.dates().count(), 4);
        assert!(DateRange::new(to, from).is_err());
    }
}
