//! Local calendar-day windows.
//!
//! A day is the half-open interval `[local midnight, next local midnight)`
//! expressed as UTC instants. DST transitions are taken as the time zone
//! reports them, so a day may span 23 or 25 hours.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use staffdesk_store::query::format_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayRange {
    /// Inclusive.
    pub start: DateTime<Utc>,
    /// Exclusive.
    pub end: DateTime<Utc>,
}

impl DayRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    pub fn start_iso(&self) -> String {
        format_timestamp(&self.start)
    }

    pub fn end_iso(&self) -> String {
        format_timestamp(&self.end)
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// The local day containing `reference`, shifted by `offset_days`
/// (0 = same day, -1 = the day before).
pub fn local_day_range<Tz: TimeZone>(reference: &DateTime<Tz>, offset_days: i64) -> DayRange {
    let tz = reference.timezone();
    let today = reference.date_naive();
    let day = today
        .checked_add_signed(TimeDelta::days(offset_days))
        .unwrap_or(today);
    let next = day.succ_opt().unwrap_or(day);

    DayRange {
        start: local_midnight(&tz, day),
        end: local_midnight(&tz, next),
    }
}

/// First instant of `date` in `tz`. When midnight falls into a DST gap the
/// clock is advanced to the first local time that exists.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    for shift in 0..=3 {
        let candidate = midnight + TimeDelta::hours(shift);
        if let Some(at) = tz.from_local_datetime(&candidate).earliest() {
            return at.with_timezone(&Utc);
        }
    }
    Utc.from_utc_datetime(&midnight)
}

/// Today and yesterday, resolved once so every query of a render shares the
/// same boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindows {
    pub today: DayRange,
    pub yesterday: DayRange,
}

impl DayWindows {
    pub fn at<Tz: TimeZone>(reference: &DateTime<Tz>) -> Self {
        Self {
            today: local_day_range(reference, 0),
            yesterday: local_day_range(reference, -1),
        }
    }

    /// Reads the system clock in the process time zone.
    pub fn now() -> Self {
        Self::at(&Local::now())
    }

    pub fn range(&self, day: Day) -> DayRange {
        match day {
            Day::Today => self.today,
            Day::Yesterday => self.yesterday,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Day {
    Today,
    Yesterday,
}

impl Day {
    pub fn label(&self) -> &'static str {
        match self {
            Day::Today => "today",
            Day::Yesterday => "yesterday",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use chrono_tz::America::{New_York, Sao_Paulo};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    #[test]
    fn test_local_midnight_in_utc() {
        let reference = ist().with_ymd_and_hms(2025, 3, 4, 14, 0, 0).unwrap();
        let range = local_day_range(&reference, 0);

        assert_eq!(range.start_iso(), "2025-03-03T18:30:00.000Z");
        assert_eq!(range.end_iso(), "2025-03-04T18:30:00.000Z");
        assert!(range.contains(reference.with_timezone(&Utc)));
    }

    #[test]
    fn test_same_day_instants_share_range() {
        let tz = ist();
        let early = tz.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();
        let late = tz.with_ymd_and_hms(2025, 3, 4, 23, 59, 59).unwrap();
        assert_eq!(local_day_range(&early, 0), local_day_range(&late, 0));
    }

    #[test]
    fn test_consecutive_days_are_adjacent() {
        let tz = FixedOffset::west_opt(7 * 3600).unwrap();
        for hour in [0, 6, 12, 23] {
            let reference = tz.with_ymd_and_hms(2024, 12, 31, hour, 15, 0).unwrap();
            let yesterday = local_day_range(&reference, -1);
            let today = local_day_range(&reference, 0);
            let tomorrow = local_day_range(&reference, 1);

            assert_eq!(yesterday.end, today.start);
            assert_eq!(today.end, tomorrow.start);
            assert!(today.contains(reference.with_timezone(&Utc)));
            assert!(!yesterday.contains(reference.with_timezone(&Utc)));
        }
    }

    #[test]
    fn test_midnight_belongs_to_later_day() {
        let tz = ist();
        let midnight = tz.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
        let windows = DayWindows::at(&midnight);

        assert_eq!(windows.today.start, midnight.with_timezone(&Utc));
        assert!(windows.today.contains(midnight.with_timezone(&Utc)));
        assert!(!windows.yesterday.contains(midnight.with_timezone(&Utc)));
        assert_eq!(windows.yesterday.end, windows.today.start);
    }

    #[test]
    fn test_fixed_offset_day_is_24_hours() {
        let reference = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(local_day_range(&reference, 0).duration(), TimeDelta::hours(24));
    }

    #[test]
    fn test_year_boundary() {
        let reference = Utc.with_ymd_and_hms(2025, 1, 1, 3, 0, 0).unwrap();
        let windows = DayWindows::at(&reference);
        assert_eq!(windows.yesterday.start_iso(), "2024-12-31T00:00:00.000Z");
        assert_eq!(windows.range(Day::Today).start_iso(), "2025-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_dst_days_are_23_and_25_hours() {
        let spring = New_York.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        let range = local_day_range(&spring, 0);
        assert_eq!(range.duration(), TimeDelta::hours(23));
        assert_eq!(range.start_iso(), "2025-03-09T05:00:00.000Z");
        assert_eq!(range.end_iso(), "2025-03-10T04:00:00.000Z");

        let fall = New_York.with_ymd_and_hms(2025, 11, 2, 12, 0, 0).unwrap();
        let range = local_day_range(&fall, 0);
        assert_eq!(range.duration(), TimeDelta::hours(25));
        assert_eq!(range.start_iso(), "2025-11-02T04:00:00.000Z");
        assert_eq!(range.end_iso(), "2025-11-03T05:00:00.000Z");
    }

    #[test]
    fn test_missing_midnight_starts_at_first_valid_time() {
        // clocks jumped from 00:00 to 01:00
        let reference = Sao_Paulo.with_ymd_and_hms(2018, 11, 4, 12, 0, 0).unwrap();
        let windows = DayWindows::at(&reference);

        assert_eq!(windows.today.start_iso(), "2018-11-04T03:00:00.000Z");
        assert_eq!(windows.today.end_iso(), "2018-11-05T02:00:00.000Z");
        assert_eq!(windows.yesterday.end, windows.today.start);
        assert!(windows.today.contains(reference.with_timezone(&Utc)));
    }
}
