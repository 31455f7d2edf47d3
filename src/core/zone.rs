//! Conversions between UTC and the household's civil time.

use chrono::{DateTime, Days, MappedLocalTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::{core::timestamp::LocalTimestamp, prelude::*};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Zone(Tz);

impl Default for Zone {
    fn default() -> Self {
        Self(Tz::Europe__London)
    }
}

impl Zone {
    pub const fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// UTC instant of the local midnight starting `date + day_offset`.
    ///
    /// The offset in force at that midnight is used, so the result moves by an hour
    /// across daylight-saving transitions.
    pub fn local_midnight_utc(self, date: NaiveDate, day_offset: u64) -> Result<DateTime<Utc>> {
        let date = date
            .checked_add_days(Days::new(day_offset))
            .with_context(|| format!("`{date}` + {day_offset} days is out of range"))?;
        match self.0.from_local_datetime(&date.and_time(NaiveTime::MIN)) {
            MappedLocalTime::Single(midnight) | MappedLocalTime::Ambiguous(midnight, _) => {
                Ok(midnight.with_timezone(&Utc))
            }
            MappedLocalTime::None => bail!("midnight of `{date}` does not exist in {}", self.0),
        }
    }

    pub fn utc_to_local(self, instant: DateTime<Utc>) -> LocalTimestamp {
        LocalTimestamp::from_wall_clock(instant.with_timezone(&self.0).naive_local())
    }

    pub fn now(self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.0).naive_local()
    }
}

/// ISO-8601 with the `Z` designator, as the provider expects it in `period_from` and `period_to`.
pub fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// One local civil day expressed as a half-open UTC range.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DailyWindow {
    pub date: NaiveDate,

    /// Inclusive.
    pub from: DateTime<Utc>,

    /// Exclusive.
    pub to: DateTime<Utc>,
}

impl DailyWindow {
    pub fn try_new(date: NaiveDate, zone: Zone) -> Result<Self> {
        Ok(Self { date, from: zone.local_midnight_utc(date, 0)?, to: zone.local_midnight_utc(date, 1)? })
    }

    pub fn period_from(&self) -> String {
        format_utc(self.from)
    }

    pub fn period_to(&self) -> String {
        format_utc(self.to)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_summer_midnight() -> Result {
        let window = DailyWindow::try_new(date(2025, 8, 17), Zone::default())?;
        assert_eq!(window.period_from(), "2025-08-16T23:00:00Z");
        assert_eq!(window.period_to(), "2025-08-17T23:00:00Z");
        Ok(())
    }

    #[test]
    fn test_winter_midnight() -> Result {
        let window = DailyWindow::try_new(date(2025, 1, 15), Zone::default())?;
        assert_eq!(window.period_from(), "2025-01-15T00:00:00Z");
        assert_eq!(window.period_to(), "2025-01-16T00:00:00Z");
        Ok(())
    }

    #[test]
    fn test_spring_forward_day_is_short() -> Result {
        let window = DailyWindow::try_new(date(2025, 3, 30), Zone::default())?;
        assert_eq!(window.period_from(), "2025-03-30T00:00:00Z");
        assert_eq!(window.period_to(), "2025-03-30T23:00:00Z");
        assert_eq!(window.to - window.from, TimeDelta::hours(23));
        Ok(())
    }

    #[test]
    fn test_fall_back_day_is_long() -> Result {
        let window = DailyWindow::try_new(date(2025, 10, 26), Zone::default())?;
        assert_eq!(window.period_from(), "2025-10-25T23:00:00Z");
        assert_eq!(window.period_to(), "2025-10-27T00:00:00Z");
        assert_eq!(window.to - window.from, TimeDelta::hours(25));
        Ok(())
    }

    #[test]
    fn test_round_trip_across_transitions() -> Result {
        let zone = Zone::default();
        for on in [date(2025, 3, 30), date(2025, 3, 31), date(2025, 10, 26), date(2025, 10, 27)] {
            let midnight = zone.local_midnight_utc(on, 0)?;
            assert_eq!(zone.utc_to_local(midnight).to_string(), format!("{on} 00:00"));
        }
        Ok(())
    }

    #[test]
    fn test_utc_to_local() -> Result {
        let instant = DateTime::parse_from_rfc3339("2025-08-17T01:00:00Z")?.with_timezone(&Utc);
        assert_eq!(Zone::default().utc_to_local(instant).to_string(), "2025-08-17 02:00");
        Ok(())
    }
}
