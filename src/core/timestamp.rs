use std::fmt::{Display, Formatter};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike};

/// Local wall-clock time at minute resolution.
///
/// This is the key both series are joined on. Seconds and below are dropped,
/// the offset is not kept: two timestamps are equal when a wall clock in the
/// household would show the same minute.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LocalTimestamp(NaiveDateTime);

impl LocalTimestamp {
    pub fn from_wall_clock(wall_clock: NaiveDateTime) -> Self {
        let truncated = wall_clock
            .with_second(0)
            .and_then(|wall_clock| wall_clock.with_nanosecond(0))
            .unwrap_or(wall_clock);
        Self(truncated)
    }

    /// Keep the wall clock the instant was expressed in, without converting it anywhere.
    pub fn strip_offset<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::from_wall_clock(instant.naive_local())
    }

    pub fn date(self) -> NaiveDate {
        self.0.date()
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    /// `YYYY-MM-DD`.
    pub fn date_string(self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// `HH:MM`.
    pub fn time_string(self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl Display for LocalTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}
