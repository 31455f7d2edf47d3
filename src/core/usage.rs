use std::ops::RangeInclusive;

use crate::{
    core::timestamp::LocalTimestamp,
    quantity::{cost::Pence, energy::KilowattHours, rate::PencePerKilowattHour},
};

/// Local start hours that count as overnight.
pub const OVERNIGHT_HOURS: RangeInclusive<u32> = 0..=6;

/// Consumption of one half-hour slot together with the unit rate it was billed at.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UsageRecord {
    /// Local start of the slot.
    pub start: LocalTimestamp,

    pub consumed: KilowattHours,

    /// Unit rate including VAT.
    pub price: PencePerKilowattHour,
}

impl UsageRecord {
    pub fn is_overnight(&self) -> bool {
        OVERNIGHT_HOURS.contains(&self.start.hour())
    }

    pub fn cost(&self) -> Pence {
        self.consumed * self.price
    }

    pub fn year(&self) -> String {
        format!("{:04}", self.start.year())
    }

    pub fn month(&self) -> String {
        format!("{:02}", self.start.month())
    }

    pub fn day(&self) -> String {
        format!("{:02}", self.start.day())
    }

    pub fn date_string(&self) -> String {
        self.start.date_string()
    }

    pub fn hour(&self) -> String {
        format!("{:02}", self.start.hour())
    }

    pub fn minute(&self) -> String {
        format!("{:02}", self.start.minute())
    }
}
