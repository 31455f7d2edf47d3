use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::{
    core::usage::UsageRecord,
    quantity::{cost::Pence, energy::KilowattHours},
};

/// Overnight usage message, one line per slot followed by the totals.
#[must_use]
pub struct Digest<'a> {
    date: NaiveDate,
    records: &'a [UsageRecord],
}

impl<'a> Digest<'a> {
    pub const fn new(date: NaiveDate, records: &'a [UsageRecord]) -> Self {
        Self { date, records }
    }

    pub fn total_consumed(&self) -> KilowattHours {
        self.records.iter().fold(KilowattHours::ZERO, |total, record| total + record.consumed)
    }

    pub fn total_cost(&self) -> Pence {
        self.records.iter().fold(Pence::ZERO, |total, record| total + record.cost())
    }
}

impl Display for Digest<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Overnight usage for {}:", self.date)?;
        for record in self.records {
            writeln!(f, "{} - {} @ {}", record.start.time_string(), record.consumed, record.price)?;
        }
        write!(f, "Consumed: {}\nCost: {}", self.total_consumed(), self.total_cost())
    }
}
