//! Joining the unit rates with the meter readings.
//!
//! Octopus publishes unit rates in UTC and consumption in local civil time with an embedded
//! offset. The join brings both to the local wall clock: consumption by dropping its offset,
//! rates by converting through the household's zone.

use chrono::Utc;
use itertools::Itertools;

use crate::{
    api::octopus::{ConsumptionInterval, PriceInterval},
    core::{timestamp::LocalTimestamp, usage::UsageRecord, zone::Zone},
    prelude::*,
};

#[must_use]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciliation {
    /// Every consumption slot that found its rate, in the consumption order.
    pub usage: Vec<UsageRecord>,

    /// Subset of [`Reconciliation::usage`] which starts overnight.
    pub overnight: Vec<UsageRecord>,
}

#[instrument(skip_all, fields(n_rates = rates.len(), n_readings = consumption.len()))]
pub fn reconcile(
    zone: Zone,
    rates: &[PriceInterval],
    consumption: &[ConsumptionInterval],
) -> Reconciliation {
    let keyed_rates =
        rates.iter().map(|rate| (zone.utc_to_local(rate.valid_from), rate)).collect_vec();

    let mut reconciliation = Reconciliation::default();
    for reading in consumption {
        let start = LocalTimestamp::strip_offset(&reading.interval_start);
        let Some(rate) = find_rate(&keyed_rates, start, reading) else {
            trace!(%start, "no unit rate, skipped");
            continue;
        };
        let record = UsageRecord { start, consumed: reading.consumption, price: rate.value_inc_vat };
        debug!(%start, consumed = %record.consumed, price = %record.price, "matched");
        if record.is_overnight() {
            reconciliation.overnight.push(record);
        }
        reconciliation.usage.push(record);
    }

    info!(
        n_usage = reconciliation.usage.len(),
        n_overnight = reconciliation.overnight.len(),
        "reconciled",
    );
    reconciliation
}

/// Find the rate whose local start equals the reading's.
///
/// When the clocks go back, two rates share a wall-clock start. Then the one starting
/// at the same instant as the reading wins.
fn find_rate<'a>(
    keyed_rates: &[(LocalTimestamp, &'a PriceInterval)],
    start: LocalTimestamp,
    reading: &ConsumptionInterval,
) -> Option<&'a PriceInterval> {
    let candidates = keyed_rates
        .iter()
        .filter(|(rate_start, _)| *rate_start == start)
        .map(|(_, rate)| *rate)
        .collect_vec();
    match candidates.as_slice() {
        [] => None,
        [rate] => Some(*rate),
        _ => {
            let instant = reading.interval_start.with_timezone(&Utc);
            candidates.iter().copied().find(|rate| rate.valid_from == instant)
        }
    }
}
