//! Persisting the joined usage as spreadsheet rows.

pub mod csv;

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;

use crate::{core::usage::UsageRecord, prelude::*};

/// Row-oriented, append-only storage.
pub trait UsageStore {
    /// All rows stored so far, as displayed cell values.
    fn rows(&self) -> Result<Vec<Vec<String>>>;

    /// Append the rows in one batch, keeping their order.
    fn append(&self, rows: &[Row]) -> Result;
}

/// Slot identity used to recognise rows that are already stored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SlotKey {
    date: NaiveDate,
    hour: u32,
    minute: u32,
}

impl SlotKey {
    /// Parse the `date_string`, `hour` and `minute` cells.
    ///
    /// Spreadsheets happily turn `02` into `2`, so the cells are compared as numbers.
    fn from_cells(cells: &[String]) -> Option<Self> {
        let [date, hour, minute] = cells.get(3..6)? else {
            return None;
        };
        Some(Self {
            date: NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?,
            hour: hour.trim().parse().ok()?,
            minute: minute.trim().parse().ok()?,
        })
    }
}

#[must_use]
pub struct Row {
    record: UsageRecord,
    updated_at: NaiveDateTime,
}

impl Row {
    pub const fn new(record: UsageRecord, updated_at: NaiveDateTime) -> Self {
        Self { record, updated_at }
    }

    /// `[year, month, day, date_string, hour, minute, consumed, price, updated_timestamp, cost]`,
    /// cost in pounds.
    pub fn cells(&self) -> [String; 10] {
        [
            self.record.year(),
            self.record.month(),
            self.record.day(),
            self.record.date_string(),
            self.record.hour(),
            self.record.minute(),
            self.record.consumed.0.to_string(),
            self.record.price.0.to_string(),
            self.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.4}", self.record.cost().in_pounds()),
        ]
    }

    fn key(&self) -> SlotKey {
        SlotKey {
            date: self.record.start.date(),
            hour: self.record.start.hour(),
            minute: self.record.start.minute(),
        }
    }
}

/// Append the records which are not stored yet, and return how many were appended.
///
/// When the clocks go back, the repeated hour yields two slots with the same key.
/// So keys are counted: the n-th record with a key is stored when fewer than n rows have it.
#[instrument(skip_all, fields(n_records = records.len()))]
pub fn persist(
    store: &dyn UsageStore,
    records: &[UsageRecord],
    updated_at: NaiveDateTime,
) -> Result<usize> {
    let stored = store.rows()?.iter().filter_map(|cells| SlotKey::from_cells(cells)).counts();
    let mut seen: HashMap<SlotKey, usize> = HashMap::new();
    let rows = records
        .iter()
        .map(|record| Row::new(*record, updated_at))
        .filter(|row| {
            let n_seen = seen.entry(row.key()).or_default();
            *n_seen += 1;
            *n_seen > stored.get(&row.key()).copied().unwrap_or_default()
        })
        .collect_vec();
    let n_skipped = records.len() - rows.len();
    if n_skipped != 0 {
        info!(n_skipped, "already stored, skipped");
    }
    if rows.is_empty() {
        return Ok(0);
    }
    store.append(&rows)?;
    info!(n_appended = rows.len(), "appended");
    Ok(rows.len())
}
