use std::{fs::OpenOptions, path::PathBuf};

use csv::{ReaderBuilder, WriterBuilder};

use crate::{
    prelude::*,
    store::{Row, UsageStore},
};

/// Headerless CSV file, one row per slot.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl UsageStore for CsvStore {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn rows(&self) -> Result<Vec<Vec<String>>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("failed to open `{}`", self.path.display()))?;
        let rows = reader
            .records()
            .map(|record| Ok(record?.iter().map(str::to_owned).collect()))
            .collect::<Result<Vec<Vec<String>>>>()
            .with_context(|| format!("failed to read `{}`", self.path.display()))?;
        debug!(n_rows = rows.len(), "read");
        Ok(rows)
    }

    #[instrument(skip_all, fields(path = %self.path.display(), n_rows = rows.len()))]
    fn append(&self, rows: &[Row]) -> Result {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open `{}` for appending", self.path.display()))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        for row in rows {
            writer.write_record(row.cells())?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        core::{timestamp::LocalTimestamp, usage::UsageRecord},
        quantity::{energy::KilowattHours, rate::PencePerKilowattHour},
        store::persist,
    };

    fn record_at(hour: u32, minute: u32) -> UsageRecord {
        let wall_clock =
            NaiveDate::from_ymd_opt(2025, 3, 30).unwrap().and_hms_opt(hour, minute, 0).unwrap();
        UsageRecord {
            start: LocalTimestamp::from_wall_clock(wall_clock),
            consumed: KilowattHours::from(0.125),
            price: PencePerKilowattHour::from(8.4),
        }
    }

    #[test]
    fn test_missing_file_has_no_rows() -> Result {
        let directory = tempfile::tempdir()?;
        assert!(CsvStore::new(directory.path().join("usage.csv")).rows()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_append_and_read_back() -> Result {
        let directory = tempfile::tempdir()?;
        let store = CsvStore::new(directory.path().join("usage.csv"));
        let updated_at = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap().and_hms_opt(8, 0, 0).unwrap();

        assert_eq!(persist(&store, &[record_at(0, 0), record_at(0, 30)], updated_at)?, 2);
        assert_eq!(persist(&store, &[record_at(0, 30), record_at(1, 0)], updated_at)?, 1);

        let rows = store.rows()?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][3..6], ["2025-03-30", "01", "00"]);
        assert_eq!(rows[2][8], "2025-03-31 08:00:00");
        Ok(())
    }
}
