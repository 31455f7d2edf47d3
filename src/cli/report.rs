use bon::Builder;
use chrono::NaiveDate;

use crate::{
    api::provider::{FetchError, UsageProvider},
    core::{
        reconcile::reconcile,
        zone::{DailyWindow, Zone},
    },
    prelude::*,
    render::Digest,
    sink::Notifier,
    store::{UsageStore, persist},
    tables::build_usage_table,
};

/// How a run ended. Everything but an error from [`Report::run`] exits successfully.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Prices or consumption are not available for the date (yet).
    Unavailable,

    /// No consumption slot matched a unit rate.
    NoOverlap,

    /// Usage is there, but none of it is overnight.
    NothingOvernight,

    Notified { n_overnight: usize },
}

#[derive(Builder)]
pub struct Report<'a> {
    provider: &'a dyn UsageProvider,
    notifier: &'a dyn Notifier,

    #[builder(default)]
    stores: &'a [Box<dyn UsageStore>],

    #[builder(default)]
    zone: Zone,
}

impl Report<'_> {
    #[instrument(skip_all, fields(date = %date))]
    pub fn run(&self, date: NaiveDate) -> Result<Outcome> {
        let window = DailyWindow::try_new(date, self.zone)?;
        info!(from = %window.period_from(), to = %window.period_to(), "fetching…");

        let Some(rates) = accept(self.provider.get_unit_rates(&window)) else {
            return Ok(Outcome::Unavailable);
        };
        let Some(consumption) = accept(self.provider.get_consumption(&window)) else {
            return Ok(Outcome::Unavailable);
        };

        let reconciliation = reconcile(self.zone, &rates, &consumption);
        if reconciliation.usage.is_empty() {
            warn!("no consumption matched a unit rate");
            return Ok(Outcome::NoOverlap);
        }
        println!("{}", build_usage_table(&reconciliation.usage));

        let updated_at = self.zone.now();
        for store in self.stores {
            if let Err(error) = persist(store.as_ref(), &reconciliation.usage, updated_at) {
                error!("failed to store the usage: {error:#}");
            }
        }

        if reconciliation.overnight.is_empty() {
            info!("no overnight usage, nothing to send");
            return Ok(Outcome::NothingOvernight);
        }
        let message = Digest::new(date, &reconciliation.overnight).to_string();
        self.notifier.notify(&date.to_string(), &message)?;
        Ok(Outcome::Notified { n_overnight: reconciliation.overnight.len() })
    }
}

/// Unwrap the fetched series, or log why the run cannot go on.
fn accept<T>(result: Result<T, FetchError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error @ FetchError::NotPublished(_)) => {
            warn!("{error}, try again later");
            None
        }
        Err(error) if error.is_retryable() => {
            error!("{:#}", Error::from(error));
            None
        }
        Err(error) => {
            error!("{:#}, check the configuration", Error::from(error));
            None
        }
    }
}
