//! [Octopus Energy](https://developer.octopus.energy/rest/) client.

use base64::{Engine, prelude::BASE64_STANDARD};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, de::DeserializeOwned};
use ureq::Agent;

use crate::{
    api::{
        client,
        provider::{FetchError, UsageProvider},
    },
    core::zone::DailyWindow,
    prelude::*,
    quantity::{energy::KilowattHours, rate::PencePerKilowattHour},
};

pub const DEFAULT_BASE_URL: &str = "https://api.octopus.energy";

/// Single-register electricity tariff.
#[derive(Clone, Debug)]
pub struct Tariff {
    /// For example, `AGILE-24-10-01`.
    pub product_code: String,

    /// Grid supply point group letter.
    pub region: String,
}

impl Tariff {
    pub fn code(&self) -> String {
        format!("E-1R-{}-{}", self.product_code, self.region)
    }
}

#[derive(Clone, Debug)]
pub struct Meter {
    pub mpan: String,
    pub serial_number: String,
}

pub struct Api {
    client: Agent,
    base_url: String,
    authorization: String,
    tariff: Tariff,
    meter: Meter,
}

impl Api {
    pub fn new(base_url: &str, api_key: &str, tariff: Tariff, meter: Meter) -> Self {
        Self {
            client: client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            // The key alone is encoded, without the `:` separator of the usual `user:password`.
            authorization: format!("Basic {}", BASE64_STANDARD.encode(api_key)),
            tariff,
            meter,
        }
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(what = what))]
    fn get_results<T: DeserializeOwned>(
        &self,
        url: &str,
        what: &'static str,
    ) -> Result<Vec<T>, FetchError> {
        debug!(url, "requesting…");
        let mut response =
            self.client.get(url).header("Authorization", self.authorization.as_str()).call()?;
        debug!(status = %response.status(), "received");
        let page = response.body_mut().read_json::<Page<T>>()?;
        if page.next.is_some() {
            warn!("the response is paginated, only the first page is used");
        }
        let results = page.results.unwrap_or_default();
        if results.is_empty() {
            return Err(FetchError::NotPublished(what));
        }
        info!(n_results = results.len(), "fetched");
        Ok(results)
    }
}

impl UsageProvider for Api {
    #[instrument(skip_all, fields(date = %window.date, tariff = %self.tariff.code()))]
    fn get_unit_rates(&self, window: &DailyWindow) -> Result<Vec<PriceInterval>, FetchError> {
        let url = format!(
            "{}/v1/products/{}/electricity-tariffs/{}/standard-unit-rates/?period_from={}&period_to={}",
            self.base_url,
            self.tariff.product_code,
            self.tariff.code(),
            window.period_from(),
            window.period_to(),
        );
        self.get_results(&url, "unit rates")
    }

    #[instrument(skip_all, fields(date = %window.date, mpan = %self.meter.mpan))]
    fn get_consumption(
        &self,
        window: &DailyWindow,
    ) -> Result<Vec<ConsumptionInterval>, FetchError> {
        let url = format!(
            "{}/v1/electricity-meter-points/{}/meters/{}/consumption/?period_from={}&period_to={}",
            self.base_url,
            self.meter.mpan,
            self.meter.serial_number,
            window.period_from(),
            window.period_to(),
        );
        self.get_results(&url, "consumption")
    }
}

#[derive(Deserialize)]
struct Page<T> {
    /// Absent while the provider has not published anything for the period.
    results: Option<Vec<T>>,

    next: Option<String>,
}

/// Half-hourly unit rate, in UTC.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct PriceInterval {
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub value_exc_vat: PencePerKilowattHour,
    pub value_inc_vat: PencePerKilowattHour,
}

/// Half-hourly meter reading, in local time with the offset attached.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
pub struct ConsumptionInterval {
    pub interval_start: DateTime<FixedOffset>,
    pub interval_end: DateTime<FixedOffset>,
    pub consumption: KilowattHours,
}
