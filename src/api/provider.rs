use crate::{
    api::octopus::{ConsumptionInterval, PriceInterval},
    core::zone::DailyWindow,
};

/// Source of the two half-hourly series for one local day.
pub trait UsageProvider {
    fn get_unit_rates(&self, window: &DailyWindow) -> Result<Vec<PriceInterval>, FetchError>;

    fn get_consumption(
        &self,
        window: &DailyWindow,
    ) -> Result<Vec<ConsumptionInterval>, FetchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The endpoint answered but has nothing for the window yet.
    #[error("no {0} published yet")]
    NotPublished(&'static str),

    #[error("the server responded with HTTP {0}")]
    Status(u16),

    #[error("failed to decode the response")]
    Decode(#[source] ureq::Error),

    #[error("failed to reach the server")]
    Transport(#[source] ureq::Error),
}

impl From<ureq::Error> for FetchError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::StatusCode(status) => Self::Status(status),
            ureq::Error::Json(_) => Self::Decode(error),
            _ => Self::Transport(error),
        }
    }
}

impl FetchError {
    /// Whether invoking again later may succeed.
    ///
    /// Client errors mean the request itself is wrong: bad API key, tariff or meter.
    /// Rate limiting is the exception.
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Status(400..=428 | 430..=499))
    }
}
