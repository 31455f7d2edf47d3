mod report;

use std::path::PathBuf;

use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::Parser;

pub use self::report::{Outcome, Report};
use crate::{
    api::{
        google::{Credentials, ServiceAccountKey},
        octopus,
        sheets,
        telegram,
    },
    core::zone::Zone,
    prelude::*,
    sink::{Console, Notifier},
    store::{UsageStore, csv::CsvStore},
};

/// Report yesterday's overnight electricity usage at Agile prices.
#[derive(Parser)]
#[command(author, version, about)]
#[must_use]
pub struct Args {
    /// Local date to report, for example `2025-08-17`.
    pub date: NaiveDate,

    /// Print the digest instead of sending it, and do not store anything (dry run).
    #[clap(long)]
    pub scout: bool,

    /// Log debug messages.
    #[clap(short, long)]
    pub verbose: bool,

    /// Household time zone.
    #[clap(long, env = "TIMEZONE", default_value = "Europe/London")]
    pub timezone: Tz,

    #[clap(flatten)]
    pub octopus: OctopusArgs,

    #[clap(flatten)]
    pub telegram: TelegramArgs,

    #[clap(flatten)]
    pub store: StoreArgs,
}

impl Args {
    pub const fn zone(&self) -> Zone {
        Zone::new(self.timezone)
    }

    pub const fn log_level(&self) -> Level {
        if self.verbose { Level::DEBUG } else { Level::INFO }
    }
}

#[derive(Parser)]
pub struct OctopusArgs {
    #[clap(long = "octopus-url", env = "OCTOPUS_URL", default_value = octopus::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Agile product code, for example `AGILE-24-10-01`.
    #[clap(long = "octopus-tariff", env = "OCTOPUS_TARIFF")]
    pub product_code: String,

    /// Grid supply point group letter.
    #[clap(long = "octopus-region", env = "OCTOPUS_REGION", default_value = "A")]
    pub region: String,

    #[clap(long = "octopus-api-key", env = "OCTOPUS_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Meter point administration number.
    #[clap(long = "octopus-mpan", env = "OCTOPUS_MPAN")]
    pub mpan: String,

    /// Meter serial number.
    #[clap(long = "octopus-serial-number", env = "OCTOPUS_SN")]
    pub serial_number: String,
}

impl OctopusArgs {
    pub fn new_client(&self) -> octopus::Api {
        octopus::Api::new(
            &self.base_url,
            &self.api_key,
            octopus::Tariff { product_code: self.product_code.clone(), region: self.region.clone() },
            octopus::Meter { mpan: self.mpan.clone(), serial_number: self.serial_number.clone() },
        )
    }
}

#[derive(Parser)]
pub struct TelegramArgs {
    #[clap(
        long = "telegram-bot-token",
        env = "TELEGRAM_BOT_TOKEN",
        hide_env_values = true,
        required_unless_present = "scout"
    )]
    pub bot_token: Option<String>,

    #[clap(long = "telegram-chat-id", env = "TELEGRAM_CHAT_ID", required_unless_present = "scout")]
    pub chat_id: Option<String>,
}

impl TelegramArgs {
    pub fn new_notifier(&self, scout: bool) -> Result<Box<dyn Notifier>> {
        if scout {
            return Ok(Box::new(Console));
        }
        let bot_token = self.bot_token.clone().context("Telegram bot token is not set")?;
        let chat_id = self.chat_id.clone().context("Telegram chat ID is not set")?;
        Ok(Box::new(telegram::Api::new(bot_token, chat_id)))
    }
}

#[derive(Parser)]
pub struct StoreArgs {
    /// Append the usage rows to this CSV file.
    #[clap(long = "usage-csv-path", env = "USAGE_CSV_PATH")]
    pub csv_path: Option<PathBuf>,

    /// Append the usage rows to this Google spreadsheet.
    #[clap(long = "google-sheet-id", env = "GOOGLE_SHEET_ID")]
    pub google_sheet_id: Option<String>,

    /// Service account JSON key, the spreadsheet must be shared with the account.
    #[clap(long = "google-credentials-file", env = "GOOGLE_CREDENTIALS_FILE")]
    pub google_credentials_file: Option<PathBuf>,

    /// Short-lived OAuth access token with the spreadsheets scope.
    #[clap(
        long = "google-access-token",
        env = "GOOGLE_ACCESS_TOKEN",
        hide_env_values = true,
        conflicts_with = "google_credentials_file"
    )]
    pub google_access_token: Option<String>,

    #[clap(long = "google-worksheet", env = "GOOGLE_WORKSHEET", default_value = "octopusIn")]
    pub google_worksheet: String,
}

impl StoreArgs {
    /// Configured stores, in the order they are written.
    pub fn new_stores(&self) -> Result<Vec<Box<dyn UsageStore>>> {
        let mut stores: Vec<Box<dyn UsageStore>> = Vec::new();
        if let Some(path) = &self.csv_path {
            stores.push(Box::new(CsvStore::new(path)));
        }
        if let Some(spreadsheet_id) = &self.google_sheet_id {
            stores.push(Box::new(sheets::Api::new(
                self.google_credentials()?,
                spreadsheet_id.clone(),
                self.google_worksheet.clone(),
            )));
        }
        Ok(stores)
    }

    fn google_credentials(&self) -> Result<Credentials> {
        if let Some(path) = &self.google_credentials_file {
            Ok(Credentials::ServiceAccount(ServiceAccountKey::from_file(path)?.into()))
        } else if let Some(access_token) = &self.google_access_token {
            Ok(Credentials::AccessToken(access_token.clone()))
        } else {
            bail!("Google spreadsheet is set, but neither a credentials file nor an access token is")
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, error::ErrorKind};

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_scout_needs_no_telegram() -> Result {
        let args = Args::try_parse_from([
            "octonight",
            "2025-08-17",
            "--scout",
            "--octopus-tariff=AGILE-24-10-01",
            "--octopus-api-key=sk_test",
            "--octopus-mpan=1000000000000",
            "--octopus-serial-number=21E0000000",
        ])?;
        assert!(args.scout);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2025, 8, 17).unwrap());
        assert_eq!(args.octopus.region, "A");
        assert_eq!(args.store.google_worksheet, "octopusIn");
        assert_eq!(args.log_level(), Level::INFO);
        Ok(())
    }

    #[test]
    fn test_missing_date() {
        let error = Args::try_parse_from([
            "octonight",
            "--scout",
            "--octopus-tariff=AGILE-24-10-01",
            "--octopus-api-key=sk_test",
            "--octopus-mpan=1000000000000",
            "--octopus-serial-number=21E0000000",
        ])
        .err()
        .unwrap();
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unparsable_date() {
        let error = Args::try_parse_from([
            "octonight",
            "2025-13-40",
            "--scout",
            "--octopus-tariff=AGILE-24-10-01",
            "--octopus-api-key=sk_test",
            "--octopus-mpan=1000000000000",
            "--octopus-serial-number=21E0000000",
        ])
        .err()
        .unwrap();
        assert_eq!(error.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_sheet_without_credentials() -> Result {
        let args = Args::try_parse_from([
            "octonight",
            "2025-08-17",
            "--scout",
            "--octopus-tariff=AGILE-24-10-01",
            "--octopus-api-key=sk_test",
            "--octopus-mpan=1000000000000",
            "--octopus-serial-number=21E0000000",
            "--google-sheet-id=sheet-id",
        ])?;
        assert!(args.store.new_stores().is_err());
        Ok(())
    }

    #[test]
    fn test_telegram_required_without_scout() {
        assert!(
            Args::try_parse_from([
                "octonight",
                "2025-08-17",
                "--octopus-tariff=AGILE-24-10-01",
                "--octopus-api-key=sk_test",
                "--octopus-mpan=1000000000000",
                "--octopus-serial-number=21E0000000",
            ])
            .is_err()
        );
    }
}
