//! [Google Sheets](https://developers.google.com/sheets/api/reference/rest/v4/spreadsheets.values) store.

use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::{
    api::{client, google::Credentials},
    prelude::*,
    store::{Row, UsageStore},
};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

pub struct Api {
    client: Agent,
    base_url: String,
    credentials: Credentials,
    spreadsheet_id: String,
    worksheet: String,
}

impl Api {
    pub fn new(credentials: Credentials, spreadsheet_id: String, worksheet: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, credentials, spreadsheet_id, worksheet)
    }

    pub fn with_base_url(
        base_url: &str,
        credentials: Credentials,
        spreadsheet_id: String,
        worksheet: String,
    ) -> Self {
        Self {
            client: client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
            spreadsheet_id,
            worksheet,
        }
    }

    fn authorization(&self) -> Result<String> {
        Ok(format!("Bearer {}", self.credentials.access_token(&self.client)?))
    }

    /// URL of the ten row columns on the worksheet.
    fn values_url(&self) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(&format!("{}!A:J", self.worksheet)),
        )
    }
}

#[derive(Serialize, Deserialize)]
struct ValueRange {
    /// Omitted by the API when the range is empty.
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl UsageStore for Api {
    #[instrument(skip_all, fields(worksheet = %self.worksheet))]
    fn rows(&self) -> Result<Vec<Vec<String>>> {
        let range = self
            .client
            .get(self.values_url())
            .header("Authorization", self.authorization()?)
            .call()
            .context("failed to get the worksheet values")?
            .body_mut()
            .read_json::<ValueRange>()
            .context("failed to deserialize the worksheet values")?;
        debug!(n_rows = range.values.len(), "read");
        Ok(range.values)
    }

    #[instrument(skip_all, fields(worksheet = %self.worksheet, n_rows = rows.len()))]
    fn append(&self, rows: &[Row]) -> Result {
        let body = ValueRange { values: rows.iter().map(|row| row.cells().to_vec()).collect() };
        self.client
            .post(format!("{}:append", self.values_url()))
            .query("valueInputOption", "USER_ENTERED")
            .query("insertDataOption", "INSERT_ROWS")
            .header("Authorization", self.authorization()?)
            .send_json(&body)
            .context("failed to append the rows")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::{
        api::google::tests::{mock_token_endpoint, test_key},
        core::{timestamp::LocalTimestamp, usage::UsageRecord},
        quantity::{energy::KilowattHours, rate::PencePerKilowattHour},
        store::persist,
    };

    fn api(server: &Server) -> Api {
        Api::with_base_url(
            &server.url(),
            Credentials::AccessToken("ya29.token".to_owned()),
            "sheet-id".to_owned(),
            "octopusIn".to_owned(),
        )
    }

    #[test]
    fn test_rows_of_empty_worksheet() -> Result {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/v4/spreadsheets/sheet-id/values/octopusIn%21A%3AJ")
            .match_header("authorization", "Bearer ya29.token")
            .with_body(r#"{"range": "octopusIn!A1:J1000", "majorDimension": "ROWS"}"#)
            .create();
        assert!(api(&server).rows()?.is_empty());
        mock.assert();
        Ok(())
    }

    #[test]
    fn test_persist_appends_new_rows_only() -> Result {
        let mut server = Server::new();
        let _get = server
            .mock("GET", "/v4/spreadsheets/sheet-id/values/octopusIn%21A%3AJ")
            .with_body(
                r#"{
                    "range": "octopusIn!A1:J1000",
                    "majorDimension": "ROWS",
                    "values": [["2025", "8", "17", "2025-08-17", "2", "0", "0.5", "20", "2025-08-18 09:00:00", "0.1"]]
                }"#,
            )
            .create();
        let append = server
            .mock(
                "POST",
                Matcher::Regex(
                    r"^/v4/spreadsheets/sheet-id/values/octopusIn%21A%3AJ:append\?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS$".into(),
                ),
            )
            .match_header("authorization", "Bearer ya29.token")
            .match_body(Matcher::Json(json!({
                "values": [["2025", "08", "17", "2025-08-17", "02", "30", "0.3", "18", "2025-08-18 09:15:00", "0.0540"]],
            })))
            .with_body("{}")
            .create();

        let records = [(0, 0.5, 20.0), (30, 0.3, 18.0)].map(|(minute, consumed, price)| {
            UsageRecord {
                start: LocalTimestamp::from_wall_clock(
                    NaiveDate::from_ymd_opt(2025, 8, 17).unwrap().and_hms_opt(2, minute, 0).unwrap(),
                ),
                consumed: KilowattHours::from(consumed),
                price: PencePerKilowattHour::from(price),
            }
        });
        let updated_at = NaiveDate::from_ymd_opt(2025, 8, 18).unwrap().and_hms_opt(9, 15, 0).unwrap();
        assert_eq!(persist(&api(&server), &records, updated_at)?, 1);
        append.assert();
        Ok(())
    }

    #[test]
    fn test_service_account_authorizes_both_calls() -> Result {
        let mut server = Server::new();
        let token = mock_token_endpoint(&mut server).expect(1).create();
        let get = server
            .mock("GET", "/v4/spreadsheets/sheet-id/values/octopusIn%21A%3AJ")
            .match_header("authorization", "Bearer ya29.service")
            .with_body("{}")
            .create();
        let append = server
            .mock("POST", Matcher::Regex(r"^/v4/spreadsheets/sheet-id/values/.+:append\?".into()))
            .match_header("authorization", "Bearer ya29.service")
            .with_body("{}")
            .create();
        let api = Api::with_base_url(
            &server.url(),
            Credentials::ServiceAccount(test_key(&server).into()),
            "sheet-id".to_owned(),
            "octopusIn".to_owned(),
        );

        let start = NaiveDate::from_ymd_opt(2025, 8, 17).unwrap().and_hms_opt(1, 0, 0).unwrap();
        let record = UsageRecord {
            start: LocalTimestamp::from_wall_clock(start),
            consumed: KilowattHours::from(0.2),
            price: PencePerKilowattHour::from(10.0),
        };
        assert_eq!(persist(&api, &[record], start)?, 1);
        token.assert();
        get.assert();
        append.assert();
        Ok(())
    }
}
