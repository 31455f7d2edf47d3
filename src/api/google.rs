//! [OAuth 2.0 for server-to-server applications](https://developers.google.com/identity/protocols/oauth2/service-account).

use std::{cell::RefCell, fs::File, io::BufReader, path::Path};

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::prelude::*;

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Subset of the JSON key file downloaded from the Cloud console.
#[derive(Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key: String,
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse the service account key `{}`", path.display()))
    }
}

pub enum Credentials {
    /// Pre-issued token, for example from `gcloud auth print-access-token`. Expires in an hour.
    AccessToken(String),

    ServiceAccount(ServiceAccount),
}

impl Credentials {
    pub fn access_token(&self, client: &Agent) -> Result<String> {
        match self {
            Self::AccessToken(access_token) => Ok(access_token.clone()),
            Self::ServiceAccount(service_account) => service_account.access_token(client),
        }
    }
}

pub struct ServiceAccount {
    key: ServiceAccountKey,

    /// Obtained on first use, a run is much shorter than the token lifetime.
    access_token: RefCell<Option<String>>,
}

impl From<ServiceAccountKey> for ServiceAccount {
    fn from(key: ServiceAccountKey) -> Self {
        Self { key, access_token: RefCell::new(None) }
    }
}

impl ServiceAccount {
    pub fn access_token(&self, client: &Agent) -> Result<String> {
        if let Some(access_token) = self.access_token.borrow().as_ref() {
            return Ok(access_token.clone());
        }
        let access_token = self.exchange(client)?;
        *self.access_token.borrow_mut() = Some(access_token.clone());
        Ok(access_token)
    }

    /// Exchange a self-signed JWT for an access token.
    #[instrument(skip_all, fields(client_email = %self.key.client_email))]
    fn exchange(&self, client: &Agent) -> Result<String> {
        #[derive(Serialize)]
        struct Claims<'a> {
            iss: &'a str,
            scope: &'a str,
            aud: &'a str,
            iat: i64,
            exp: i64,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: u64,
        }

        let issued_at = Utc::now();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: issued_at.timestamp(),
            exp: (issued_at + TimeDelta::hours(1)).timestamp(),
        };
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .context("invalid service account private key")?;
        let assertion =
            jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
                .context("failed to sign the token request")?;

        debug!(token_uri = %self.key.token_uri, "exchanging…");
        let response = client
            .post(self.key.token_uri.as_str())
            .send_form([("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion.as_str())])
            .context("failed to obtain an access token")?
            .body_mut()
            .read_json::<TokenResponse>()
            .context("failed to deserialize the access token response")?;
        info!(expires_in = response.expires_in, "obtained an access token");
        Ok(response.access_token)
    }
}
