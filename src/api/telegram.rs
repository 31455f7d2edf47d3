//! [Telegram Bot API](https://core.telegram.org/bots/api#sendmessage) notifier.

use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::{api::client, prelude::*, sink::Notifier};

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

pub struct Api {
    client: Agent,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

impl Api {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, bot_token, chat_id)
    }

    pub fn with_base_url(base_url: &str, bot_token: String, chat_id: String) -> Self {
        Self {
            client: client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            bot_token,
            chat_id,
        }
    }
}

impl Notifier for Api {
    #[instrument(skip_all, fields(label = label, chat_id = %self.chat_id))]
    fn notify(&self, label: &str, message: &str) -> Result {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
        }

        #[derive(Deserialize)]
        struct SendMessageResponse {
            ok: bool,

            #[serde(default)]
            description: Option<String>,
        }

        debug!(message, "sending…");
        // Errors come with a JSON body explaining them, so the status is checked after reading it.
        let mut response = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.base_url, self.bot_token))
            .config()
            .http_status_as_error(false)
            .build()
            .send_json(SendMessageRequest { chat_id: &self.chat_id, text: message })
            .context("failed to call `sendMessage`")?;
        let status = response.status();
        let response = response
            .body_mut()
            .read_json::<SendMessageResponse>()
            .with_context(|| format!("failed to deserialize `sendMessage` response (HTTP {status})"))?;
        ensure!(
            response.ok && status.is_success(),
            "Telegram refused the message (HTTP {status}): {}",
            response.description.as_deref().unwrap_or("no description"),
        );
        info!("sent");
        Ok(())
    }
}
