use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{error, info};
use url::Url;

use super::NotificationError;
use crate::config::NotificationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsProvider {
    Clickatell,
    Infobip,
}

impl SmsProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            SmsProvider::Clickatell => "clickatell",
            SmsProvider::Infobip => "infobip",
        }
    }
}

impl fmt::Display for SmsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SmsProvider {
    type Err = NotificationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "clickatell" => Ok(SmsProvider::Clickatell),
            "infobip" => Ok(SmsProvider::Infobip),
            other => Err(NotificationError::UnknownProvider(other.to_string())),
        }
    }
}

/// Hex of the UCS-2 big-endian encoding Clickatell expects for unicode texts.
pub fn ucs2_hex(message: &str) -> String {
    let bytes: Vec<u8> = message
        .encode_utf16()
        .flat_map(|unit| unit.to_be_bytes())
        .collect();
    hex::encode(bytes)
}

#[derive(Debug, Serialize)]
struct InfobipDestination<'a> {
    to: &'a str,
}

#[derive(Debug, Serialize)]
struct InfobipMessage<'a> {
    destinations: Vec<InfobipDestination<'a>>,
    from: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct InfobipRequest<'a> {
    messages: Vec<InfobipMessage<'a>>,
}

/// Sends SMS through whichever vendor the configuration names. Failures are
/// logged and handed back to the caller without retrying.
#[derive(Debug, Clone)]
pub struct SmsService {
    client: reqwest::Client,
    config: NotificationConfig,
}

impl SmsService {
    pub fn new(client: reqwest::Client, config: NotificationConfig) -> Self {
        Self { client, config }
    }

    /// The configured vendor; an unrecognised name fails here, before any request.
    pub fn provider(&self) -> Result<SmsProvider, NotificationError> {
        self.config.sms_provider.parse()
    }

    pub async fn send_sms(
        &self,
        msisdn: &str,
        message: &str,
        convert_unicode: bool,
    ) -> Result<(), NotificationError> {
        match self.provider()? {
            SmsProvider::Clickatell => self.send_clickatell(msisdn, message, convert_unicode).await,
            SmsProvider::Infobip => self.send_infobip(msisdn, message).await,
        }
    }

    async fn send_clickatell(
        &self,
        msisdn: &str,
        message: &str,
        convert_unicode: bool,
    ) -> Result<(), NotificationError> {
        let settings = &self.config.clickatell;
        // unicode texts are limited to 70 characters, plain ones to 160
        let (text, unicode) = if convert_unicode {
            (ucs2_hex(message), "1")
        } else {
            (message.to_string(), "0")
        };

        let url = Url::parse_with_params(
            &settings.endpoint,
            &[
                ("user", settings.user.as_str()),
                ("password", settings.password.as_str()),
                ("api_id", settings.api_id.as_str()),
                ("to", msisdn),
                ("text", text.as_str()),
                ("unicode", unicode),
            ],
        )?;
        info!(to = msisdn, unicode, "sending sms through clickatell");

        let response = self.client.get(url).send().await.map_err(|err| {
            error!(error = %err, "clickatell request failed");
            NotificationError::Transport(err)
        })?;
        let status = response.status();
        let body = response.text().await?;

        if body.contains("ERR") || !status.is_success() {
            error!(status = status.as_u16(), %body, "clickatell rejected sms");
            return Err(NotificationError::Rejected {
                provider: SmsProvider::Clickatell,
                status: status.as_u16(),
                body,
            });
        }

        info!("Received success response from Clickatell: Success");
        Ok(())
    }

    async fn send_infobip(&self, to: &str, text: &str) -> Result<(), NotificationError> {
        let settings = &self.config.infobip;
        let payload = InfobipRequest {
            messages: vec![InfobipMessage {
                destinations: vec![InfobipDestination { to }],
                from: &settings.sender_id,
                text,
            }],
        };

        let response = self
            .client
            .post(settings.endpoint.as_str())
            .header(AUTHORIZATION, format!("App {}", settings.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "infobip request failed");
                NotificationError::Transport(err)
            })?;
        let status = response.status();
        let body = response.text().await?;
        info!(%body, "Response from Infobip");

        if !status.is_success() {
            error!(status = status.as_u16(), "Failed to send sms to {}", to);
            return Err(NotificationError::Rejected {
                provider: SmsProvider::Infobip,
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
