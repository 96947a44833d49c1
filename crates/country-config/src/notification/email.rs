use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{error, info};

use super::templates::render_placeholders;
use super::NotificationError;
use crate::config::EmailConfig;

pub const EMAIL_TEMPLATES_JSON: &str = "email-templates.json";

/// Addresses in this domain belong to seeded test users and are never mailed.
const EXAMPLE_DOMAIN: &str = "@example.com";

#[derive(Debug, Clone, Deserialize)]
struct EmailTemplate {
    subject: String,
    html: String,
}

#[derive(Debug, Deserialize)]
struct EmailTemplateFile {
    templates: BTreeMap<String, EmailTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
}

/// HTML email bodies keyed by template name. Email copy is not localised.
#[derive(Debug, Clone, Default)]
pub struct EmailTemplates {
    templates: BTreeMap<String, EmailTemplate>,
}

impl EmailTemplates {
    pub fn from_json(raw: &str) -> Result<Self, NotificationError> {
        let file: EmailTemplateFile = serde_json::from_str(raw)?;
        Ok(Self {
            templates: file.templates,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, NotificationError> {
        let raw = std::fs::read_to_string(path).map_err(|source| NotificationError::Templates {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn render(
        &self,
        template: &str,
        variables: &Map<String, Value>,
    ) -> Result<EmailMessage, NotificationError> {
        let found = self
            .templates
            .get(template)
            .ok_or_else(|| NotificationError::UnknownTemplate(template.to_string()))?;
        Ok(EmailMessage {
            subject: render_placeholders(&found.subject, variables),
            html: render_placeholders(&found.html, variables),
        })
    }
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

/// Sends HTML email through the configured mail API.
#[derive(Debug, Clone)]
pub struct EmailService {
    client: reqwest::Client,
    config: EmailConfig,
}

impl EmailService {
    pub fn new(client: reqwest::Client, config: EmailConfig) -> Self {
        Self { client, config }
    }

    pub async fn send_email(&self, to: &str, message: &EmailMessage) -> Result<(), NotificationError> {
        if to.ends_with(EXAMPLE_DOMAIN) {
            info!("Example email detected: {}. Not sending the email.", to);
            return Ok(());
        }

        let payload = MailRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: to }],
            }],
            from: Address {
                email: &self.config.sender,
            },
            subject: &message.subject,
            content: vec![Content {
                kind: "text/html",
                value: &message.html,
            }],
        };
        info!("Sending email to {}", to);

        let response = self
            .client
            .post(self.config.endpoint.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "Unable to send email to {}", to);
                NotificationError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "Unable to send email to {}", to);
            return Err(NotificationError::EmailRejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_subject_and_body() {
        let templates = EmailTemplates::from_json(
            r#"{"templates":{"password-reset":{
                "subject":"Password reset for {{applicationName}}",
                "html":"<p>Hello {{firstNames}}, your code is {{authCode}}</p>"}}}"#,
        )
        .expect("templates parse");
        let variables = json!({ "applicationName": "Farajaland CRS", "firstNames": "Kennedy", "authCode": 654321 });

        let message = templates
            .render("password-reset", variables.as_object().expect("object"))
            .expect("renders");

        assert_eq!(message.subject, "Password reset for Farajaland CRS");
        assert_eq!(message.html, "<p>Hello Kennedy, your code is 654321</p>");
    }

    #[test]
    fn unknown_email_template_is_an_error() {
        let err = EmailTemplates::default()
            .render("onboarding-invite", &Map::new())
            .expect_err("no templates");
        assert!(matches!(err, NotificationError::UnknownTemplate(ref name) if name == "onboarding-invite"));
    }

    #[test]
    fn bundled_email_templates_load() {
        let path = crate::config::DataConfig::bundled_dir().join(EMAIL_TEMPLATES_JSON);
        let templates = EmailTemplates::from_path(&path).expect("bundled email templates");

        for name in ["onboarding-invite", "2-factor-authentication", "password-reset"] {
            assert!(templates.names().any(|known| known == name), "{name} missing");
        }
    }
}
