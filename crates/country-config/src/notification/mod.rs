pub mod email;
pub mod sms;
pub mod templates;

pub use email::{EmailMessage, EmailService, EmailTemplates};
pub use sms::{SmsProvider, SmsService};
pub use templates::NotificationTemplates;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::application::default_application_config;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("unknown SMS provider '{0}'")]
    UnknownProvider(String),
    #[error("unknown notification template '{0}'")]
    UnknownTemplate(String),
    #[error("no notification templates for locale '{0}'")]
    UnknownLocale(String),
    #[error("unknown notification delivery method '{0}'")]
    UnknownDeliveryMethod(String),
    #[error("notification has no {0} recipient")]
    MissingRecipient(DeliveryMethod),
    #[error("notification names no {0} template")]
    MissingTemplate(DeliveryMethod),
    #[error("failed to read notification templates from {path}: {source}")]
    Templates {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid notification templates: {0}")]
    InvalidTemplates(#[from] serde_json::Error),
    #[error("invalid SMS endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("SMS request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{provider} rejected the SMS (status {status}): {body}")]
    Rejected {
        provider: SmsProvider,
        status: u16,
        body: String,
    },
    #[error("mail API rejected the email (status {status}): {body}")]
    EmailRejected { status: u16, body: String },
}

impl NotificationError {
    /// True when the request itself was unusable, as opposed to a vendor or
    /// configuration failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NotificationError::UnknownTemplate(_)
                | NotificationError::UnknownLocale(_)
                | NotificationError::MissingRecipient(_)
                | NotificationError::MissingTemplate(_)
        )
    }

    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            NotificationError::Transport(_)
                | NotificationError::Rejected { .. }
                | NotificationError::EmailRejected { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMethod {
    Sms,
    Email,
}

impl DeliveryMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryMethod::Sms => "sms",
            DeliveryMethod::Email => "email",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMethod {
    type Err = NotificationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "sms" => Ok(DeliveryMethod::Sms),
            "email" => Ok(DeliveryMethod::Email),
            other => Err(NotificationError::UnknownDeliveryMethod(other.to_string())),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateName {
    pub sms: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Recipient {
    #[serde(default)]
    pub sms: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub template_name: TemplateName,
    #[serde(default)]
    pub recipient: Recipient,
    pub locale: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
    #[serde(default)]
    pub convert_unicode: bool,
}

#[derive(Debug, Clone)]
pub struct NotificationState {
    pub sms: SmsService,
    pub email: EmailService,
    pub templates: NotificationTemplates,
    pub email_templates: EmailTemplates,
    /// How notifications for system users are delivered.
    pub user_delivery: DeliveryMethod,
}

impl NotificationState {
    /// Informant templates without an email template always go by SMS; every
    /// other notification follows `user_delivery`.
    pub fn delivery_method(&self, template_name: &TemplateName) -> DeliveryMethod {
        let has_email_template = template_name
            .email
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if !has_email_template && templates::is_informant_template(&template_name.sms) {
            DeliveryMethod::Sms
        } else {
            self.user_delivery
        }
    }

    /// Renders the payload's template and sends it over the chosen channel.
    pub async fn notify(&self, payload: NotificationPayload) -> Result<(), NotificationError> {
        let method = self.delivery_method(&payload.template_name);
        let NotificationPayload {
            template_name,
            recipient,
            locale,
            mut variables,
            convert_unicode,
        } = payload;
        info!(template = %template_name.sms, "Notification method is {}", method);

        variables.insert(
            "applicationName".to_string(),
            Value::from(default_application_config().application_name),
        );

        match method {
            DeliveryMethod::Sms => {
                let msisdn = present(recipient.sms)
                    .ok_or(NotificationError::MissingRecipient(DeliveryMethod::Sms))?;
                let message = self
                    .templates
                    .render(&template_name.sms, &locale, &variables)?;
                self.sms.send_sms(&msisdn, &message, convert_unicode).await
            }
            DeliveryMethod::Email => {
                let template = present(template_name.email)
                    .ok_or(NotificationError::MissingTemplate(DeliveryMethod::Email))?;
                let address = present(recipient.email)
                    .ok_or(NotificationError::MissingRecipient(DeliveryMethod::Email))?;
                let message = self.email_templates.render(&template, &variables)?;
                self.email.send_email(&address, &message).await
            }
        }
    }
}

pub fn notification_router(state: Arc<NotificationState>) -> Router {
    Router::new()
        .route("/notification", post(notification_handler))
        .with_state(state)
}

async fn notification_handler(
    State(state): State<Arc<NotificationState>>,
    Json(payload): Json<NotificationPayload>,
) -> Result<Json<Value>, AppError> {
    state.notify(payload).await?;
    Ok(Json(json!({})))
}
