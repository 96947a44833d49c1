use crate::config::ConfigError;
use crate::content::ContentError;
use crate::forms::{Event, FormConfigError, UnknownEvent};
use crate::notification::NotificationError;
use crate::osia::OsiaError;
use crate::seeding::SeedingError;
use crate::telemetry::TelemetryError;
use crate::translations::TranslationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Forms(FormConfigError),
    UnknownEvent(UnknownEvent),
    FormNotFound(Event),
    BadRequest(String),
    Seeding(SeedingError),
    Notification(NotificationError),
    Osia(OsiaError),
    Translation(TranslationError),
    Content(ContentError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Forms(err) => write!(f, "form definition error: {}", err),
            AppError::UnknownEvent(err) => write!(f, "{}", err),
            AppError::FormNotFound(event) => write!(f, "no form is configured for {}", event),
            AppError::BadRequest(message) => write!(f, "bad request: {}", message),
            AppError::Seeding(err) => write!(f, "seeding error: {}", err),
            AppError::Notification(err) => write!(f, "notification error: {}", err),
            AppError::Osia(err) => write!(f, "osia error: {}", err),
            AppError::Translation(err) => write!(f, "translation error: {}", err),
            AppError::Content(err) => write!(f, "content error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Forms(err) => Some(err),
            AppError::UnknownEvent(err) => Some(err),
            AppError::Seeding(err) => Some(err),
            AppError::Notification(err) => Some(err),
            AppError::Osia(err) => Some(err),
            AppError::Translation(err) => Some(err),
            AppError::Content(err) => Some(err),
            AppError::FormNotFound(_) | AppError::BadRequest(_) => None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnknownEvent(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::FormNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Seeding(SeedingError::CertificateNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Content(ContentError::UnknownApplication(_)) => StatusCode::NOT_FOUND,
            AppError::Seeding(SeedingError::Transport(_) | SeedingError::Upstream { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Notification(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Notification(err) if err.is_upstream() => StatusCode::BAD_GATEWAY,
            AppError::Osia(OsiaError::Transport(_) | OsiaError::Upstream { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Translation(TranslationError::Transport(_) | TranslationError::Upstream { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<FormConfigError> for AppError {
    fn from(value: FormConfigError) -> Self {
        Self::Forms(value)
    }
}

impl From<UnknownEvent> for AppError {
    fn from(value: UnknownEvent) -> Self {
        Self::UnknownEvent(value)
    }
}

impl From<SeedingError> for AppError {
    fn from(value: SeedingError) -> Self {
        Self::Seeding(value)
    }
}

impl From<NotificationError> for AppError {
    fn from(value: NotificationError) -> Self {
        Self::Notification(value)
    }
}

impl From<OsiaError> for AppError {
    fn from(value: OsiaError) -> Self {
        Self::Osia(value)
    }
}

impl From<ContentError> for AppError {
    fn from(value: ContentError) -> Self {
        Self::Content(value)
    }
}

impl From<TranslationError> for AppError {
    fn from(value: TranslationError) -> Self {
        Self::Translation(value)
    }
}
