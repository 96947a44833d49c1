//! Language content for the client and login applications.

use axum::extract::{Path as UrlPath, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::DataConfig;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("no content is served for application '{0}'")]
    UnknownApplication(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid content file {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Application {
    Client,
    Login,
}

impl Application {
    fn file_name(self) -> &'static str {
        match self {
            Application::Client => "client.json",
            Application::Login => "login.json",
        }
    }
}

impl FromStr for Application {
    type Err = ContentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "client" => Ok(Self::Client),
            "login" => Ok(Self::Login),
            other => Err(ContentError::UnknownApplication(other.to_string())),
        }
    }
}

/// Reads `copy/<application>.json` and checks it parses before serving it.
pub async fn load_content(data: &DataConfig, application: Application) -> Result<Value, ContentError> {
    let path = data.dir.join("copy").join(application.file_name());
    let raw = tokio::fs::read(&path).await.map_err(|source| ContentError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ContentError::Invalid { path, source })
}

pub fn content_router(data: Arc<DataConfig>) -> Router {
    Router::new()
        .route("/content/:application", get(content_handler))
        .with_state(data)
}

async fn content_handler(
    State(data): State<Arc<DataConfig>>,
    UrlPath(application): UrlPath<String>,
) -> Result<Json<Value>, AppError> {
    let application: Application = application.parse()?;
    Ok(Json(load_content(&data, application).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bundled_client_content_lists_languages() {
        let data = DataConfig {
            dir: DataConfig::bundled_dir(),
        };

        let content = load_content(&data, Application::Client)
            .await
            .expect("client content");

        assert_eq!(content["data"][0]["lang"], "en");
        assert!(content["data"][0]["messages"].is_object());
    }

    #[test]
    fn unknown_application_is_rejected() {
        let err = "register".parse::<Application>().expect_err("unknown");
        assert!(matches!(err, ContentError::UnknownApplication(ref name) if name == "register"));
    }

    #[tokio::test]
    async fn malformed_content_is_invalid() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir(dir.path().join("copy")).expect("copy dir");
        std::fs::write(dir.path().join("copy/login.json"), "{ not json").expect("write");
        let data = DataConfig {
            dir: dir.path().to_path_buf(),
        };

        let err = load_content(&data, Application::Login)
            .await
            .expect_err("malformed");

        assert!(matches!(err, ContentError::Invalid { .. }));
    }
}
