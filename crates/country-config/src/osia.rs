//! Forwards UIN topic events to an OSIA UIN management service.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

use crate::config::OsiaConfig;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum OsiaError {
    #[error("invalid OSIA url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("OSIA url {0} cannot carry a topic path")]
    OpaqueUrl(Url),
    #[error("OSIA request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("OSIA responded with status {status}: {body}")]
    Upstream { status: u16, body: String },
}

/// Body forwarded to the topic. `uin1`/`uin2` carry merge and split events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEvent {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uin1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uin2: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicNotification {
    pub uuid: String,
    pub subject: String,
    #[serde(flatten)]
    pub event: TopicEvent,
}

#[derive(Debug, Clone)]
pub struct OsiaClient {
    client: reqwest::Client,
    base_url: Url,
    jwt: String,
}

impl OsiaClient {
    pub fn new(client: reqwest::Client, config: &OsiaConfig) -> Result<Self, OsiaError> {
        Ok(Self {
            client,
            base_url: Url::parse(&config.uin_management_url)?,
            jwt: config.jwt.clone(),
        })
    }

    /// The topic is a single percent-encoded path segment; the base path is dropped.
    pub fn publish_url(&self, topic: &str, subject: &str) -> Result<Url, OsiaError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| OsiaError::OpaqueUrl(self.base_url.clone()))?
            .clear()
            .extend(["v1", "topics", topic, "publish"]);
        url.query_pairs_mut().append_pair("subject", subject);
        Ok(url)
    }

    /// Publishes the event and returns the service's JSON reply.
    pub async fn publish(&self, notification: TopicNotification) -> Result<Value, OsiaError> {
        let url = self.publish_url(&notification.uuid, &notification.subject)?;
        info!(topic = %notification.uuid, subject = %notification.subject, "publishing OSIA topic event");

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.jwt))
            .json(&notification.event)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "OSIA topic publish failed");
            return Err(OsiaError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

pub fn osia_router(client: Arc<OsiaClient>) -> Router {
    Router::new()
        .route("/osia/topic", post(topic_handler))
        .with_state(client)
}

async fn topic_handler(
    State(client): State<Arc<OsiaClient>>,
    Json(notification): Json<TopicNotification>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(client.publish(notification).await?))
}
