use crate::infra::{AppState, CountryServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use country_config::application::{application_config_handler, crude_death_rate_handler};
use country_config::content::content_router;
use country_config::forms::form_router;
use country_config::notification::notification_router;
use country_config::osia::osia_router;
use country_config::seeding::seeding_router;
use serde_json::json;

pub(crate) fn with_country_routes(services: CountryServices) -> Router {
    Router::new()
        .route("/application-config", get(application_config_handler))
        .route("/crude-death-rate", get(crude_death_rate_handler))
        .merge(content_router(services.content))
        .merge(form_router(services.forms))
        .merge(seeding_router(services.seeding))
        .merge(notification_router(services.notification))
        .merge(osia_router(services.osia))
        .route("/ping", get(ping))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "success": true }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
