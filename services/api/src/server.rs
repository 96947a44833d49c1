use crate::cli::ServeArgs;
use crate::infra::{AppState, CountryServices};
use crate::routes::with_country_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use country_config::config::AppConfig;
use country_config::error::AppError;
use country_config::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = CountryServices::from_config(&config, reqwest::Client::new())?;
    info!(
        data_dir = %config.data.dir.display(),
        sms_provider = %config.notification.sms_provider,
        user_delivery = %config.notification.user_delivery_method,
        "country configuration loaded"
    );

    let app = with_country_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "country configuration service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
