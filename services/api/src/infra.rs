use country_config::config::{AppConfig, DataConfig};
use country_config::error::AppError;
use country_config::forms::FormCatalog;
use country_config::notification::email::EMAIL_TEMPLATES_JSON;
use country_config::notification::templates::NOTIFICATION_TEMPLATES_JSON;
use country_config::notification::{
    DeliveryMethod, EmailService, EmailTemplates, NotificationState, NotificationTemplates,
    SmsService,
};
use country_config::osia::OsiaClient;
use country_config::seeding::SeedingState;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Shared state for each feature router. Built once at startup; a form or
/// template file that fails to load, or an unknown user delivery method,
/// stops the service before it binds.
#[derive(Clone)]
pub(crate) struct CountryServices {
    pub(crate) forms: Arc<FormCatalog>,
    pub(crate) seeding: Arc<SeedingState>,
    pub(crate) notification: Arc<NotificationState>,
    pub(crate) osia: Arc<OsiaClient>,
    pub(crate) content: Arc<DataConfig>,
}

impl CountryServices {
    pub(crate) fn from_config(config: &AppConfig, client: reqwest::Client) -> Result<Self, AppError> {
        let forms = FormCatalog::standard()?;
        let templates =
            NotificationTemplates::from_path(&config.data.path(NOTIFICATION_TEMPLATES_JSON))?;
        let email_templates = EmailTemplates::from_path(&config.data.path(EMAIL_TEMPLATES_JSON))?;
        let user_delivery: DeliveryMethod = config.notification.user_delivery_method.parse()?;

        Ok(Self {
            forms: Arc::new(forms),
            seeding: Arc::new(SeedingState {
                data: config.data.clone(),
                environment: config.environment,
            }),
            notification: Arc::new(NotificationState {
                sms: SmsService::new(client.clone(), config.notification.clone()),
                email: EmailService::new(client.clone(), config.notification.email.clone()),
                templates,
                email_templates,
                user_delivery,
            }),
            osia: Arc::new(OsiaClient::new(client, &config.osia)?),
            content: Arc::new(config.data.clone()),
        })
    }
}
