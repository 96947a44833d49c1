use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Deployment stage the country configuration is running in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Qa,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "qa" | "test" | "ci" => Self::Qa,
            _ => Self::Development,
        }
    }

    /// Demo scopes and editable reference data are only offered outside production.
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Top-level configuration for the service and the seeding scripts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub gateway: GatewayConfig,
    pub data: DataConfig,
    pub notification: NotificationConfig,
    pub osia: OsiaConfig,
    pub translation: TranslationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(&env_or("APP_ENV", "development"));

        let host = env_or("COUNTRY_CONFIG_HOST", "0.0.0.0");
        let port = env_or("COUNTRY_CONFIG_PORT", "3040")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env_or("LOG_LEVEL", "info");

        let data_dir = env::var("COUNTRY_CONFIG_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| DataConfig::bundled_dir());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            gateway: GatewayConfig {
                url: env_or("GATEWAY_URL", "http://localhost:7070"),
            },
            data: DataConfig { dir: data_dir },
            notification: NotificationConfig {
                sms_provider: env_or("SMS_PROVIDER", "clickatell"),
                clickatell: ClickatellConfig {
                    user: env_or("CLICKATELL_USER", ""),
                    password: env_or("CLICKATELL_PASSWORD", ""),
                    api_id: env_or("CLICKATELL_API_ID", ""),
                    endpoint: env_or(
                        "CLICKATELL_ENDPOINT",
                        "https://api.clickatell.com/http/sendmsg",
                    ),
                },
                infobip: InfobipConfig {
                    api_key: env_or("INFOBIP_API_KEY", ""),
                    endpoint: env_or("INFOBIP_GATEWAY_ENDPOINT", ""),
                    sender_id: env_or("INFOBIP_SENDER_ID", ""),
                },
                user_delivery_method: env_or("USER_NOTIFICATION_DELIVERY_METHOD", "sms"),
                email: EmailConfig {
                    api_key: env_or("EMAIL_API_KEY", ""),
                    endpoint: env_or("EMAIL_ENDPOINT", "https://api.sendgrid.com/v3/mail/send"),
                    sender: env_or("SENDER_EMAIL_ADDRESS", ""),
                },
            },
            osia: OsiaConfig {
                uin_management_url: env_or("OSIA_UIN_MANAGEMENT_URL", "http://localhost:8080"),
                jwt: env_or("OSIA_JWT", ""),
            },
            translation: TranslationConfig {
                api_key: env_or("OPENAI_API_KEY", ""),
                endpoint: env_or(
                    "OPENAI_ENDPOINT",
                    "https://api.openai.com/v1/chat/completions",
                ),
            },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Reads a variable that has no sensible fallback, such as the seeding token.
pub fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVariable(name)),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Core gateway used by the location and facility importers.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
}

/// Location of the CSV, SVG and JSON source files.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub dir: PathBuf,
}

impl DataConfig {
    pub fn bundled_dir() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.join(relative)
    }
}

/// SMS vendor selection and credentials. The provider is kept as the raw
/// configured string so an unknown vendor surfaces on first use.
/// `user_delivery_method` (`sms` or `email`) applies to notifications for
/// system users and is checked when the service starts.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub sms_provider: String,
    pub clickatell: ClickatellConfig,
    pub infobip: InfobipConfig,
    pub user_delivery_method: String,
    pub email: EmailConfig,
}

#[derive(Debug, Clone)]
pub struct ClickatellConfig {
    pub user: String,
    pub password: String,
    pub api_id: String,
    pub endpoint: String,
}

#[derive(Debug, Clone)]
pub struct InfobipConfig {
    pub api_key: String,
    pub endpoint: String,
    pub sender_id: String,
}

/// Mail API that accepts SendGrid v3 `mail/send` payloads.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: String,
    pub endpoint: String,
    pub sender: String,
}

#[derive(Debug, Clone)]
pub struct OsiaConfig {
    pub uin_management_url: String,
    pub jwt: String,
}

#[derive(Debug, Clone)]
pub struct TranslationConfig {
    pub api_key: String,
    pub endpoint: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingVariable(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "COUNTRY_CONFIG_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "COUNTRY_CONFIG_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingVariable(name) => {
                write!(f, "'{name}' not found in environment")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort | ConfigError::MissingVariable(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "COUNTRY_CONFIG_HOST",
            "COUNTRY_CONFIG_PORT",
            "LOG_LEVEL",
            "SMS_PROVIDER",
            "USER_NOTIFICATION_DELIVERY_METHOD",
            "GATEWAY_URL",
            "TOKEN",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3040);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.notification.sms_provider, "clickatell");
        assert_eq!(config.notification.user_delivery_method, "sms");
        assert_eq!(config.gateway.url, "http://localhost:7070");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COUNTRY_CONFIG_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3040));
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COUNTRY_CONFIG_PORT", "eighty");
        let error = AppConfig::load().expect_err("port must be numeric");
        assert!(matches!(error, ConfigError::InvalidPort));
        reset_env();
    }

    #[test]
    fn require_env_reports_missing_token() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let error = require_env("TOKEN").expect_err("token is unset");
        assert_eq!(error.to_string(), "'TOKEN' not found in environment");
    }

    #[test]
    fn qa_environment_is_not_production() {
        assert_eq!(AppEnvironment::from_str("QA"), AppEnvironment::Qa);
        assert!(!AppEnvironment::Qa.is_production());
        assert!(AppEnvironment::from_str("production").is_production());
    }
}
