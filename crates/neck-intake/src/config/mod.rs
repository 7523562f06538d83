use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::workflows::intake::{ContactPoints, PayloadEncoding};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the intake service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub intake: IntakeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = env::var("APP_LOG_ANSI")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            intake: IntakeConfig::from_env()?,
        })
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Where finished intakes go and where sessions are kept.
#[derive(Debug, Clone, Default)]
pub struct IntakeConfig {
    /// Staff webhook. Submissions fall back to e-mail when unset.
    pub webhook_url: Option<String>,
    pub webhook_encoding: PayloadEncoding,
    pub contact_points: ContactPoints,
    /// File-backed sessions when set, in-memory otherwise.
    pub session_dir: Option<PathBuf>,
}

impl IntakeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = ContactPoints::default();

        let webhook_encoding = match non_blank_var("INTAKE_WEBHOOK_ENCODING") {
            Some(raw) => {
                PayloadEncoding::parse(&raw).ok_or(ConfigError::InvalidEncoding { value: raw })?
            }
            None => PayloadEncoding::default(),
        };

        Ok(Self {
            webhook_url: non_blank_var("INTAKE_WEBHOOK_URL"),
            webhook_encoding,
            contact_points: ContactPoints {
                fallback_email: non_blank_var("INTAKE_FALLBACK_EMAIL")
                    .unwrap_or(defaults.fallback_email),
                appointment_url: non_blank_var("INTAKE_APPOINTMENT_URL")
                    .unwrap_or(defaults.appointment_url),
            },
            session_dir: non_blank_var("INTAKE_SESSION_DIR").map(PathBuf::from),
        })
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidEncoding { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidEncoding { value } => write!(
                f,
                "INTAKE_WEBHOOK_ENCODING must be 'json' or 'text', got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidEncoding { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
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
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_ANSI",
            "INTAKE_WEBHOOK_URL",
            "INTAKE_WEBHOOK_ENCODING",
            "INTAKE_FALLBACK_EMAIL",
            "INTAKE_APPOINTMENT_URL",
            "INTAKE_SESSION_DIR",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.ansi);
        assert!(config.intake.webhook_url.is_none());
        assert_eq!(config.intake.webhook_encoding, PayloadEncoding::Json);
        assert_eq!(config.intake.contact_points, ContactPoints::default());
        assert!(config.intake.session_dir.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_intake_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INTAKE_WEBHOOK_URL", " https://hooks.example.test/intake ");
        env::set_var("INTAKE_WEBHOOK_ENCODING", "text");
        env::set_var("INTAKE_FALLBACK_EMAIL", "balie@example.test");
        env::set_var("INTAKE_SESSION_DIR", "/var/lib/neck-intake");
        env::set_var("INTAKE_APPOINTMENT_URL", "   ");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.intake.webhook_url.as_deref(),
            Some("https://hooks.example.test/intake")
        );
        assert_eq!(config.intake.webhook_encoding, PayloadEncoding::PlainText);
        assert_eq!(config.intake.contact_points.fallback_email, "balie@example.test");
        assert_eq!(
            config.intake.contact_points.appointment_url,
            ContactPoints::default().appointment_url
        );
        assert_eq!(
            config.intake.session_dir,
            Some(PathBuf::from("/var/lib/neck-intake"))
        );
        reset_env();
    }

    #[test]
    fn rejects_unknown_webhook_encoding() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INTAKE_WEBHOOK_ENCODING", "xml");
        let err = AppConfig::load().expect_err("unknown encoding rejected");
        assert!(matches!(err, ConfigError::InvalidEncoding { ref value } if value == "xml"));
        reset_env();
    }
}
