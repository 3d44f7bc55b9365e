use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::eligibility::ArtifactPaths;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub artifacts: ArtifactConfig,
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

        let model_dir = env::var("LOAN_MODEL_DIR").unwrap_or_else(|_| "./model".to_string());
        if model_dir.trim().is_empty() {
            return Err(ConfigError::EmptyModelDir);
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            artifacts: ArtifactConfig {
                model_dir: PathBuf::from(model_dir),
                classifier: path_override("LOAN_MODEL_PATH"),
                encoders: path_override("LOAN_ENCODERS_PATH"),
                scaler: path_override("LOAN_SCALER_PATH"),
                status_encoder: path_override("LOAN_STATUS_ENCODER_PATH"),
            },
        })
    }
}

fn path_override(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
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
}

/// Where the four serialized artifacts live. Per-file overrides win over `model_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub model_dir: PathBuf,
    pub classifier: Option<PathBuf>,
    pub encoders: Option<PathBuf>,
    pub scaler: Option<PathBuf>,
    pub status_encoder: Option<PathBuf>,
}

impl ArtifactConfig {
    pub fn paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::in_dir(&self.model_dir);
        ArtifactPaths {
            classifier: self.classifier.clone().unwrap_or(defaults.classifier),
            encoders: self.encoders.clone().unwrap_or(defaults.encoders),
            scaler: self.scaler.clone().unwrap_or(defaults.scaler),
            status_encoder: self
                .status_encoder
                .clone()
                .unwrap_or(defaults.status_encoder),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyModelDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyModelDir => write!(f, "LOAN_MODEL_DIR must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::EmptyModelDir => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
