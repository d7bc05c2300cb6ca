use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::analytics::recommendation::RecommendationCriteria;

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

    /// Filter used when `APP_LOG_LEVEL` is unset.
    pub const fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "funnel_insights=debug,funnel_insights_api=debug,info",
            Self::Test => "warn",
            Self::Production => "info",
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub recommendation: RecommendationCriteria,
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

        let log_level = env::var("APP_LOG_LEVEL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| environment.default_log_level().to_string());

        let programs_csv = env::var("PROGRAMS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig { programs_csv },
            recommendation: load_criteria()?,
        })
    }
}

fn load_criteria() -> Result<RecommendationCriteria, ConfigError> {
    let defaults = RecommendationCriteria::default();

    Ok(RecommendationCriteria {
        min_leads: count_threshold("RECOMMENDATION_MIN_LEADS", defaults.min_leads)?,
        min_conversion_rate: threshold(
            "RECOMMENDATION_MIN_CONVERSION_RATE",
            defaults.min_conversion_rate,
        )?,
        max_cost_per_enrollment: threshold(
            "RECOMMENDATION_MAX_COST_PER_ENROLLMENT",
            defaults.max_cost_per_enrollment,
        )?,
        excellent_conversion_rate: threshold(
            "RECOMMENDATION_EXCELLENT_CONVERSION_RATE",
            defaults.excellent_conversion_rate,
        )?,
        excellent_cost_per_enrollment: threshold(
            "RECOMMENDATION_EXCELLENT_COST_PER_ENROLLMENT",
            defaults.excellent_cost_per_enrollment,
        )?,
    })
}

fn count_threshold(variable: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidThreshold {
                variable,
                value: raw.clone(),
            }),
        Err(_) => Ok(default),
    }
}

/// Rejects unparsable, negative, and non-finite values.
fn threshold(variable: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = env::var(variable) else {
        return Ok(default);
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidThreshold {
            variable,
            value: raw,
        }),
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
}

/// Where program data comes from; the built-in sample when no CSV is set.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub programs_csv: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold { variable, value } => {
                write!(f, "{variable} must be a non-negative number, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidThreshold { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
