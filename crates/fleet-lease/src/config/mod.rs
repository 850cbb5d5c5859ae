use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

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
    pub simulation: SimulationConfig,
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
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            simulation: SimulationConfig::from_env()?,
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
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

/// Dials for the simulated back office: how long each remote call takes and how often it
/// succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub latency: Duration,
    pub payment_success_rate: f64,
    pub retry_success_rate: f64,
    pub collect_success_rate: f64,
    pub lessee_success_rate: f64,
    pub lease_success_rate: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(2000),
            payment_success_rate: 0.90,
            retry_success_rate: 0.70,
            collect_success_rate: 0.95,
            lessee_success_rate: 0.90,
            lease_success_rate: 0.95,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Outcomes that always succeed with no delay, for tests and scripted demos.
    pub fn deterministic() -> Self {
        Self {
            latency: Duration::ZERO,
            payment_success_rate: 1.0,
            retry_success_rate: 1.0,
            collect_success_rate: 1.0,
            lessee_success_rate: 1.0,
            lease_success_rate: 1.0,
            seed: Some(0),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let latency = match env::var("SIM_LATENCY_MS") {
            Ok(raw) => Duration::from_millis(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidLatency)?,
            ),
            Err(_) => defaults.latency,
        };

        let seed = match env::var("SIM_SEED") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed)?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            latency,
            payment_success_rate: probability_var(
                "SIM_PAYMENT_SUCCESS_RATE",
                defaults.payment_success_rate,
            )?,
            retry_success_rate: probability_var(
                "SIM_RETRY_SUCCESS_RATE",
                defaults.retry_success_rate,
            )?,
            collect_success_rate: probability_var(
                "SIM_COLLECT_SUCCESS_RATE",
                defaults.collect_success_rate,
            )?,
            lessee_success_rate: probability_var(
                "SIM_LESSEE_SUCCESS_RATE",
                defaults.lessee_success_rate,
            )?,
            lease_success_rate: probability_var(
                "SIM_LEASE_SUCCESS_RATE",
                defaults.lease_success_rate,
            )?,
            seed,
        })
    }
}

fn probability_var(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if (0.0..=1.0).contains(&value) => Ok(value),
        _ => Err(ConfigError::InvalidProbability { name, value: raw }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLatency,
    InvalidSeed,
    InvalidProbability { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLatency => {
                write!(f, "SIM_LATENCY_MS must be a whole number of milliseconds")
            }
            ConfigError::InvalidSeed => write!(f, "SIM_SEED must be a valid u64"),
            ConfigError::InvalidProbability { name, value } => {
                write!(f, "{name} must be a probability between 0 and 1 (found '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLatency
            | ConfigError::InvalidSeed
            | ConfigError::InvalidProbability { .. } => None,
        }
    }
}
