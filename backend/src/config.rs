//! Configuration management for the Mildew Risk Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with MILDEW_ prefix

use config::{
    builder::{ConfigBuilder, DefaultState},
    ConfigError, Environment, File,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::SchedulingStrategy;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Risk analysis configuration
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Open-Meteo forecast endpoint
    pub api_endpoint: String,

    /// Timezone used to align daily aggregates
    pub timezone: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Humidity assumed when a source omits it; unset means reject
    #[serde(default)]
    pub humidity_backfill_pct: Option<Decimal>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Days looked back when the request does not say
    pub default_days_back: u32,

    /// Upper bound accepted for `days_back`
    pub max_days_back: u32,

    /// Days of forecast appended on request
    pub forecast_days: u32,

    /// Treatment recommendation walk
    pub strategy: SchedulingStrategy,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("MILDEW_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::with_defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (MILDEW_ prefix)
            .add_source(
                Environment::with_prefix("MILDEW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Builder holding only the built-in defaults
    fn with_defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("weather.api_endpoint", "https://api.open-meteo.com/v1/forecast")?
            .set_default("weather.timezone", "Europe/Madrid")?
            .set_default("weather.request_timeout_secs", 15)?
            .set_default("analysis.default_days_back", 7)?
            .set_default("analysis.max_days_back", 14)?
            .set_default("analysis.forecast_days", 3)?
            .set_default("analysis.strategy", "reactive")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.open-meteo.com/v1/forecast".to_string(),
            timezone: "Europe/Madrid".to_string(),
            request_timeout_secs: 15,
            humidity_backfill_pct: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_days_back: 7,
            max_days_back: 14,
            forecast_days: 3,
            strategy: SchedulingStrategy::Reactive,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            weather: WeatherConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}
