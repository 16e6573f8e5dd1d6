use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_SUBMIT_LATENCY_MS: u64 = 2_000;
const DEFAULT_FAULT_PROBABILITY: f64 = 0.1;
const DEFAULT_NAVIGATION_DELAY_MS: u64 = 3_000;
const CONFIG_DIR: &str = "config";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Simulated acceptance latency in milliseconds
    #[serde(default = "default_submit_latency_ms")]
    pub submit_latency_ms: u64,

    /// Fraction of simulated acceptance calls that fail, in [0, 1]
    #[serde(default = "default_fault_probability")]
    #[validate(custom = "validate_fault_probability")]
    pub fault_probability: f64,

    /// Pause between a successful submission and the hop to the listing view
    #[serde(default = "default_navigation_delay_ms")]
    pub navigation_delay_ms: u64,

    /// Seed the listing store with demo rows on startup
    #[serde(default)]
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            submit_latency_ms: default_submit_latency_ms(),
            fault_probability: default_fault_probability(),
            navigation_delay_ms: default_navigation_delay_ms(),
            seed_demo_data: false,
        }
    }
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_submit_latency_ms() -> u64 {
    DEFAULT_SUBMIT_LATENCY_MS
}

fn default_fault_probability() -> f64 {
    DEFAULT_FAULT_PROBABILITY
}

fn default_navigation_delay_ms() -> u64 {
    DEFAULT_NAVIGATION_DELAY_MS
}

fn validate_fault_probability(value: &f64) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(value) {
        let mut err = ValidationError::new("range");
        err.message = Some("fault_probability must be between 0 and 1".into());
        return Err(err);
    }
    Ok(())
}

/// Loads configuration from `config/{default,<RUN_ENV>}` files plus
/// `ASSETDESK_*` environment variables, then validates it.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let config: AppConfig = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("ASSETDESK"))
        .build()?
        .try_deserialize()?;

    config
        .validate()
        .map_err(|e| ConfigError::Message(format!("Invalid configuration: {}", e)))?;

    info!(environment = %config.environment, "Configuration loaded");
    Ok(config)
}
