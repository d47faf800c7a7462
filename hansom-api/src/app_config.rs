use serde::Deserialize;
use std::env;

use hansom_fare::PricingConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub distance: DistanceConfig,
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DistanceConfig {
    pub matrix_url: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_seconds: u64,
    /// Answer every lookup with this distance instead of calling out
    pub fixed_miles: Option<f64>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // HANSOM__SERVER__PORT=9090 style environment overrides
            .add_source(config::Environment::with_prefix("HANSOM").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
