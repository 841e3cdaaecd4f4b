use std::time::Duration;

use config::{Config, ConfigError, File};
use postgres::PsqlSettings;
use routing_client::RoutingSettings;
use serde::Deserialize;
use strum::AsRefStr;
use tracking_core::Environment;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log_level: LogLevel,
    pub api: ApiSettings,
    pub postgres: PsqlSettings,
    pub environment: Environment,
    #[serde(default = "default_broadcast_buffer_size")]
    pub broadcast_buffer_size: usize,
    #[serde(with = "humantime_serde", default = "default_eta_cooldown")]
    pub eta_cooldown: Duration,
    /// ETA estimation is disabled when absent.
    pub routing: Option<RoutingSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub ip: String,
    pub port: u16,
    pub num_workers: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

fn default_broadcast_buffer_size() -> usize {
    1024
}

fn default_eta_cooldown() -> Duration {
    processors::DEFAULT_ETA_COOLDOWN
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .map_err(|e| ConfigError::Message(format!("APP_ENVIRONMENT is not set: {e}")))?
            .try_into()
            .unwrap_or(Environment::Test);

        let environment = environment.as_ref().to_lowercase();

        Config::builder()
            .add_source(File::with_name(&format!("config/{environment}")).required(true))
            .add_source(File::with_name(&format!("config/{environment}.secret")).required(false))
            .add_source(config::Environment::with_prefix("TRACKING_API").separator("__"))
            .set_override("environment", environment.as_str())?
            .build()?
            .try_deserialize()
    }
}

impl ApiSettings {
    pub fn listener_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}
