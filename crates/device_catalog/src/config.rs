use crate::domain::DeviceServiceConfig;
use common::telemetry::TelemetryConfig;
use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Service name reported in log records
    #[serde(default = "default_service_name")]
    pub service_name: String,

    // Pagination
    /// Page size used when a list request gives none (or zero)
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound on the page size of a list request
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "device-catalog".to_string()
}

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    2000
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("DEVICE_CATALOG"))
            .build()?
            .try_deserialize()
    }

    pub fn service_config(&self) -> DeviceServiceConfig {
        DeviceServiceConfig {
            default_page_size: self.default_page_size.max(1),
            max_page_size: self.max_page_size.max(1),
        }
    }

    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig {
            service_name: self.service_name.clone(),
            log_level: self.log_level.clone(),
        }
    }
}
