mod app_config;

pub use app_config::{AppConfig, IntegrationOptions, LogFormat, LoggingConfig};
