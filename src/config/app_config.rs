use serde::Deserialize;

use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub integration: IntegrationOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Options recognized by the experiment integration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IntegrationOptions {
    /// Vendor account identifier; passed through, not used by the bridge
    #[serde(default)]
    pub account_id: Option<String>,
    /// Replay exposures as identify traits
    #[serde(default = "default_true")]
    pub replay: bool,
    /// Emit an `Experiment Viewed` track event per exposure
    #[serde(default)]
    pub listen: bool,
    /// Single-page application: dedup across virtual page transitions
    #[serde(default)]
    pub is_spa: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            account_id: None,
            replay: true,
            listen: false,
            is_spa: false,
        }
    }
}

impl IntegrationOptions {
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_replay(mut self, replay: bool) -> Self {
        self.replay = replay;
        self
    }

    pub fn with_listen(mut self, listen: bool) -> Self {
        self.listen = listen;
        self
    }

    pub fn with_spa(mut self, is_spa: bool) -> Self {
        self.is_spa = is_spa;
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("BRIDGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_defaults() {
        let options = IntegrationOptions::default();

        assert!(options.replay);
        assert!(!options.listen);
        assert!(!options.is_spa);
        assert!(options.account_id.is_none());
    }

    #[test]
    fn test_partial_integration_options() {
        let options: IntegrationOptions =
            serde_json::from_str(r#"{"listen": true, "account_id": "12345"}"#).unwrap();

        assert!(options.replay);
        assert!(options.listen);
        assert!(!options.is_spa);
        assert_eq!(options.account_id.as_deref(), Some("12345"));
    }

    #[test]
    fn test_app_config_from_empty_document() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.integration, IntegrationOptions::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_log_format_lowercase() {
        let config: LoggingConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_builder_chain() {
        let options = IntegrationOptions::default()
            .with_account_id("42")
            .with_replay(false)
            .with_listen(true)
            .with_spa(true);

        assert_eq!(options.account_id.as_deref(), Some("42"));
        assert!(!options.replay);
        assert!(options.listen);
        assert!(options.is_spa);
    }
}
