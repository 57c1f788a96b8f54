//! Observability configuration

use serde::Deserialize;

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Install a Prometheus recorder for the exposure counters
    #[serde(default)]
    pub enabled: bool,
    /// Value of the `service` label attached to every metric
    #[serde(default = "default_service")]
    pub service: String,
}

fn default_service() -> String {
    "exposure_bridge".to_string()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service: default_service(),
        }
    }
}
