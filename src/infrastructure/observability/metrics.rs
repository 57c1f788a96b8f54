//! Prometheus metrics infrastructure

use std::sync::Arc;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::exposure::Channel;

/// Prometheus metrics handle for rendering the exposition text
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics in Prometheus text format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
///
/// Counters are no-ops when no recorder is installed, so the bridge records
/// them unconditionally.
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let builder = PrometheusBuilder::new().add_global_label("service", config.service.clone());

    match builder.install_recorder() {
        Ok(handle) => {
            register_default_metrics();

            tracing::info!("Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("exposure_bridge_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record the outcome of one collection pass on a channel
pub fn record_exposures(channel: Channel, reported: usize, unresolved: usize) {
    let labels = [("channel", channel.as_str().to_string())];

    counter!("experiment_exposures_reported_total", &labels).increment(reported as u64);
    counter!("experiment_exposures_unresolved_total", &labels).increment(unresolved as u64);
}

/// Record an analytics call made by a reporter
pub fn record_analytics_call(kind: &'static str, success: bool) {
    let labels = [
        ("kind", kind.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("experiment_analytics_calls_total", &labels).increment(1);
}

/// Record a revenue conversion forwarded to the vendor
pub fn record_revenue_conversion(success: bool) {
    let status = if success { "success" } else { "error" };
    counter!("revenue_conversions_total", "status" => status).increment(1);
}
