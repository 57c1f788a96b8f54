//! Observability infrastructure - Metrics

mod config;
mod metrics;

pub use self::config::MetricsConfig;
pub use self::metrics::{
    init_metrics, record_analytics_call, record_exposures, record_revenue_conversion,
    PrometheusMetrics,
};
