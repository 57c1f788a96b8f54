//! PMP Experiment Exposure Bridge
//!
//! Replays the experiments an A/B testing vendor has bucketed a visitor into
//! as analytics calls:
//! - Replay: one identify call carrying an `Experiment: <id>` trait per exposure
//! - Listen: one `Experiment Viewed` track event per exposure
//! - Single-page applications: exposures are deduplicated per channel across
//!   virtual page transitions
//!
//! The vendor's experiment table, the analytics client and the task scheduler
//! are all injected, see [`ExperimentIntegration::new`].

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, IntegrationOptions};
pub use domain::{
    AnalyticsClient, Channel, ConversionSink, DomainError, ExperimentId, ExperimentRecord,
    ExperimentSource, OrderCompleted, Scheduler, SessionState, VariationId,
};
pub use infrastructure::{
    ExperimentIntegration, ExposureCollector, ExposureReporter, InMemoryExperimentSource,
    QueueScheduler, RecordingAnalyticsClient, TokioScheduler, VendorSnapshot,
};
