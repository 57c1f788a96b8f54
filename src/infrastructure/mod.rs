//! Infrastructure layer - Implementations of the domain traits and services

pub mod analytics;
pub mod conversion;
pub mod experiment;
pub mod exposure;
pub mod logging;
pub mod observability;
pub mod scheduler;
pub mod services;

pub use analytics::{AnalyticsCall, RecordingAnalyticsClient};
pub use conversion::RecordingConversionSink;
pub use experiment::{InMemoryExperimentSource, VariationResolver, VendorSnapshot};
pub use exposure::ExposureCollector;
pub use scheduler::{QueueScheduler, TokioScheduler};
pub use services::{ExperimentIntegration, ExposureReporter, IntegrationState, PassSummary};
