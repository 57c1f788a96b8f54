//! Domain layer - Core types, traits and the exposure algorithm

pub mod analytics;
pub mod conversion;
pub mod error;
pub mod experiment;
pub mod exposure;
pub mod scheduler;

pub use analytics::{AnalyticsClient, ExperimentViewed, TrackEvent, TrackOptions, Traits};
pub use conversion::{ConversionSink, OrderCompleted};
pub use error::DomainError;
pub use experiment::{
    ExperimentId, ExperimentRecord, ExperimentSource, ExperimentValidationError, VariationId,
};
pub use exposure::{Channel, ExposureCache, SeenExperiments, SessionState};
pub use scheduler::{ScheduledTask, Scheduler};

#[cfg(test)]
pub use conversion::MockConversionSink;
