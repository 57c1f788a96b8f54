//! Analytics domain module
//!
//! The calls the bridge makes into the generic analytics pipeline.

mod client;
mod event;

pub use client::AnalyticsClient;
pub use event::{
    experiment_trait_key, ExperimentViewed, IntegrationContext, TrackContext, TrackEvent,
    TrackOptions, Traits, EXPERIMENT_TRAIT_PREFIX, EXPERIMENT_VIEWED_EVENT, INTEGRATION_NAME,
    INTEGRATION_VERSION,
};
