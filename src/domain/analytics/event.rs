//! Analytics payload types emitted by the bridge

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::experiment::ExperimentId;

/// Event name for track-based exposure reporting
pub const EXPERIMENT_VIEWED_EVENT: &str = "Experiment Viewed";

/// Prefix of the trait key carrying an experiment's variation name
pub const EXPERIMENT_TRAIT_PREFIX: &str = "Experiment: ";

/// Integration name attached to every track event
pub const INTEGRATION_NAME: &str = "visual-website-optimizer";

/// Integration version attached to every track event
pub const INTEGRATION_VERSION: &str = "1.0.0";

/// Traits sent on an identify call, keyed by trait name
pub type Traits = BTreeMap<String, String>;

/// Trait key for an experiment, e.g. `Experiment: 7`
pub fn experiment_trait_key(id: &ExperimentId) -> String {
    format!("{}{}", EXPERIMENT_TRAIT_PREFIX, id)
}

/// Properties of an `Experiment Viewed` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentViewed {
    pub experiment_id: String,
    pub variation_name: String,
}

impl ExperimentViewed {
    pub fn new(experiment_id: &ExperimentId, variation_name: impl Into<String>) -> Self {
        Self {
            experiment_id: experiment_id.as_str().to_string(),
            variation_name: variation_name.into(),
        }
    }
}

/// Identity of the integration that produced an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationContext {
    pub name: String,
    pub version: String,
}

impl Default for IntegrationContext {
    fn default() -> Self {
        Self {
            name: INTEGRATION_NAME.to_string(),
            version: INTEGRATION_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrackContext {
    pub integration: IntegrationContext,
}

/// Options passed alongside a track call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrackOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<TrackContext>,
}

impl TrackOptions {
    /// Options tagged with this integration's context block
    pub fn with_integration_context() -> Self {
        Self {
            context: Some(TrackContext::default()),
        }
    }
}

/// A single track call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    pub event: String,
    pub properties: serde_json::Value,
    #[serde(default)]
    pub options: TrackOptions,
}

impl TrackEvent {
    /// Build the `Experiment Viewed` event for one exposure
    pub fn experiment_viewed(properties: ExperimentViewed) -> Self {
        Self {
            event: EXPERIMENT_VIEWED_EVENT.to_string(),
            properties: serde_json::to_value(properties).unwrap_or_default(),
            options: TrackOptions::with_integration_context(),
        }
    }
}
