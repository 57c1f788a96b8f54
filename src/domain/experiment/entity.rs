//! Experiment domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::validation::{
    validate_experiment_id, validate_variation_id, ExperimentValidationError,
};

// ============================================================================
// ExperimentId
// ============================================================================

/// Vendor-assigned identifier for an experiment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExperimentId(String);

impl ExperimentId {
    /// Create a new experiment ID with validation
    pub fn new(id: impl Into<String>) -> Result<Self, ExperimentValidationError> {
        let id = id.into();
        validate_experiment_id(&id)?;
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExperimentId {
    type Error = ExperimentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExperimentId> for String {
    fn from(id: ExperimentId) -> Self {
        id.0
    }
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ExperimentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// VariationId
// ============================================================================

/// Vendor-assigned identifier for a variation (a "combination") of an experiment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariationId(String);

impl VariationId {
    /// Create a new variation ID with validation
    pub fn new(id: impl Into<String>) -> Result<Self, ExperimentValidationError> {
        let id = id.into();
        validate_variation_id(&id)?;
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VariationId {
    type Error = ExperimentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VariationId> for String {
    fn from(id: VariationId) -> Self {
        id.0
    }
}

impl fmt::Display for VariationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VariationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// ExperimentRecord
// ============================================================================

/// The vendor's view of one experiment for the current visitor.
///
/// Records are owned by the experiment source and only read by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    id: ExperimentId,
    ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    chosen_variation: Option<VariationId>,
    #[serde(default)]
    variation_names: HashMap<VariationId, String>,
}

impl ExperimentRecord {
    /// Create a record that is not ready and has no chosen variation
    pub fn new(id: ExperimentId) -> Self {
        Self {
            id,
            ready: false,
            chosen_variation: None,
            variation_names: HashMap::new(),
        }
    }

    /// Set the readiness flag
    pub fn with_ready(mut self, ready: bool) -> Self {
        self.ready = ready;
        self
    }

    /// Set the variation the visitor was bucketed into
    pub fn with_chosen_variation(mut self, variation: VariationId) -> Self {
        self.chosen_variation = Some(variation);
        self
    }

    /// Add a display name for a variation
    pub fn with_variation_name(mut self, variation: VariationId, name: impl Into<String>) -> Self {
        self.variation_names.insert(variation, name.into());
        self
    }

    pub fn id(&self) -> &ExperimentId {
        &self.id
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn chosen_variation(&self) -> Option<&VariationId> {
        self.chosen_variation.as_ref()
    }

    pub fn variation_names(&self) -> &HashMap<VariationId, String> {
        &self.variation_names
    }

    /// Display name of a variation, if the vendor provided one
    pub fn variation_name(&self, variation: &VariationId) -> Option<&str> {
        self.variation_names.get(variation).map(String::as_str)
    }

    /// A genuine exposure: the vendor finished bucketing and picked a variation
    pub fn is_exposed(&self) -> bool {
        self.ready && self.chosen_variation.is_some()
    }
}
