//! Experiment domain module
//!
//! Types describing the A/B testing vendor's per-visitor experiment state and
//! the trait through which the bridge reads it.

mod entity;
mod source;
mod validation;

pub use entity::{ExperimentId, ExperimentRecord, VariationId};
pub use source::ExperimentSource;
pub use validation::{validate_experiment_id, validate_variation_id, ExperimentValidationError};
