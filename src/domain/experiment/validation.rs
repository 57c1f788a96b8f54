//! Experiment validation utilities

use thiserror::Error;

/// Validation errors for vendor experiment and variation identifiers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExperimentValidationError {
    #[error("Experiment ID cannot be empty")]
    EmptyId,

    #[error("Variation ID cannot be empty")]
    EmptyVariationId,
}

/// Validate an experiment ID
///
/// Vendor ids are opaque keys; anything other than an empty or all-whitespace
/// string is accepted.
pub fn validate_experiment_id(id: &str) -> Result<(), ExperimentValidationError> {
    if id.trim().is_empty() {
        return Err(ExperimentValidationError::EmptyId);
    }

    Ok(())
}

/// Validate a variation ID
pub fn validate_variation_id(id: &str) -> Result<(), ExperimentValidationError> {
    if id.trim().is_empty() {
        return Err(ExperimentValidationError::EmptyVariationId);
    }

    Ok(())
}
