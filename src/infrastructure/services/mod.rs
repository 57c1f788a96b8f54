//! Application services
//!
//! Business logic layered over the domain traits: exposure reporting and the
//! integration lifecycle.

mod integration_service;
mod reporter_service;

pub use integration_service::{ExperimentIntegration, IntegrationState};
pub use reporter_service::{ExposureReporter, PassSummary};
