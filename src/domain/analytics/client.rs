//! Analytics client trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::event::{TrackEvent, Traits};
use crate::domain::DomainError;

/// The downstream analytics pipeline.
///
/// Transport, batching and retries belong to the implementation; the bridge
/// only makes calls and treats failures as best effort.
#[async_trait]
pub trait AnalyticsClient: Send + Sync + Debug {
    /// Attach traits to the current visitor
    async fn identify(&self, traits: Traits) -> Result<(), DomainError>;

    /// Record a named event
    async fn track(&self, event: TrackEvent) -> Result<(), DomainError>;
}
