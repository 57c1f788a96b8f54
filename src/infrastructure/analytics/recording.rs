//! Analytics client that records every call in memory

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::domain::analytics::{AnalyticsClient, TrackEvent, Traits};
use crate::domain::DomainError;

/// A call made to the analytics pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyticsCall {
    Identify { traits: Traits },
    Track(TrackEvent),
}

/// Captures identify/track calls in order.
///
/// Used by the CLI to print what a session would have sent, and by tests.
/// With [`RecordingAnalyticsClient::failing`] every call is recorded and
/// then rejected, to exercise best-effort handling.
#[derive(Debug, Default)]
pub struct RecordingAnalyticsClient {
    calls: Mutex<Vec<AnalyticsCall>>,
    fail: AtomicBool,
}

impl RecordingAnalyticsClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that rejects every call
    pub fn failing() -> Self {
        let client = Self::new();
        client.set_failing(true);
        client
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<AnalyticsCall> {
        self.lock().clone()
    }

    /// Remove and return everything recorded so far
    pub fn take_calls(&self) -> Vec<AnalyticsCall> {
        std::mem::take(&mut *self.lock())
    }

    pub fn identifies(&self) -> Vec<Traits> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                AnalyticsCall::Identify { traits } => Some(traits.clone()),
                AnalyticsCall::Track(_) => None,
            })
            .collect()
    }

    pub fn tracks(&self) -> Vec<TrackEvent> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                AnalyticsCall::Track(event) => Some(event.clone()),
                AnalyticsCall::Identify { .. } => None,
            })
            .collect()
    }

    fn record(&self, call: AnalyticsCall) -> Result<(), DomainError> {
        self.lock().push(call);

        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::analytics("Recording client configured to fail"));
        }

        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<AnalyticsCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AnalyticsClient for RecordingAnalyticsClient {
    async fn identify(&self, traits: Traits) -> Result<(), DomainError> {
        info!(traits = traits.len(), "identify");
        self.record(AnalyticsCall::Identify { traits })
    }

    async fn track(&self, event: TrackEvent) -> Result<(), DomainError> {
        info!(event = %event.event, "track");
        self.record(AnalyticsCall::Track(event))
    }
}
