//! Conversion sink that records revenue conversions in memory

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::domain::conversion::ConversionSink;
use crate::domain::DomainError;

/// Keeps every forwarded amount, in order
#[derive(Debug, Default)]
pub struct RecordingConversionSink {
    amounts: Mutex<Vec<f64>>,
}

impl RecordingConversionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amounts(&self) -> Vec<f64> {
        self.amounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything recorded so far
    pub fn take_amounts(&self) -> Vec<f64> {
        std::mem::take(&mut *self.amounts.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl ConversionSink for RecordingConversionSink {
    async fn revenue_conversion(&self, amount: f64) -> Result<(), DomainError> {
        info!(amount, "revenue conversion");
        self.amounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(amount);
        Ok(())
    }
}
