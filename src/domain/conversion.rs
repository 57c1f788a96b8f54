//! Revenue conversion reporting back to the experimentation vendor

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// The parts of a completed order the vendor's revenue goal cares about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderCompleted {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
}

impl OrderCompleted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = Some(revenue);
        self
    }

    /// Amount credited to the revenue goal: total, then revenue, then zero.
    ///
    /// A zero total falls through to revenue.
    pub fn conversion_amount(&self) -> f64 {
        [self.total, self.revenue]
            .into_iter()
            .flatten()
            .find(|amount| *amount != 0.0)
            .unwrap_or(0.0)
    }
}

/// Receives revenue conversions for the vendor's revenue goal
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConversionSink: Send + Sync {
    async fn revenue_conversion(&self, amount: f64) -> Result<(), DomainError>;
}
