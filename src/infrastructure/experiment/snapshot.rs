//! Vendor page-state snapshot format
//!
//! Mirrors the globals the experimentation vendor publishes on the page:
//! the experiment table (`ready`, `combination_chosen`, `comb_n` per
//! experiment), the list of experiment ids it manages, and the debug flag
//! set while an operator previews a campaign.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::domain::experiment::{ExperimentId, ExperimentRecord, VariationId};
use crate::domain::DomainError;

/// One experiment as the vendor publishes it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorExperiment {
    #[serde(default)]
    pub ready: bool,
    /// Chosen combination id; the vendor uses strings or numbers and a falsy
    /// value while bucketing is pending
    #[serde(default)]
    pub combination_chosen: Value,
    /// Combination id to display name
    #[serde(default)]
    pub comb_n: HashMap<String, String>,
}

/// Snapshot of the vendor's page globals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorSnapshot {
    /// Experiment table, keyed by experiment id
    #[serde(default)]
    pub experiments: Option<Map<String, Value>>,
    #[serde(default)]
    pub managed_ids: Option<Vec<Value>>,
    #[serde(default)]
    pub debug: bool,
}

impl VendorSnapshot {
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json)
            .map_err(|e| DomainError::snapshot(format!("Invalid snapshot JSON: {}", e)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::snapshot(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Convert the experiment table into domain records, in table order.
    ///
    /// The vendor enumerates its table with integer keys first in ascending
    /// order, then the remaining keys in insertion order. Entries that cannot
    /// be converted are skipped.
    pub fn records(&self) -> Option<Vec<ExperimentRecord>> {
        let experiments = self.experiments.as_ref()?;

        let mut entries: Vec<(&String, &Value)> = experiments.iter().collect();
        entries.sort_by_key(|(key, _)| table_position(key));

        let records = entries
            .into_iter()
            .filter_map(|(key, value)| {
                let experiment = match serde_json::from_value::<VendorExperiment>(value.clone()) {
                    Ok(experiment) => experiment,
                    Err(e) => {
                        warn!(experiment_id = %key, error = %e, "Skipping malformed experiment");
                        return None;
                    }
                };

                match experiment.into_record(key) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(error = %e, "Skipping experiment");
                        None
                    }
                }
            })
            .collect();

        Some(records)
    }

    /// Convert the managed id list into experiment ids, skipping invalid ones
    pub fn managed_ids(&self) -> Option<Vec<ExperimentId>> {
        let values = self.managed_ids.as_ref()?;

        let ids = values
            .iter()
            .filter_map(|value| {
                let id = vendor_key(value).and_then(|key| ExperimentId::new(key).ok());
                if id.is_none() {
                    warn!(%value, "Skipping invalid managed experiment id");
                }
                id
            })
            .collect();

        Some(ids)
    }
}

impl VendorExperiment {
    fn into_record(self, key: &str) -> Result<ExperimentRecord, DomainError> {
        let id = ExperimentId::new(key)
            .map_err(|e| DomainError::snapshot(format!("Invalid experiment id '{}': {}", key, e)))?;
        let mut record = ExperimentRecord::new(id).with_ready(self.ready);

        if let Some(chosen) = vendor_key(&self.combination_chosen) {
            match VariationId::new(chosen) {
                Ok(variation) => record = record.with_chosen_variation(variation),
                Err(e) => warn!(experiment_id = %key, error = %e, "Ignoring chosen variation"),
            }
        }

        for (variation, name) in self.comb_n {
            match VariationId::new(variation) {
                Ok(variation) => record = record.with_variation_name(variation, name),
                Err(e) => warn!(experiment_id = %key, error = %e, "Ignoring variation name"),
            }
        }

        Ok(record)
    }
}

/// Sort key reproducing the vendor's table enumeration order
fn table_position(key: &str) -> (bool, u32) {
    match array_index(key) {
        Some(index) => (false, index),
        None => (true, 0),
    }
}

/// Canonical decimal integer keys below `u32::MAX`, as enumerated first by the vendor
fn array_index(key: &str) -> Option<u32> {
    let index: u32 = key.parse().ok()?;
    (index != u32::MAX && index.to_string() == key).then_some(index)
}

/// Normalize a vendor key: non-empty strings and non-zero numbers are keys,
/// everything else (null, "", 0, booleans) means "not set".
fn vendor_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
