//! In-memory implementation of the experiment source

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::snapshot::VendorSnapshot;
use crate::domain::experiment::{ExperimentId, ExperimentRecord, ExperimentSource};

#[derive(Debug, Default)]
struct ExperimentTable {
    order: Vec<ExperimentId>,
    records: HashMap<ExperimentId, ExperimentRecord>,
}

impl ExperimentTable {
    fn upsert(&mut self, record: ExperimentRecord) {
        let id = record.id().clone();

        if !self.records.contains_key(&id) {
            self.order.push(id.clone());
        }

        self.records.insert(id, record);
    }
}

#[derive(Debug, Default)]
struct SourceState {
    table: Option<ExperimentTable>,
    managed_ids: Option<Vec<ExperimentId>>,
    previewing: bool,
}

/// Mutable, thread-safe stand-in for the vendor's page globals.
///
/// Starts with no table published, the way the page looks before the vendor
/// script has run. Writers may update it at any time between passes.
#[derive(Debug, Default)]
pub struct InMemoryExperimentSource {
    state: RwLock<SourceState>,
}

impl InMemoryExperimentSource {
    /// Create a source with no experiment table published
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from a parsed vendor snapshot
    pub fn from_snapshot(snapshot: VendorSnapshot) -> Self {
        let source = Self::new();
        source.replace_snapshot(snapshot);
        source
    }

    /// Add an experiment, publishing the table if needed
    pub fn with_experiment(self, record: ExperimentRecord) -> Self {
        self.insert(record);
        self
    }

    /// Set the vendor-managed id list
    pub fn with_managed_ids(self, ids: Vec<ExperimentId>) -> Self {
        self.set_managed_ids(Some(ids));
        self
    }

    /// Set the preview flag
    pub fn with_previewing(self, previewing: bool) -> Self {
        self.set_previewing(previewing);
        self
    }

    /// Insert or replace an experiment record
    pub fn insert(&self, record: ExperimentRecord) {
        self.write()
            .table
            .get_or_insert_with(ExperimentTable::default)
            .upsert(record);
    }

    /// Publish an empty experiment table
    pub fn publish_empty_table(&self) {
        self.write().table.get_or_insert_with(ExperimentTable::default);
    }

    pub fn set_managed_ids(&self, ids: Option<Vec<ExperimentId>>) {
        self.write().managed_ids = ids;
    }

    pub fn set_previewing(&self, previewing: bool) {
        self.write().previewing = previewing;
    }

    /// Swap the whole state for the contents of a snapshot.
    ///
    /// Malformed entries are dropped by the conversion; the rest of the
    /// snapshot still replaces the current state.
    pub fn replace_snapshot(&self, snapshot: VendorSnapshot) {
        let records = snapshot.records();
        let managed_ids = snapshot.managed_ids();

        let table = records.map(|records| {
            let mut table = ExperimentTable::default();
            for record in records {
                table.upsert(record);
            }
            table
        });

        let mut state = self.write();
        state.table = table;
        state.managed_ids = managed_ids;
        state.previewing = snapshot.debug;
    }

    /// Remove everything, as after a full page load
    pub fn clear(&self) {
        *self.write() = SourceState::default();
    }

    fn read(&self) -> RwLockReadGuard<'_, SourceState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SourceState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExperimentSource for InMemoryExperimentSource {
    fn experiment_ids(&self) -> Option<Vec<ExperimentId>> {
        self.read().table.as_ref().map(|table| table.order.clone())
    }

    fn experiment(&self, id: &ExperimentId) -> Option<ExperimentRecord> {
        self.read()
            .table
            .as_ref()
            .and_then(|table| table.records.get(id).cloned())
    }

    fn managed_ids(&self) -> Option<Vec<ExperimentId>> {
        self.read().managed_ids.clone()
    }

    fn is_previewing(&self) -> bool {
        self.read().previewing
    }
}
