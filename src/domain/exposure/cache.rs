//! Per-channel record of experiments already reported

use std::collections::HashSet;

use super::channel::Channel;
use crate::domain::experiment::ExperimentId;

/// Insertion-ordered set of experiment ids.
///
/// Grows monotonically; there is no removal.
#[derive(Debug, Clone, Default)]
pub struct SeenExperiments {
    order: Vec<ExperimentId>,
    index: HashSet<ExperimentId>,
}

impl SeenExperiments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the id was not seen before
    pub fn insert(&mut self, id: ExperimentId) -> bool {
        if !self.index.insert(id.clone()) {
            return false;
        }

        self.order.push(id);
        true
    }

    pub fn contains(&self, id: &ExperimentId) -> bool {
        self.index.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in the order they were first cached
    pub fn iter(&self) -> impl Iterator<Item = &ExperimentId> {
        self.order.iter()
    }
}

/// Dedup cache: one [`SeenExperiments`] per reporting channel
#[derive(Debug, Clone, Default)]
pub struct ExposureCache {
    seen_for_identify: SeenExperiments,
    seen_for_track: SeenExperiments,
}

impl ExposureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, channel: Channel) -> &SeenExperiments {
        match channel {
            Channel::Replay => &self.seen_for_identify,
            Channel::Listen => &self.seen_for_track,
        }
    }

    pub fn seen_mut(&mut self, channel: Channel) -> &mut SeenExperiments {
        match channel {
            Channel::Replay => &mut self.seen_for_identify,
            Channel::Listen => &mut self.seen_for_track,
        }
    }
}
