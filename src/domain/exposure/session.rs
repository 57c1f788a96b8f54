//! Session-scoped exposure state and the collection algorithm

use tracing::debug;

use super::cache::ExposureCache;
use super::channel::Channel;
use crate::domain::experiment::{ExperimentId, ExperimentSource};

/// State that survives virtual page transitions but not full page loads.
///
/// One instance per visitor session; a fresh instance starts with empty
/// caches and SPA mode off.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    spa_mode: bool,
    cache: ExposureCache,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spa_mode(mut self, spa_mode: bool) -> Self {
        self.spa_mode = spa_mode;
        self
    }

    pub fn spa_mode(&self) -> bool {
        self.spa_mode
    }

    pub fn set_spa_mode(&mut self, spa_mode: bool) {
        self.spa_mode = spa_mode;
    }

    pub fn cache(&self) -> &ExposureCache {
        &self.cache
    }

    /// Ids that should be reported on `channel` right now.
    ///
    /// Outside SPA mode the vendor's managed list is returned as is and the
    /// cache is untouched. In SPA mode every id not yet cached for the channel
    /// is returned, and those that are a genuine exposure (ready with a chosen
    /// variation) are cached so later passes skip them. Ids that are not ready
    /// stay uncached and come back on the next pass.
    pub fn collect_exposures(
        &mut self,
        source: &dyn ExperimentSource,
        channel: Channel,
    ) -> Vec<ExperimentId> {
        if !self.spa_mode {
            return source.managed_ids().unwrap_or_default();
        }

        let Some(ids) = source.experiment_ids() else {
            debug!(%channel, "Experiment table not published yet");
            return Vec::new();
        };

        let seen = self.cache.seen_mut(channel);
        let mut exposures = Vec::new();

        for id in ids {
            if seen.contains(&id) {
                continue;
            }

            let exposed = source
                .experiment(&id)
                .map(|record| record.is_exposed())
                .unwrap_or(false);

            if exposed {
                seen.insert(id.clone());
            }

            debug!(%channel, experiment_id = %id, cached = exposed, "Collected exposure");
            exposures.push(id);
        }

        exposures
    }
}
