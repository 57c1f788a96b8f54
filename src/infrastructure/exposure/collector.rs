//! Shared handle over the session's exposure state

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::experiment::{ExperimentId, ExperimentSource};
use crate::domain::exposure::{Channel, SessionState};

/// Owns the [`SessionState`] so scheduled reporting passes can share it.
///
/// The lock is held only for the synchronous body of a collection.
#[derive(Debug, Default)]
pub struct ExposureCollector {
    session: Mutex<SessionState>,
}

impl ExposureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: SessionState) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }

    pub fn spa_mode(&self) -> bool {
        self.lock().spa_mode()
    }

    pub fn set_spa_mode(&self, spa_mode: bool) {
        self.lock().set_spa_mode(spa_mode);
    }

    /// See [`SessionState::collect_exposures`]
    pub fn collect(&self, source: &dyn ExperimentSource, channel: Channel) -> Vec<ExperimentId> {
        self.lock().collect_exposures(source, channel)
    }

    /// Ids cached for `channel`, in the order they were cached
    pub fn cached(&self, channel: Channel) -> Vec<ExperimentId> {
        self.lock().cache().seen(channel).iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::experiment::{ExperimentRecord, VariationId};
    use crate::infrastructure::experiment::InMemoryExperimentSource;

    fn exp_id(id: &str) -> ExperimentId {
        ExperimentId::new(id).unwrap()
    }

    #[test]
    fn test_spa_mode_defaults_off() {
        let collector = ExposureCollector::new();
        assert!(!collector.spa_mode());

        collector.set_spa_mode(true);
        assert!(collector.spa_mode());
    }

    #[test]
    fn test_collect_updates_shared_cache() {
        let source = InMemoryExperimentSource::new().with_experiment(
            ExperimentRecord::new(exp_id("7"))
                .with_ready(true)
                .with_chosen_variation(VariationId::new("2").unwrap()),
        );
        let collector = ExposureCollector::with_session(SessionState::new().with_spa_mode(true));

        assert_eq!(collector.collect(&source, Channel::Listen), vec![exp_id("7")]);
        assert_eq!(collector.cached(Channel::Listen), vec![exp_id("7")]);
        assert!(collector.cached(Channel::Replay).is_empty());
        assert!(collector.collect(&source, Channel::Listen).is_empty());
    }
}
