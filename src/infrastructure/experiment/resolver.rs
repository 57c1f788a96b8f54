//! Resolves an experiment to the display name of the visitor's variation

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::domain::experiment::{ExperimentId, ExperimentSource};

/// Why an experiment could not be resolved to a variation name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The vendor has not published its experiment table
    SourceAbsent,
    /// An operator is previewing a campaign; nothing may be reported
    Previewing,
    UnknownExperiment,
    NotReady,
    NoChosenVariation,
    /// The chosen variation has no entry in the name table
    UnnamedVariation,
}

impl UnresolvedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceAbsent => "source_absent",
            Self::Previewing => "previewing",
            Self::UnknownExperiment => "unknown_experiment",
            Self::NotReady => "not_ready",
            Self::NoChosenVariation => "no_chosen_variation",
            Self::UnnamedVariation => "unnamed_variation",
        }
    }
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving an experiment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Unresolved(UnresolvedReason),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// The variation name, if resolved
    pub fn into_name(self) -> Option<String> {
        match self {
            Self::Resolved(name) => Some(name),
            Self::Unresolved(_) => None,
        }
    }
}

/// Looks up variation names in the live experiment source
#[derive(Debug, Clone)]
pub struct VariationResolver {
    source: Arc<dyn ExperimentSource>,
}

impl VariationResolver {
    pub fn new(source: Arc<dyn ExperimentSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn ExperimentSource> {
        &self.source
    }

    /// Resolve the variation name the visitor sees for `id`.
    ///
    /// Never fails hard: every missing piece of vendor state maps to an
    /// [`UnresolvedReason`].
    pub fn resolve(&self, id: &ExperimentId) -> Resolution {
        let resolution = self.lookup(id);

        if let Resolution::Unresolved(reason) = &resolution {
            debug!(experiment_id = %id, %reason, "Variation not resolvable");
        }

        resolution
    }

    fn lookup(&self, id: &ExperimentId) -> Resolution {
        use UnresolvedReason::*;

        if self.source.experiment_ids().is_none() {
            return Resolution::Unresolved(SourceAbsent);
        }

        if self.source.is_previewing() {
            return Resolution::Unresolved(Previewing);
        }

        let Some(record) = self.source.experiment(id) else {
            return Resolution::Unresolved(UnknownExperiment);
        };

        if !record.is_ready() {
            return Resolution::Unresolved(NotReady);
        }

        let Some(variation) = record.chosen_variation() else {
            return Resolution::Unresolved(NoChosenVariation);
        };

        match record.variation_name(variation) {
            Some(name) => Resolution::Resolved(name.to_string()),
            None => Resolution::Unresolved(UnnamedVariation),
        }
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

    fn var_id(id: &str) -> VariationId {
        VariationId::new(id).unwrap()
    }

    fn blue_button() -> ExperimentRecord {
        ExperimentRecord::new(exp_id("7"))
            .with_ready(true)
            .with_chosen_variation(var_id("2"))
            .with_variation_name(var_id("1"), "Control")
            .with_variation_name(var_id("2"), "Blue Button")
    }

    fn resolver(source: InMemoryExperimentSource) -> VariationResolver {
        VariationResolver::new(Arc::new(source))
    }

    #[test]
    fn test_resolves_chosen_variation_name() {
        let resolver = resolver(InMemoryExperimentSource::new().with_experiment(blue_button()));

        assert_eq!(
            resolver.resolve(&exp_id("7")),
            Resolution::Resolved("Blue Button".to_string())
        );
    }

    #[test]
    fn test_source_absent() {
        let resolver = resolver(InMemoryExperimentSource::new());

        assert_eq!(
            resolver.resolve(&exp_id("7")),
            Resolution::Unresolved(UnresolvedReason::SourceAbsent)
        );
    }

    #[test]
    fn test_unknown_experiment() {
        let resolver = resolver(InMemoryExperimentSource::new().with_experiment(blue_button()));

        assert_eq!(
            resolver.resolve(&exp_id("8")),
            Resolution::Unresolved(UnresolvedReason::UnknownExperiment)
        );
    }

    #[test]
    fn test_not_ready() {
        let resolver = resolver(
            InMemoryExperimentSource::new().with_experiment(blue_button().with_ready(false)),
        );

        assert_eq!(
            resolver.resolve(&exp_id("7")),
            Resolution::Unresolved(UnresolvedReason::NotReady)
        );
    }

    #[test]
    fn test_no_chosen_variation() {
        let resolver = resolver(
            InMemoryExperimentSource::new()
                .with_experiment(ExperimentRecord::new(exp_id("7")).with_ready(true)),
        );

        assert_eq!(
            resolver.resolve(&exp_id("7")),
            Resolution::Unresolved(UnresolvedReason::NoChosenVariation)
        );
    }

    #[test]
    fn test_unnamed_variation() {
        let resolver = resolver(
            InMemoryExperimentSource::new().with_experiment(
                ExperimentRecord::new(exp_id("7"))
                    .with_ready(true)
                    .with_chosen_variation(var_id("3")),
            ),
        );

        assert_eq!(
            resolver.resolve(&exp_id("7")).into_name(),
            None
        );
    }

    #[test]
    fn test_preview_suppresses_ready_experiment() {
        let source = Arc::new(InMemoryExperimentSource::new().with_experiment(blue_button()));
        let resolver = VariationResolver::new(source.clone());

        source.set_previewing(true);
        assert_eq!(
            resolver.resolve(&exp_id("7")),
            Resolution::Unresolved(UnresolvedReason::Previewing)
        );

        source.set_previewing(false);
        assert!(resolver.resolve(&exp_id("7")).is_resolved());
    }
}
