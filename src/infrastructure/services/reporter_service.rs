//! Exposure reporters
//!
//! Turns the exposures collected for a channel into analytics calls: one
//! batched identify for the replay channel, one track event per exposure
//! for the listen channel.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::analytics::{
    experiment_trait_key, AnalyticsClient, ExperimentViewed, TrackEvent, Traits,
};
use crate::domain::experiment::{ExperimentId, ExperimentSource};
use crate::domain::exposure::Channel;
use crate::infrastructure::experiment::{Resolution, VariationResolver};
use crate::infrastructure::exposure::ExposureCollector;
use crate::infrastructure::observability::{record_analytics_call, record_exposures};

/// Outcome of one reporting pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub channel: Channel,
    /// Ids returned by the collector
    pub collected: usize,
    /// Exposures carried by analytics calls the client accepted
    pub reported: usize,
    /// Ids skipped because their variation could not be resolved
    pub unresolved: usize,
    /// Analytics calls that the client rejected
    pub failed_calls: usize,
}

impl PassSummary {
    fn new(channel: Channel, collected: usize) -> Self {
        Self {
            channel,
            collected,
            reported: 0,
            unresolved: 0,
            failed_calls: 0,
        }
    }
}

/// Reports collected exposures to the analytics client
#[derive(Debug, Clone)]
pub struct ExposureReporter {
    resolver: VariationResolver,
    collector: Arc<ExposureCollector>,
    analytics: Arc<dyn AnalyticsClient>,
}

impl ExposureReporter {
    pub fn new(
        source: Arc<dyn ExperimentSource>,
        collector: Arc<ExposureCollector>,
        analytics: Arc<dyn AnalyticsClient>,
    ) -> Self {
        Self {
            resolver: VariationResolver::new(source),
            collector,
            analytics,
        }
    }

    pub fn collector(&self) -> &Arc<ExposureCollector> {
        &self.collector
    }

    /// Collect and resolve exposures for `channel`.
    ///
    /// Returns the resolved `(id, variation name)` pairs in collection order
    /// and how many ids were collected in total.
    fn resolved_exposures(&self, channel: Channel) -> (Vec<(ExperimentId, String)>, usize) {
        let ids = self
            .collector
            .collect(self.resolver.source().as_ref(), channel);
        let collected = ids.len();

        let resolved = ids
            .into_iter()
            .filter_map(|id| match self.resolver.resolve(&id) {
                Resolution::Resolved(name) => Some((id, name)),
                Resolution::Unresolved(_) => None,
            })
            .collect();

        (resolved, collected)
    }

    /// Replay new exposures as traits on a single identify call.
    ///
    /// No call is made when nothing resolves.
    pub async fn replay(&self) -> PassSummary {
        let (resolved, collected) = self.resolved_exposures(Channel::Replay);
        let mut summary = PassSummary::new(Channel::Replay, collected);
        summary.unresolved = collected - resolved.len();

        let traits: Traits = resolved
            .into_iter()
            .map(|(id, name)| (experiment_trait_key(&id), name))
            .collect();

        if traits.is_empty() {
            debug!(collected, "No resolvable exposures to replay");
            record_exposures(Channel::Replay, 0, summary.unresolved);
            return summary;
        }

        let exposures = traits.len();

        match self.analytics.identify(traits).await {
            Ok(()) => {
                record_analytics_call("identify", true);
                summary.reported = exposures;
                info!(
                    experiments = summary.reported,
                    "Replayed experiment exposures as traits"
                );
            }
            Err(e) => {
                record_analytics_call("identify", false);
                summary.failed_calls = 1;
                warn!(error = %e, "Identify call for experiment traits failed");
            }
        }

        record_exposures(Channel::Replay, summary.reported, summary.unresolved);
        summary
    }

    /// Emit one `Experiment Viewed` track event per new exposure
    pub async fn roots(&self) -> PassSummary {
        let (resolved, collected) = self.resolved_exposures(Channel::Listen);
        let mut summary = PassSummary::new(Channel::Listen, collected);
        summary.unresolved = collected - resolved.len();

        for (id, name) in resolved {
            let event = TrackEvent::experiment_viewed(ExperimentViewed::new(&id, name));

            match self.analytics.track(event).await {
                Ok(()) => {
                    record_analytics_call("track", true);
                    summary.reported += 1;
                    debug!(experiment_id = %id, "Tracked experiment exposure");
                }
                Err(e) => {
                    record_analytics_call("track", false);
                    summary.failed_calls += 1;
                    warn!(experiment_id = %id, error = %e, "Track call for experiment failed");
                }
            }
        }

        if summary.reported > 0 {
            info!(
                experiments = summary.reported,
                "Tracked experiment exposures"
            );
        }

        record_exposures(Channel::Listen, summary.reported, summary.unresolved);
        summary
    }

    /// Run the pass for `channel`
    pub async fn report(&self, channel: Channel) -> PassSummary {
        match channel {
            Channel::Replay => self.replay().await,
            Channel::Listen => self.roots().await,
        }
    }
}
