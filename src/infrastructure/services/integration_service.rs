//! Experiment integration lifecycle
//!
//! Wires initialization and virtual page transitions to the exposure
//! reporters. All reporting is deferred through the [`Scheduler`]; nothing
//! reaches the analytics client inline with the triggering call.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::reporter_service::ExposureReporter;
use crate::config::IntegrationOptions;
use crate::domain::analytics::AnalyticsClient;
use crate::domain::conversion::{ConversionSink, OrderCompleted};
use crate::domain::experiment::ExperimentSource;
use crate::domain::exposure::{Channel, SessionState};
use crate::domain::scheduler::Scheduler;
use crate::domain::DomainError;
use crate::infrastructure::exposure::ExposureCollector;
use crate::infrastructure::observability::record_revenue_conversion;

/// Lifecycle state of the integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationState {
    Uninitialized,
    Active,
}

/// The lifecycle controller for one visitor session
pub struct ExperimentIntegration {
    options: IntegrationOptions,
    reporter: Arc<ExposureReporter>,
    scheduler: Arc<dyn Scheduler>,
    conversions: Option<Arc<dyn ConversionSink>>,
    state: Mutex<IntegrationState>,
    ready: watch::Sender<bool>,
}

impl ExperimentIntegration {
    /// Create an integration with a fresh session
    pub fn new(
        options: IntegrationOptions,
        source: Arc<dyn ExperimentSource>,
        analytics: Arc<dyn AnalyticsClient>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let collector = Arc::new(ExposureCollector::with_session(SessionState::new()));
        let (ready, _) = watch::channel(false);

        Self {
            options,
            reporter: Arc::new(ExposureReporter::new(source, collector, analytics)),
            scheduler,
            conversions: None,
            state: Mutex::new(IntegrationState::Uninitialized),
            ready,
        }
    }

    /// Forward completed orders to the vendor's revenue goal
    pub fn with_conversion_sink(mut self, sink: Arc<dyn ConversionSink>) -> Self {
        self.conversions = Some(sink);
        self
    }

    pub fn options(&self) -> &IntegrationOptions {
        &self.options
    }

    pub fn state(&self) -> IntegrationState {
        *self.lock_state()
    }

    pub fn collector(&self) -> &Arc<ExposureCollector> {
        self.reporter.collector()
    }

    /// Receiver that flips to `true` once initialization completes
    pub fn ready(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Activate the integration.
    ///
    /// Sets the session's SPA mode from the options, schedules the enabled
    /// reporting passes and signals readiness. Runs once per session; a
    /// second call fails without side effects.
    pub fn initialize(&self) -> Result<(), DomainError> {
        {
            let mut state = self.lock_state();

            if *state == IntegrationState::Active {
                return Err(DomainError::conflict("Experiment integration already initialized"));
            }

            *state = IntegrationState::Active;
        }

        info!(
            account_id = self.options.account_id.as_deref().unwrap_or("-"),
            replay = self.options.replay,
            listen = self.options.listen,
            spa = self.options.is_spa,
            "Initializing experiment integration"
        );

        self.collector().set_spa_mode(self.options.is_spa);
        let scheduled = self.schedule_enabled_passes();

        self.ready.send_replace(true);
        debug!(scheduled, "Experiment integration ready");

        Ok(())
    }

    /// Handle a virtual page transition.
    ///
    /// Only meaningful in SPA mode once active: re-runs the enabled passes so
    /// experiments bucketed since the last pass are reported. Returns the
    /// number of passes scheduled.
    pub fn page(&self) -> usize {
        if self.state() != IntegrationState::Active {
            debug!("Page event before initialization ignored");
            return 0;
        }

        if !self.collector().spa_mode() {
            return 0;
        }

        let scheduled = self.schedule_enabled_passes();
        debug!(scheduled, "Scheduled reporting for page transition");
        scheduled
    }

    /// Credit a completed order to the vendor's revenue goal.
    ///
    /// Returns whether a conversion was scheduled.
    pub fn order_completed(&self, order: &OrderCompleted) -> bool {
        if self.state() != IntegrationState::Active {
            debug!("Order event before initialization ignored");
            return false;
        }

        let Some(sink) = self.conversions.clone() else {
            debug!("No conversion sink configured; order ignored");
            return false;
        };

        let amount = order.conversion_amount();
        let order_id = order.order_id.clone();

        self.scheduler.schedule(Box::pin(async move {
            match sink.revenue_conversion(amount).await {
                Ok(()) => {
                    record_revenue_conversion(true);
                    info!(amount, order_id = order_id.as_deref(), "Revenue conversion sent");
                }
                Err(e) => {
                    record_revenue_conversion(false);
                    warn!(amount, error = %e, "Revenue conversion failed");
                }
            }
        }));

        true
    }

    fn schedule_enabled_passes(&self) -> usize {
        let mut scheduled = 0;

        if self.options.replay {
            self.schedule_pass(Channel::Replay);
            scheduled += 1;
        }

        if self.options.listen {
            self.schedule_pass(Channel::Listen);
            scheduled += 1;
        }

        scheduled
    }

    fn schedule_pass(&self, channel: Channel) {
        let reporter = self.reporter.clone();

        self.scheduler.schedule(Box::pin(async move {
            reporter.report(channel).await;
        }));
    }

    fn lock_state(&self) -> MutexGuard<'_, IntegrationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ExperimentIntegration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentIntegration")
            .field("options", &self.options)
            .field("state", &self.state())
            .field("conversions", &self.conversions.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversion::MockConversionSink;
    use crate::domain::experiment::{ExperimentId, ExperimentRecord, VariationId};
    use crate::infrastructure::analytics::{AnalyticsCall, RecordingAnalyticsClient};
    use crate::infrastructure::experiment::InMemoryExperimentSource;
    use crate::infrastructure::scheduler::QueueScheduler;
    use mockall::predicate::eq;

    fn exp_id(id: &str) -> ExperimentId {
        ExperimentId::new(id).unwrap()
    }

    fn var_id(id: &str) -> VariationId {
        VariationId::new(id).unwrap()
    }

    fn ready_record(id: &str, variation: &str, name: &str) -> ExperimentRecord {
        ExperimentRecord::new(exp_id(id))
            .with_ready(true)
            .with_chosen_variation(var_id(variation))
            .with_variation_name(var_id(variation), name)
    }

    struct Harness {
        source: Arc<InMemoryExperimentSource>,
        analytics: Arc<RecordingAnalyticsClient>,
        scheduler: Arc<QueueScheduler>,
        integration: ExperimentIntegration,
    }

    fn harness(options: IntegrationOptions, source: InMemoryExperimentSource) -> Harness {
        let source = Arc::new(source);
        let analytics = Arc::new(RecordingAnalyticsClient::new());
        let scheduler = Arc::new(QueueScheduler::new());
        let integration = ExperimentIntegration::new(
            options,
            source.clone(),
            analytics.clone(),
            scheduler.clone(),
        );

        Harness {
            source,
            analytics,
            scheduler,
            integration,
        }
    }

    fn spa_options() -> IntegrationOptions {
        IntegrationOptions::default().with_listen(true).with_spa(true)
    }

    fn blue_button() -> InMemoryExperimentSource {
        InMemoryExperimentSource::new()
            .with_experiment(ready_record("7", "2", "Blue Button"))
            .with_managed_ids(vec![exp_id("7")])
    }

    mod initialize_tests {
        use super::*;

        #[tokio::test]
        async fn test_reporting_is_deferred() {
            let h = harness(spa_options(), blue_button());

            h.integration.initialize().unwrap();

            assert_eq!(h.integration.state(), IntegrationState::Active);
            assert!(h.analytics.calls().is_empty());
            assert_eq!(h.scheduler.len(), 2);

            assert_eq!(h.scheduler.run_pending().await, 2);
            assert_eq!(h.analytics.identifies().len(), 1);
            assert_eq!(h.analytics.tracks().len(), 1);
        }

        #[tokio::test]
        async fn test_defaults_schedule_replay_only() {
            let h = harness(IntegrationOptions::default(), blue_button());

            h.integration.initialize().unwrap();
            assert_eq!(h.scheduler.len(), 1);

            h.scheduler.run_pending().await;
            let calls = h.analytics.calls();
            assert_eq!(calls.len(), 1);
            assert!(matches!(calls[0], AnalyticsCall::Identify { .. }));
        }

        #[tokio::test]
        async fn test_nothing_enabled_schedules_nothing() {
            let options = IntegrationOptions::default().with_replay(false);
            let h = harness(options, blue_button());

            h.integration.initialize().unwrap();

            assert!(h.scheduler.is_empty());
            assert!(h.integration.is_ready());
        }

        #[tokio::test]
        async fn test_initialize_runs_once() {
            let h = harness(spa_options(), blue_button());

            h.integration.initialize().unwrap();
            let err = h.integration.initialize().unwrap_err();

            assert!(matches!(err, DomainError::Conflict { .. }));
            assert_eq!(h.scheduler.len(), 2);
        }

        #[tokio::test]
        async fn test_ready_signal() {
            let h = harness(spa_options(), blue_button());
            let mut ready = h.integration.ready();

            assert!(!*ready.borrow());
            h.integration.initialize().unwrap();

            ready.changed().await.unwrap();
            assert!(*ready.borrow_and_update());
            assert!(h.integration.is_ready());
        }

        #[tokio::test]
        async fn test_spa_mode_follows_options() {
            let h = harness(spa_options(), blue_button());
            assert!(!h.integration.collector().spa_mode());

            h.integration.initialize().unwrap();
            assert!(h.integration.collector().spa_mode());
        }
    }

    mod page_tests {
        use super::*;

        #[tokio::test]
        async fn test_page_before_initialize_is_ignored() {
            let h = harness(spa_options(), blue_button());

            assert_eq!(h.integration.page(), 0);
            assert!(h.scheduler.is_empty());
        }

        #[tokio::test]
        async fn test_page_outside_spa_mode_is_ignored() {
            let options = IntegrationOptions::default().with_listen(true);
            let h = harness(options, blue_button());

            h.integration.initialize().unwrap();
            h.scheduler.run_pending().await;

            assert_eq!(h.integration.page(), 0);
            assert!(h.scheduler.is_empty());
        }

        #[tokio::test]
        async fn test_page_reports_only_new_experiments() {
            let h = harness(spa_options(), blue_button());

            h.integration.initialize().unwrap();
            h.scheduler.run_pending().await;
            h.analytics.take_calls();

            // Route change with nothing new: passes run, nothing is sent.
            assert_eq!(h.integration.page(), 2);
            h.scheduler.run_pending().await;
            assert!(h.analytics.calls().is_empty());

            // The vendor buckets the visitor into another experiment.
            h.source.insert(ready_record("9", "1", "Control"));

            h.integration.page();
            h.scheduler.run_pending().await;

            let identifies = h.analytics.identifies();
            assert_eq!(identifies.len(), 1);
            assert_eq!(identifies[0].len(), 1);
            assert_eq!(identifies[0]["Experiment: 9"], "Control");

            let tracks = h.analytics.tracks();
            assert_eq!(tracks.len(), 1);
            assert_eq!(tracks[0].properties["experimentId"], "9");
        }

        #[tokio::test]
        async fn test_late_readiness_is_picked_up_on_next_page() {
            let source = InMemoryExperimentSource::new()
                .with_experiment(ExperimentRecord::new(exp_id("5")));
            let h = harness(spa_options(), source);

            h.integration.initialize().unwrap();
            h.scheduler.run_pending().await;
            assert!(h.analytics.calls().is_empty());

            h.source.insert(ready_record("5", "2", "Variation 2"));
            h.integration.page();
            h.scheduler.run_pending().await;

            assert_eq!(h.analytics.identifies().len(), 1);
            assert_eq!(h.analytics.tracks().len(), 1);

            h.integration.page();
            h.scheduler.run_pending().await;
            assert_eq!(h.analytics.calls().len(), 2);
        }

        #[tokio::test]
        async fn test_preview_suppresses_all_reporting() {
            let h = harness(spa_options(), blue_button().with_previewing(true));

            h.integration.initialize().unwrap();
            h.scheduler.run_pending().await;
            h.integration.page();
            h.scheduler.run_pending().await;

            assert!(h.analytics.calls().is_empty());
        }
    }

    mod order_tests {
        use super::*;

        #[tokio::test]
        async fn test_order_completed_forwards_total() {
            let mut sink = MockConversionSink::new();
            sink.expect_revenue_conversion()
                .with(eq(42.5))
                .times(1)
                .returning(|_| Ok(()));

            let h = harness(IntegrationOptions::default(), blue_button());
            let integration = h.integration.with_conversion_sink(Arc::new(sink));

            integration.initialize().unwrap();
            let order = OrderCompleted::new().with_order_id("o-1").with_total(42.5);
            assert!(integration.order_completed(&order));

            h.scheduler.run_pending().await;
        }

        #[tokio::test]
        async fn test_order_failure_is_swallowed() {
            let mut sink = MockConversionSink::new();
            sink.expect_revenue_conversion()
                .with(eq(0.0))
                .times(1)
                .returning(|_| Err(DomainError::internal("vendor queue unavailable")));

            let h = harness(IntegrationOptions::default(), blue_button());
            let integration = h.integration.with_conversion_sink(Arc::new(sink));

            integration.initialize().unwrap();
            assert!(integration.order_completed(&OrderCompleted::new()));

            h.scheduler.run_pending().await;
        }

        #[tokio::test]
        async fn test_order_before_initialize_is_ignored() {
            let mut sink = MockConversionSink::new();
            sink.expect_revenue_conversion().times(0);

            let h = harness(IntegrationOptions::default(), blue_button());
            let integration = h.integration.with_conversion_sink(Arc::new(sink));

            assert!(!integration.order_completed(&OrderCompleted::new().with_total(10.0)));
            assert!(h.scheduler.is_empty());
        }

        #[tokio::test]
        async fn test_order_without_sink_is_ignored() {
            let h = harness(IntegrationOptions::default(), blue_button());

            h.integration.initialize().unwrap();
            h.scheduler.run_pending().await;

            assert!(!h.integration.order_completed(&OrderCompleted::new().with_total(10.0)));
            assert!(h.scheduler.is_empty());
        }
    }
}
