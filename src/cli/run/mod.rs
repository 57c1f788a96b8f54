//! Run command - simulates a visitor session against recorded vendor state

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde_json::json;
use tracing::info;

use crate::config::{AppConfig, IntegrationOptions};
use crate::domain::OrderCompleted;
use crate::infrastructure::logging;
use crate::infrastructure::observability::init_metrics;
use crate::infrastructure::{
    ExperimentIntegration, InMemoryExperimentSource, QueueScheduler, RecordingAnalyticsClient,
    RecordingConversionSink, VendorSnapshot,
};

/// Arguments for the run command
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Vendor snapshot present when the integration initializes
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Number of virtual page transitions to simulate
    #[arg(long, default_value_t = 0)]
    pub pages: usize,

    /// Snapshot to load before each page transition, in order
    #[arg(long = "page-snapshot")]
    pub page_snapshots: Vec<PathBuf>,

    /// Disable identify-based replay (overrides config)
    #[arg(long)]
    pub no_replay: bool,

    /// Enable track-based reporting (overrides config)
    #[arg(long)]
    pub listen: bool,

    /// Treat the site as a single-page application (overrides config)
    #[arg(long)]
    pub spa: bool,

    /// Vendor account id (overrides config)
    #[arg(long)]
    pub account_id: Option<String>,

    /// Send an order-completed conversion with this total after the last page
    #[arg(long)]
    pub order_total: Option<f64>,
}

impl RunArgs {
    fn integration_options(&self, base: IntegrationOptions) -> IntegrationOptions {
        let mut options = base;

        if self.no_replay {
            options.replay = false;
        }

        if self.listen {
            options.listen = true;
        }

        if self.spa {
            options.is_spa = true;
        }

        if let Some(account_id) = &self.account_id {
            options.account_id = Some(account_id.clone());
        }

        options
    }

    fn page_count(&self) -> usize {
        self.pages.max(self.page_snapshots.len())
    }
}

/// Run a simulated session
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging)?;
    let metrics = init_metrics(&config.metrics);

    let options = args.integration_options(config.integration.clone());
    let source = Arc::new(InMemoryExperimentSource::from_snapshot(
        VendorSnapshot::from_path(&args.snapshot)?,
    ));
    let analytics = Arc::new(RecordingAnalyticsClient::new());
    let conversions = Arc::new(RecordingConversionSink::new());
    let scheduler = Arc::new(QueueScheduler::new());

    let integration = ExperimentIntegration::new(
        options,
        source.clone(),
        analytics.clone(),
        scheduler.clone(),
    )
    .with_conversion_sink(conversions.clone());

    let mut out = std::io::stdout().lock();

    integration.initialize()?;
    scheduler.run_pending().await;
    write_calls(&mut out, 0, &analytics)?;

    for page in 1..=args.page_count() {
        if let Some(path) = args.page_snapshots.get(page - 1) {
            source.replace_snapshot(VendorSnapshot::from_path(path)?);
            info!(page, snapshot = %path.display(), "Loaded page snapshot");
        }

        integration.page();
        scheduler.run_pending().await;
        write_calls(&mut out, page, &analytics)?;
    }

    if let Some(total) = args.order_total {
        integration.order_completed(&OrderCompleted::new().with_total(total));
        scheduler.run_pending().await;

        for amount in conversions.take_amounts() {
            let line = json!({ "page": args.page_count(), "type": "revenue_conversion", "amount": amount });
            writeln!(out, "{}", line)?;
        }
    }

    if let Some(metrics) = metrics {
        eprintln!("{}", metrics.render());
    }

    Ok(())
}

fn write_calls(
    out: &mut impl Write,
    page: usize,
    analytics: &RecordingAnalyticsClient,
) -> anyhow::Result<()> {
    for call in analytics.take_calls() {
        let mut line = serde_json::to_value(&call)?;

        if let Some(object) = line.as_object_mut() {
            object.insert("page".to_string(), json!(page));
        }

        writeln!(out, "{}", line)?;
    }

    Ok(())
}
