//! Validate command - checks a vendor snapshot and shows how it resolves

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde_json::json;

use crate::domain::ExperimentSource;
use crate::infrastructure::experiment::{Resolution, VariationResolver};
use crate::infrastructure::{InMemoryExperimentSource, VendorSnapshot};

/// Arguments for the validate command
#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Vendor snapshot to check
    #[arg(long)]
    pub snapshot: PathBuf,
}

/// Validate a snapshot file
pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let snapshot = VendorSnapshot::from_path(&args.snapshot)?;
    let source = Arc::new(InMemoryExperimentSource::from_snapshot(snapshot));

    let mut out = std::io::stdout().lock();
    write_report(&mut out, source)?;

    Ok(())
}

fn write_report(out: &mut impl Write, source: Arc<InMemoryExperimentSource>) -> anyhow::Result<()> {
    let resolver = VariationResolver::new(source.clone());

    for id in source.experiment_ids().unwrap_or_default() {
        let line = match resolver.resolve(&id) {
            Resolution::Resolved(name) => json!({
                "experimentId": id.as_str(),
                "resolved": true,
                "variationName": name,
            }),
            Resolution::Unresolved(reason) => json!({
                "experimentId": id.as_str(),
                "resolved": false,
                "reason": reason.as_str(),
            }),
        };

        writeln!(out, "{}", line)?;
    }

    let managed: Vec<String> = source
        .managed_ids()
        .unwrap_or_default()
        .into_iter()
        .map(String::from)
        .collect();

    let summary = json!({
        "tablePublished": source.experiment_ids().is_some(),
        "managedIds": managed,
        "previewing": source.is_previewing(),
    });
    writeln!(out, "{}", summary)?;

    Ok(())
}
