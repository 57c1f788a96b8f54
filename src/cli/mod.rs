//! CLI module for the Experiment Exposure Bridge
//!
//! Provides subcommands for working with recorded vendor page state:
//! - `run`: replay a session against a snapshot and print the analytics calls
//! - `validate`: check a snapshot and show how each experiment resolves

pub mod run;
pub mod validate;

use clap::{Parser, Subcommand};

/// Experiment Exposure Bridge - Replays A/B testing exposures into analytics
#[derive(Parser)]
#[command(name = "exposure-bridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Simulate a visitor session and print every analytics call as JSON
    Run(run::RunArgs),

    /// Parse a vendor snapshot and report each experiment's resolution
    Validate(validate::ValidateArgs),
}
