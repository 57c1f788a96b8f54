//! Experiment source trait
//!
//! The vendor owns the experiment table and fills it asynchronously. The
//! bridge only ever reads point-in-time views through this trait and must
//! tolerate missing or partial data on every call.

use std::fmt::Debug;

use super::entity::{ExperimentId, ExperimentRecord};

/// Read access to the vendor's live experiment registry
pub trait ExperimentSource: Send + Sync + Debug {
    /// Keys of the experiment table, in the vendor's enumeration order.
    ///
    /// Returns `None` while the vendor has not published a table yet.
    fn experiment_ids(&self) -> Option<Vec<ExperimentId>>;

    /// Look up a single experiment record
    fn experiment(&self, id: &ExperimentId) -> Option<ExperimentRecord>;

    /// The vendor's own list of experiments it currently manages.
    ///
    /// Used verbatim outside single-page-application mode.
    fn managed_ids(&self) -> Option<Vec<ExperimentId>>;

    /// Whether an operator is previewing/debugging a campaign on this page
    fn is_previewing(&self) -> bool;
}
