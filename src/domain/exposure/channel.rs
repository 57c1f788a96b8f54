//! Reporting channels

use serde::{Deserialize, Serialize};
use std::fmt;

/// The analytics path an exposure is reported through.
///
/// Each channel deduplicates independently, so the same experiment can be
/// reported once as a trait and once as a track event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Replayed as traits on a single identify call
    Replay,
    /// Emitted as one track event per exposure
    Listen,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replay => "replay",
            Self::Listen => "listen",
        }
    }

    pub fn all() -> [Channel; 2] {
        [Self::Replay, Self::Listen]
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
