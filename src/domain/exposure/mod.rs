//! Exposure domain module
//!
//! Deduplication of experiment exposures across virtual page transitions.

mod cache;
mod channel;
mod session;

pub use cache::{ExposureCache, SeenExperiments};
pub use channel::Channel;
pub use session::SessionState;
