//! Analytics client implementations

mod recording;

pub use recording::{AnalyticsCall, RecordingAnalyticsClient};
