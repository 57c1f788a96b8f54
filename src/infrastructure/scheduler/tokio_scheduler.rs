//! Scheduler backed by the tokio runtime

use tokio::runtime::Handle;

use crate::domain::scheduler::{ScheduledTask, Scheduler};
use crate::domain::DomainError;

/// Spawns each task on the runtime after yielding once, so it never runs
/// before the caller's current synchronous work has finished.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on
    pub fn current() -> Result<Self, DomainError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| DomainError::configuration(format!("No tokio runtime available: {}", e)))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, task: ScheduledTask) {
        self.handle.spawn(async move {
            tokio::task::yield_now().await;
            task.await;
        });
    }
}
