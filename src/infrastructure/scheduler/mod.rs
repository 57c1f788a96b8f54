//! Scheduler implementations

mod queue;
mod tokio_scheduler;

pub use queue::QueueScheduler;
pub use tokio_scheduler::TokioScheduler;
