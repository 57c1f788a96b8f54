//! Deferred task scheduling

use futures::future::BoxFuture;
use std::fmt::Debug;

/// A unit of deferred work
pub type ScheduledTask = BoxFuture<'static, ()>;

/// Runs tasks at the next scheduling opportunity, never inline.
///
/// Reporting passes go through a scheduler so the analytics client has
/// finished its own setup before it is called.
pub trait Scheduler: Send + Sync + Debug {
    fn schedule(&self, task: ScheduledTask);
}
