//! Single-threaded work queue scheduler

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::domain::scheduler::{ScheduledTask, Scheduler};

/// Queues tasks until [`QueueScheduler::run_pending`] is awaited.
///
/// Tasks run one at a time in FIFO order, which makes reporting passes
/// deterministic for tests and for replaying a recorded session.
#[derive(Default)]
pub struct QueueScheduler {
    queue: Mutex<VecDeque<ScheduledTask>>,
}

impl QueueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Run queued tasks until the queue is empty, including tasks scheduled
    /// by the tasks being run. Returns how many tasks ran.
    pub async fn run_pending(&self) -> usize {
        let mut ran = 0;

        loop {
            // Guard must be dropped before awaiting the task.
            let next = self.lock().pop_front();

            let Some(task) = next else {
                break;
            };

            task.await;
            ran += 1;
        }

        if ran > 0 {
            debug!(tasks = ran, "Drained scheduler queue");
        }

        ran
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ScheduledTask>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for QueueScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueScheduler")
            .field("pending", &self.len())
            .finish()
    }
}

impl Scheduler for QueueScheduler {
    fn schedule(&self, task: ScheduledTask) {
        self.lock().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn push(log: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> ScheduledTask {
        let log = log.clone();
        Box::pin(async move {
            log.lock().unwrap().push(label);
        })
    }

    #[tokio::test]
    async fn test_nothing_runs_until_drained() {
        let scheduler = QueueScheduler::new();
        let log = recorder();

        scheduler.schedule(push(&log, "first"));
        scheduler.schedule(push(&log, "second"));

        assert_eq!(scheduler.len(), 2);
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(scheduler.run_pending().await, 2);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert!(scheduler.is_empty());
    }

    #[tokio::test]
    async fn test_tasks_scheduled_while_draining_also_run() {
        let scheduler = Arc::new(QueueScheduler::new());
        let log = recorder();

        let inner_scheduler = scheduler.clone();
        let inner_log = log.clone();
        scheduler.schedule(Box::pin(async move {
            inner_log.lock().unwrap().push("outer");
            inner_scheduler.schedule(push(&inner_log, "inner"));
        }));

        assert_eq!(scheduler.run_pending().await, 2);
        assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[test]
    fn test_empty_drain() {
        let scheduler = QueueScheduler::new();
        assert_eq!(tokio_test::block_on(scheduler.run_pending()), 0);
    }
}
