use crate::runtime::scheduler::Scheduler;
use crate::runtime::task::Task;

use std::sync::Arc;
use std::task::Wake;

impl Wake for Task {
    /// Reschedules the task on its scheduler.
    fn wake(self: Arc<Self>) {
        self.schedule();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.clone().schedule();
    }
}

/// Waker of the future passed to [`block_on`](crate::Runtime::block_on).
///
/// The root future is polled in place by the driving thread, so waking it
/// only raises a flag on the scheduler.
pub(crate) struct RootWaker {
    scheduler: Arc<Scheduler>,
}

impl RootWaker {
    pub(crate) fn new(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }
}

impl Wake for RootWaker {
    fn wake(self: Arc<Self>) {
        self.scheduler.notify_root();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.scheduler.notify_root();
    }
}
