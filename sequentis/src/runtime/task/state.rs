/// Task is idle and not scheduled.
///
/// The task is waiting on an external event (timer, join handle, ...).
pub(crate) const IDLE: usize = 0;

/// Task is sitting in the ready queue.
pub(crate) const QUEUED: usize = 1;

/// Task is currently being polled.
pub(crate) const RUNNING: usize = 2;

/// Task has completed execution.
///
/// The future has returned `Poll::Ready` and has been dropped.
pub(crate) const COMPLETED: usize = 3;

/// Task has been woken while running.
///
/// It is re-queued once the current poll returns.
pub(crate) const NOTIFIED: usize = 4;
