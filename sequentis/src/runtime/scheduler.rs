use crate::runtime::task::Runnable;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

/// Ready queue of the single-threaded executor.
///
/// Spawned tasks are pushed here when woken and popped by the thread running
/// [`Runtime::block_on`](crate::Runtime::block_on). The root future is not a
/// queued task: its wake-ups are recorded in a separate flag.
///
/// Wakers may fire from any thread, so parking goes through a condition
/// variable guarded by the queue lock.
pub(crate) struct Scheduler {
    /// Tasks ready to be polled, in wake order.
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,

    /// Set when the root future has been woken.
    root_notified: AtomicBool,

    /// Wakes the driving thread when it is parked.
    condvar: Condvar,

    /// Every spawned task, so shutdown can reach the ones no queue holds.
    tasks: Mutex<Vec<Weak<dyn Runnable>>>,
}

impl Scheduler {
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            root_notified: AtomicBool::new(false),
            condvar: Condvar::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Arc<dyn Runnable>>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a spawned task for [`shutdown`](Self::shutdown).
    ///
    /// Finished tasks are pruned whenever the list is about to grow.
    pub(crate) fn track(&self, task: Weak<dyn Runnable>) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);

        if tasks.len() == tasks.capacity() {
            tasks.retain(|task| task.strong_count() > 0);
        }

        tasks.push(task);
    }

    /// Pushes a task and wakes the driving thread.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        self.lock().push_back(task);
        self.condvar.notify_one();
    }

    /// Pops the oldest ready task.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        self.lock().pop_front()
    }

    /// Records a wake-up of the root future.
    ///
    /// The lock is taken before notifying so a concurrent [`park`](Self::park)
    /// either sees the flag or is already waiting on the condition variable.
    pub(crate) fn notify_root(&self) {
        self.root_notified.store(true, Ordering::Release);
        drop(self.lock());
        self.condvar.notify_one();
    }

    /// Consumes a pending root wake-up.
    pub(crate) fn take_root_notification(&self) -> bool {
        self.root_notified.swap(false, Ordering::AcqRel)
    }

    /// Returns `true` if a task or the root future is waiting to be polled.
    pub(crate) fn has_work(&self) -> bool {
        self.root_notified.load(Ordering::Acquire) || !self.lock().is_empty()
    }

    /// Parks the driving thread until work arrives or `timeout` elapses.
    ///
    /// With no timeout the thread sleeps until the next wake-up.
    pub(crate) fn park(&self, timeout: Option<Duration>) {
        let queue = self.lock();

        if !queue.is_empty() || self.root_notified.load(Ordering::Acquire) {
            return;
        }

        match timeout {
            Some(timeout) => {
                drop(
                    self.condvar
                        .wait_timeout(queue, timeout)
                        .unwrap_or_else(PoisonError::into_inner),
                );
            }
            None => {
                drop(
                    self.condvar
                        .wait(queue)
                        .unwrap_or_else(PoisonError::into_inner),
                );
            }
        }
    }

    /// Drops the future of every unfinished task, then empties the queue.
    ///
    /// Queued tasks hold the scheduler and a pending task may hold its own
    /// waker, so neither is freed by dropping the runtime alone.
    pub(crate) fn shutdown(&self) {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));

        for task in tasks.iter().filter_map(Weak::upgrade) {
            task.shutdown();
        }

        while let Some(task) = self.pop() {
            drop(task);
        }
    }
}
