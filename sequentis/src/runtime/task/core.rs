use super::JoinHandle;
use super::handle::JoinState;
use super::state::{COMPLETED, IDLE, NOTIFIED, QUEUED, RUNNING};
use crate::runtime::Handle;
use crate::runtime::context;
use crate::runtime::scheduler::Scheduler;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

/// A unit of work the scheduler can poll.
///
/// The trait erases the output type of spawned futures so the ready queue
/// can hold them as `Arc<dyn Runnable>`.
pub(crate) trait Runnable: Send + Sync {
    /// Polls the task once.
    fn run(self: Arc<Self>);

    /// Drops the future without completing it. Later wakes are ignored.
    fn shutdown(&self);
}

type BoxedFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A spawned future managed by the runtime.
///
/// The future's output is delivered through a [`JoinHandle`]; the task
/// itself only tracks scheduling state. The future is dropped as soon as
/// it completes.
pub(crate) struct Task {
    /// The wrapped future, `None` once completed.
    future: Mutex<Option<BoxedFuture>>,

    /// Lifecycle state (IDLE, QUEUED, ...).
    state: AtomicUsize,

    /// Ready queue used for rescheduling on wake.
    scheduler: Arc<Scheduler>,
}

impl Task {
    /// Creates a task in the `QUEUED` state.
    ///
    /// The caller is responsible for pushing it to the scheduler.
    pub(crate) fn new<F>(future: F, scheduler: Arc<Scheduler>) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            future: Mutex::new(Some(Box::pin(future))),
            state: AtomicUsize::new(QUEUED),
            scheduler,
        }
    }

    /// Polls the task.
    ///
    /// Moves the task to `RUNNING`, polls the future, then:
    /// - `Poll::Pending`: back to `IDLE`, or re-queued if woken meanwhile.
    /// - `Poll::Ready`: drops the future and marks the task `COMPLETED`.
    fn poll_once(self: Arc<Self>) {
        if self
            .state
            .compare_exchange(QUEUED, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);

        let mut slot = self.future.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(future) = slot.as_mut() else {
            self.state.store(COMPLETED, Ordering::Release);
            return;
        };

        let poll = future.as_mut().poll(&mut cx);

        match poll {
            Poll::Pending => {
                drop(slot);

                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    // Woken while running.
                    self.state.store(QUEUED, Ordering::Release);
                    self.scheduler.push(self.clone());
                }
            }
            Poll::Ready(()) => {
                *slot = None;
                self.state.store(COMPLETED, Ordering::Release);
            }
        }
    }

    /// Schedules the task for another poll.
    ///
    /// An `IDLE` task is queued; a `RUNNING` task is marked `NOTIFIED` so it
    /// is re-queued right after its current poll.
    pub(crate) fn schedule(self: Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.scheduler.push(self.clone());
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }
}

impl Runnable for Task {
    fn run(self: Arc<Self>) {
        self.poll_once();
    }

    fn shutdown(&self) {
        self.state.store(COMPLETED, Ordering::Release);

        let future = self
            .future
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        drop(future);
    }
}

/// Spawns `future` on the given runtime handle.
pub(crate) fn spawn_on<F>(handle: &Handle, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let state = Arc::new(JoinState::new());
    let completion = state.clone();

    let task = Arc::new(Task::new(
        async move {
            let output = future.await;
            completion.complete(output);
        },
        handle.scheduler.clone(),
    ));

    let runnable: Arc<dyn Runnable> = task.clone();
    handle.scheduler.track(Arc::downgrade(&runnable));
    handle.scheduler.push(task);

    JoinHandle::new(state)
}

/// Spawns a future onto the current runtime.
///
/// The future starts running as soon as the runtime gets control back,
/// independently of whether the returned [`JoinHandle`] is awaited. This is
/// how a producer hands the queue a task that is already in flight.
///
/// # Panics
///
/// Panics if called outside the context of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// let handle = sequentis::task::spawn(async { 40 + 2 });
/// assert_eq!(handle.await, 42);
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    context::with_current(|handle| spawn_on(handle, future))
        .expect("spawn must be called within the context of a runtime")
}
