use super::context::enter_context;
use super::scheduler::Scheduler;
use super::task::waker::RootWaker;
use super::task::{JoinHandle, spawn_on};
use crate::time::clock::Clock;
use crate::time::driver::TimerDriver;

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::Instant;

use tracing::trace;

/// Shared state of a runtime, reachable from the thread-local context.
#[derive(Clone)]
pub(crate) struct Handle {
    /// Ready queue of spawned tasks.
    pub(crate) scheduler: Arc<Scheduler>,

    /// Pending timers.
    pub(crate) timers: Arc<TimerDriver>,

    /// Time source for timers.
    pub(crate) clock: Clock,
}

/// The runtime.
///
/// A single-threaded cooperative executor. The thread calling
/// [`block_on`](Self::block_on) polls the root future, runs spawned tasks
/// and fires timers; nothing runs in parallel. Wakers are thread-safe, so
/// tasks may still be completed from other OS threads.
///
/// Spawned tasks that have not completed when `block_on` returns stay
/// queued and resume on the next `block_on` call. Dropping the runtime
/// drops them without completing them.
pub struct Runtime {
    handle: Handle,

    /// Spawned tasks polled between two polls of the root future.
    event_interval: usize,
}

impl Runtime {
    pub(crate) fn new(clock: Clock, event_interval: usize) -> Self {
        Self {
            handle: Handle {
                scheduler: Arc::new(Scheduler::new()),
                timers: Arc::new(TimerDriver::new()),
                clock,
            },
            event_interval,
        }
    }

    /// Spawns a future onto the runtime.
    ///
    /// The future does not make progress until the runtime is driven by
    /// [`block_on`](Self::block_on).
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        spawn_on(&self.handle, future)
    }

    /// Returns `true` if the runtime clock is paused.
    pub fn is_paused(&self) -> bool {
        self.handle.clock.is_paused()
    }

    /// Runs a future to completion on the current thread.
    ///
    /// This is the synchronous entry point of the runtime (e.g. in `main` or
    /// tests).
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async { 42 });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        enter_context(self.handle.clone(), || self.drive(future))
    }

    /// The event loop.
    ///
    /// Each tick polls the root future if it was woken, then a batch of
    /// spawned tasks, then fires expired timers. When there is nothing to
    /// do, the thread parks until the next timer deadline or wake-up. With
    /// a paused clock, the clock is advanced to the next deadline instead.
    fn drive<F: Future>(&self, future: F) -> F::Output {
        let mut future = pin!(future);

        let scheduler = &self.handle.scheduler;
        let waker = Waker::from(Arc::new(RootWaker::new(scheduler.clone())));
        let mut cx = Context::from_waker(&waker);

        scheduler.notify_root();

        loop {
            if scheduler.take_root_notification()
                && let Poll::Ready(output) = future.as_mut().poll(&mut cx)
            {
                return output;
            }

            let mut polled = 0;
            while polled < self.event_interval {
                let Some(task) = scheduler.pop() else {
                    break;
                };

                task.run();
                polled += 1;
            }

            let fired = self.handle.timers.fire_expired(self.handle.clock.now());

            if polled > 0 || fired > 0 || scheduler.has_work() {
                continue;
            }

            self.park();
        }
    }

    fn park(&self) {
        let clock = &self.handle.clock;

        match self.handle.timers.next_deadline() {
            Some(deadline) if clock.is_paused() => {
                trace!(?deadline, "advancing paused clock");
                clock.advance_to(deadline);
            }
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                self.handle.scheduler.park(Some(timeout));
            }
            None => self.handle.scheduler.park(None),
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.handle.scheduler.shutdown();
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("paused", &self.is_paused())
            .field("pending_timers", &self.handle.timers.len())
            .finish()
    }
}
