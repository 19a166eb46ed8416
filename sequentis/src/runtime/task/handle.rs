use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

/// Completion slot shared between a spawned task and its [`JoinHandle`].
pub(crate) struct JoinState<T> {
    slot: Mutex<Slot<T>>,
}

struct Slot<T> {
    /// Output of the task, until taken by the handle.
    output: Option<T>,

    /// Set once the output has been handed to the handle.
    taken: bool,

    /// Waker of the task awaiting the handle.
    waiter: Option<Waker>,
}

impl<T> JoinState<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                output: None,
                taken: false,
                waiter: None,
            }),
        }
    }

    /// Stores the task output and wakes the awaiting handle, if any.
    pub(crate) fn complete(&self, output: T) {
        let waiter = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            slot.output = Some(output);
            slot.waiter.take()
        };

        if let Some(waiter) = waiter {
            waiter.wake();
        }
    }

    fn is_finished(&self) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.output.is_some() || slot.taken
    }
}

/// A handle to a spawned task.
///
/// A `JoinHandle` resolves to the output of the task once it has completed.
/// Dropping the handle does **not** cancel the task; it keeps running and
/// its output is discarded.
pub struct JoinHandle<T> {
    state: Arc<JoinState<T>>,
}

impl<T> JoinHandle<T> {
    pub(crate) fn new(state: Arc<JoinState<T>>) -> Self {
        Self { state }
    }

    /// Returns `true` if the task has produced its output.
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }
}

impl<T> Future for JoinHandle<T> {
    type Output = T;

    /// Returns the task output if available, otherwise registers the waker.
    ///
    /// Output and waker share one lock, so a completion racing with this
    /// poll is never missed.
    ///
    /// # Panics
    ///
    /// Panics if polled again after returning `Poll::Ready`.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut slot = self.state.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(output) = slot.output.take() {
            slot.taken = true;
            return Poll::Ready(output);
        }

        assert!(!slot.taken, "JoinHandle polled after completion");

        slot.waiter = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl<T> std::fmt::Debug for JoinHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoinHandle")
            .field("finished", &self.is_finished())
            .finish()
    }
}
