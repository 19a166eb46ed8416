use crate::runtime::task::{self, JoinHandle};

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// What a [`Task`] resolves to: a value, no value, or a failure.
pub type Outcome<V, E> = Result<Option<V>, E>;

/// A unit of asynchronous work stored in a [`WorkQueue`](crate::WorkQueue).
///
/// A task is either already resolved (a plain value wrapped at enqueue time)
/// or pending (a future that will produce the outcome). Which one is decided
/// when the task is built, never by inspecting the value afterwards.
///
/// Awaiting a task yields an [`Outcome`]: `Ok(Some(value))`, `Ok(None)` for
/// a task that completes without a value, or `Err(error)`.
///
/// # Examples
///
/// ```rust,ignore
/// let plain: Task<f64, ()> = Task::resolved(3.14159);
/// let later: Task<f64, ()> = Task::from_future(async { Ok(2.71828) });
/// ```
pub struct Task<V, E> {
    inner: Inner<V, E>,
}

enum Inner<V, E> {
    /// Outcome already available; taken on first poll.
    Resolved(Option<Outcome<V, E>>),
    Pending(BoxFuture<Outcome<V, E>>),
}

// No pin projection reaches `V` or `E`; the pending future is boxed.
impl<V, E> Unpin for Task<V, E> {}

impl<V, E> Task<V, E> {
    /// Wraps a plain value into an already-resolved task.
    pub fn resolved(value: V) -> Self {
        Self {
            inner: Inner::Resolved(Some(Ok(Some(value)))),
        }
    }

    /// An already-resolved task that carries no value.
    pub fn empty() -> Self {
        Self {
            inner: Inner::Resolved(Some(Ok(None))),
        }
    }

    /// An already-failed task.
    pub fn rejected(error: E) -> Self {
        Self {
            inner: Inner::Resolved(Some(Err(error))),
        }
    }

    /// Returns `true` if the outcome is available without waiting.
    pub fn is_resolved(&self) -> bool {
        matches!(self.inner, Inner::Resolved(_))
    }
}

impl<V, E> Task<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    /// Wraps a future into a pending task.
    ///
    /// The future is lazy: it makes no progress until the task is awaited.
    /// Use [`Task::spawn`] for work that should start right away.
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<V, E>> + Send + 'static,
    {
        Self::from_outcome(async move { future.await.map(Some) })
    }

    /// Wraps a future that may complete without a value.
    pub fn from_outcome<F>(future: F) -> Self
    where
        F: Future<Output = Outcome<V, E>> + Send + 'static,
    {
        Self {
            inner: Inner::Pending(Box::pin(future)),
        }
    }

    /// Spawns `future` on the current runtime and wraps its handle.
    ///
    /// The work starts immediately and runs concurrently with whatever is
    /// draining the queue; the task only observes its result.
    ///
    /// # Panics
    ///
    /// Panics if called outside the context of a running runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<V, E>> + Send + 'static,
    {
        task::spawn(future).into()
    }
}

impl<V, E> From<JoinHandle<Result<V, E>>> for Task<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    fn from(handle: JoinHandle<Result<V, E>>) -> Self {
        Self::from_future(handle)
    }
}

impl<V, E> Future for Task<V, E> {
    type Output = Outcome<V, E>;

    /// # Panics
    ///
    /// Panics if a resolved task is polled after returning its outcome.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().inner {
            Inner::Resolved(outcome) => {
                Poll::Ready(outcome.take().expect("Task polled after completion"))
            }
            Inner::Pending(future) => future.as_mut().poll(cx),
        }
    }
}

impl<V, E> fmt::Debug for Task<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.inner {
            Inner::Resolved(_) => "resolved",
            Inner::Pending(_) => "pending",
        };

        f.debug_struct("Task").field("state", &state).finish()
    }
}
