use crate::error::RunError;
use crate::queue::{Order, WorkQueue};
use crate::sync::CancellationToken;

use tracing::{debug, trace, warn};

/// Drains a [`WorkQueue`] one task at a time.
///
/// The runner removes a task, waits for it to finish, hands its value to
/// the callback and only then reads the next task. At most one task is in
/// flight, so callbacks fire in read order even when a later task would
/// have finished first.
///
/// A runner only holds configuration; nothing carries over between runs.
///
/// # Examples
///
/// ```rust,ignore
/// let mut queue = WorkQueue::new();
/// queue.add_value(3.14159);
/// queue.add(Task::spawn(async {
///     sleep(Duration::from_secs(1)).await;
///     Ok::<_, ()>(2.71828)
/// }));
///
/// Runner::new().run(&mut queue, |value| println!("{value}")).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Runner {
    /// End of the queue tasks are read from.
    order: Order,

    /// Checked before each read.
    cancel: Option<CancellationToken>,
}

/// Summary of a completed drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drained {
    /// Tasks read and awaited.
    pub tasks: usize,

    /// Callback invocations, i.e. tasks that resolved to a value.
    pub delivered: usize,
}

impl Runner {
    /// Creates a runner that reads in FIFO order and cannot be cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the end of the queue tasks are read from.
    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Stops the drain once `token` is cancelled.
    ///
    /// The token is checked before each read, never while a task is being
    /// awaited.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Drains `queue`, calling `on_result` with every resolved value.
    ///
    /// Tasks that complete without a value are awaited but not reported.
    /// The run ends when the queue reports empty.
    ///
    /// # Errors
    ///
    /// - [`RunError::Task`] with the error of the first failing task. Tasks
    ///   after it are neither awaited nor reported and stay in the queue.
    /// - [`RunError::Cancelled`] if the cancellation token fires.
    pub async fn run<V, E, F>(
        &self,
        queue: &mut WorkQueue<V, E>,
        mut on_result: F,
    ) -> Result<Drained, RunError<E>>
    where
        F: FnMut(V),
    {
        let mut drained = Drained::default();

        debug!(queued = queue.len(), order = ?self.order, "drain started");

        loop {
            if self
                .cancel
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                debug!(
                    tasks = drained.tasks,
                    remaining = queue.len(),
                    "drain cancelled"
                );
                return Err(RunError::Cancelled);
            }

            let Some(task) = queue.read_task(self.order) else {
                debug!(
                    tasks = drained.tasks,
                    delivered = drained.delivered,
                    "drain finished"
                );
                return Ok(drained);
            };

            trace!(remaining = queue.len(), ?task, "awaiting task");

            let outcome = task.await;
            drained.tasks += 1;

            match outcome {
                Ok(Some(value)) => {
                    on_result(value);
                    drained.delivered += 1;
                }
                Ok(None) => trace!("task completed without a value"),
                Err(error) => {
                    warn!(
                        tasks = drained.tasks,
                        remaining = queue.len(),
                        "task failed, aborting drain"
                    );
                    return Err(RunError::Task(error));
                }
            }
        }
    }

    /// Drains `queue` without observing the values.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub async fn drain<V, E>(&self, queue: &mut WorkQueue<V, E>) -> Result<Drained, RunError<E>> {
        self.run(queue, |_| {}).await
    }
}
