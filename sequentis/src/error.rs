use thiserror::Error;

/// Why a [`Runner`](crate::Runner) stopped before the queue was empty.
///
/// In both cases the tasks that were not read yet remain in the queue, so
/// a new run can resume where this one stopped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError<E> {
    /// A task failed. The error is the task's own.
    #[error("task failed: {0}")]
    Task(E),

    /// The runner's cancellation token was cancelled.
    #[error("drain cancelled")]
    Cancelled,
}

impl<E> RunError<E> {
    /// Returns the task error, if the run stopped on a failing task.
    pub fn into_task_error(self) -> Option<E> {
        match self {
            Self::Task(error) => Some(error),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
