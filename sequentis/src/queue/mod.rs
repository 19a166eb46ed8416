//! The work queue.
//!
//! A [`WorkQueue`] holds [`Task`]s in insertion order and hands them out
//! one at a time from either end. Plain values are wrapped into resolved
//! tasks when they are added, so every element is something that can be
//! awaited.

mod task;
mod work_queue;

pub use task::{Outcome, Task};
pub use work_queue::WorkQueue;

/// The end of the queue a task is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// First in, first out: read the oldest task.
    #[default]
    Fifo,

    /// Last in, first out: read the newest task.
    Lifo,
}
