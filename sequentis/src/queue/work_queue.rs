use super::{Order, Task};

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;

/// An ordered sequence of pending [`Task`]s.
///
/// Tasks keep their insertion order. They can be removed from the front
/// ([`Order::Fifo`]) or from the back ([`Order::Lifo`]). Reading from an
/// empty queue returns `None`, which is distinct from a task that resolves
/// without a value.
///
/// The queue has a single owner: draining takes `&mut self`, so two
/// runners cannot consume the same queue at once.
pub struct WorkQueue<V, E> {
    tasks: VecDeque<Task<V, E>>,
}

impl<V, E> WorkQueue<V, E> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Creates an empty queue with room for `capacity` tasks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a task.
    ///
    /// Accepts a [`Task`] or anything convertible into one, such as the
    /// [`JoinHandle`](crate::task::JoinHandle) of a spawned future.
    pub fn add(&mut self, task: impl Into<Task<V, E>>) {
        self.tasks.push_back(task.into());
    }

    /// Appends a plain value as an already-resolved task.
    pub fn add_value(&mut self, value: V) {
        self.add(Task::resolved(value));
    }

    /// Removes one task, or returns `None` if the queue is empty.
    ///
    /// [`Order::Fifo`] takes the oldest task, [`Order::Lifo`] the newest.
    pub fn read_task(&mut self, order: Order) -> Option<Task<V, E>> {
        match order {
            Order::Fifo => self.tasks.pop_front(),
            Order::Lifo => self.tasks.pop_back(),
        }
    }

    /// Removes one task in the default order (FIFO).
    pub fn next_task(&mut self) -> Option<Task<V, E>> {
        self.read_task(Order::default())
    }

    /// Number of tasks not yet removed.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drops every remaining task.
    ///
    /// Spawned tasks keep running; only their handles are discarded.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl<V, E> WorkQueue<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    /// Appends a lazy future as a pending task.
    pub fn add_future<F>(&mut self, future: F)
    where
        F: Future<Output = Result<V, E>> + Send + 'static,
    {
        self.add(Task::from_future(future));
    }
}

impl<V, E> Default for WorkQueue<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> Extend<Task<V, E>> for WorkQueue<V, E> {
    fn extend<I: IntoIterator<Item = Task<V, E>>>(&mut self, iter: I) {
        self.tasks.extend(iter);
    }
}

impl<V, E> FromIterator<Task<V, E>> for WorkQueue<V, E> {
    fn from_iter<I: IntoIterator<Item = Task<V, E>>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

impl<V, E> fmt::Debug for WorkQueue<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = self.tasks.iter().filter(|task| task.is_resolved()).count();

        f.debug_struct("WorkQueue")
            .field("len", &self.tasks.len())
            .field("resolved", &resolved)
            .field("pending", &(self.tasks.len() - resolved))
            .finish()
    }
}
