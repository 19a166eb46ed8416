use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::Waker;
use std::time::Instant;

/// An entry in the timer queue.
///
/// Stored in a binary heap ordered by deadline. The entry may be cancelled
/// before it fires.
pub(crate) struct TimerEntry {
    /// The time at which the timer fires.
    pub(crate) deadline: Instant,

    /// Waker notified when the deadline is reached.
    pub(crate) waker: Waker,

    /// Cancellation flag shared with the associated sleep future.
    pub(crate) cancelled: Arc<AtomicBool>,
}

impl TimerEntry {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(AtomicOrdering::Acquire)
    }
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline.eq(&other.deadline)
    }
}

impl Ord for TimerEntry {
    /// Reversed so that `BinaryHeap<TimerEntry>` pops the earliest deadline.
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of pending timers owned by a runtime.
pub(crate) struct TimerDriver {
    timers: Mutex<BinaryHeap<TimerEntry>>,
}

impl TimerDriver {
    pub(crate) fn new() -> Self {
        Self {
            timers: Mutex::new(BinaryHeap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BinaryHeap<TimerEntry>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn register(&self, entry: TimerEntry) {
        self.lock().push(entry);
    }

    /// Wakes every timer whose deadline is at or before `now`.
    ///
    /// Cancelled entries are discarded without waking. Returns the number
    /// of timers fired.
    pub(crate) fn fire_expired(&self, now: Instant) -> usize {
        let mut expired = Vec::new();

        {
            let mut timers = self.lock();

            while timers.peek().is_some_and(|entry| entry.deadline <= now) {
                if let Some(entry) = timers.pop()
                    && !entry.is_cancelled()
                {
                    expired.push(entry.waker);
                }
            }
        }

        let fired = expired.len();
        for waker in expired {
            waker.wake();
        }

        fired
    }

    /// Returns the earliest deadline among live timers.
    ///
    /// Cancelled entries at the top of the heap are dropped on the way.
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        let mut timers = self.lock();

        while timers.peek().is_some_and(TimerEntry::is_cancelled) {
            timers.pop();
        }

        timers.peek().map(|entry| entry.deadline)
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::AtomicUsize;
    use std::task::Wake;
    use std::time::Duration;

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, AtomicOrdering::SeqCst);
        }
    }

    fn entry(deadline: Instant, counter: &Arc<CountingWaker>) -> (TimerEntry, Arc<AtomicBool>) {
        let cancelled = Arc::new(AtomicBool::new(false));
        let entry = TimerEntry {
            deadline,
            waker: Waker::from(counter.clone()),
            cancelled: cancelled.clone(),
        };
        (entry, cancelled)
    }

    #[test]
    fn fires_only_expired_timers() {
        let driver = TimerDriver::new();
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let now = Instant::now();

        driver.register(entry(now + Duration::from_secs(2), &counter).0);
        driver.register(entry(now + Duration::from_secs(1), &counter).0);

        assert_eq!(driver.fire_expired(now), 0);
        assert_eq!(driver.fire_expired(now + Duration::from_secs(1)), 1);
        assert_eq!(counter.0.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(driver.next_deadline(), Some(now + Duration::from_secs(2)));
    }

    #[test]
    fn cancelled_timers_are_skipped() {
        let driver = TimerDriver::new();
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let now = Instant::now();

        let (early, cancelled) = entry(now + Duration::from_millis(10), &counter);
        driver.register(early);
        driver.register(entry(now + Duration::from_millis(20), &counter).0);

        cancelled.store(true, AtomicOrdering::Release);

        assert_eq!(driver.next_deadline(), Some(now + Duration::from_millis(20)));
        assert_eq!(driver.fire_expired(now + Duration::from_secs(1)), 1);
        assert_eq!(driver.len(), 0);
    }
}
