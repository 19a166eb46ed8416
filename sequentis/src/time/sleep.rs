use crate::runtime::context;
use crate::time::driver::TimerEntry;
use crate::time::now;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

/// Creates a future that completes after the given duration.
///
/// The deadline is measured on the runtime clock, so under a paused clock
/// the sleep completes as soon as the runtime is otherwise idle.
///
/// # Panics
///
/// The returned future panics if polled outside of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    let start = now();

    match start.checked_add(duration) {
        Some(deadline) => Sleep::new(deadline),
        None => Sleep::new(far_future(start)),
    }
}

/// Roughly 30 years from `start`, the deadline used when a sleep overflows.
fn far_future(start: Instant) -> Instant {
    start + Duration::from_secs(86_400 * 365 * 30)
}

/// Creates a future that completes at `deadline`.
pub fn sleep_until(deadline: Instant) -> Sleep {
    Sleep::new(deadline)
}

/// A future that completes once a deadline is reached.
///
/// The timer is registered with the runtime on first poll, and registered
/// again if the future is moved to a different task. Dropping the future
/// cancels the timer.
#[derive(Debug)]
pub struct Sleep {
    /// Point in time when the sleep completes.
    deadline: Instant,

    /// Waker the current timer registration will notify.
    registered: Option<Waker>,

    /// Cancellation flag shared with the timer driver.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    fn new(deadline: Instant) -> Self {
        Self {
            deadline,
            registered: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the instant at which the sleep completes.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let reached = context::with_current(|handle| {
            if handle.clock.now() >= this.deadline {
                return true;
            }

            let stale = this
                .registered
                .as_ref()
                .is_none_or(|waker| !waker.will_wake(cx.waker()));

            if stale {
                // Retire the previous registration before adding a new one.
                this.cancelled.store(true, Ordering::Release);
                this.cancelled = Arc::new(AtomicBool::new(false));
                this.registered = Some(cx.waker().clone());

                handle.timers.register(TimerEntry {
                    deadline: this.deadline,
                    waker: cx.waker().clone(),
                    cancelled: this.cancelled.clone(),
                });
            }

            false
        })
        .expect("Sleep polled outside of runtime");

        if reached {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    }
}

impl Drop for Sleep {
    /// Cancels the pending timer, if any.
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
