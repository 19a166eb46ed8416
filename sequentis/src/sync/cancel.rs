use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

/// A cancellation signal shared between a controller and the work it stops.
///
/// Clones share the same state: cancelling any clone cancels them all.
/// Cancellation is permanent.
///
/// A [`Runner`](crate::Runner) configured with a token checks it before
/// reading each task; the task currently being awaited is not interrupted.
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Set once [`CancellationToken::cancel`] has been called.
    cancelled: AtomicBool,

    /// Tasks awaiting [`CancellationToken::cancelled`].
    waiters: Mutex<Waiters>,
}

/// Registered wakers, keyed so a dropped [`Cancelled`] can remove its own.
#[derive(Default)]
struct Waiters {
    next_key: usize,
    entries: Vec<(usize, Waker)>,
}

impl Waiters {
    /// Stores `waker` under `key`, or under a fresh key if `key` is `None`.
    fn register(&mut self, key: Option<usize>, waker: &Waker) -> usize {
        if let Some(key) = key
            && let Some((_, current)) = self.entries.iter_mut().find(|(k, _)| *k == key)
        {
            if !current.will_wake(waker) {
                current.clone_from(waker);
            }
            return key;
        }

        let key = self.next_key;
        self.next_key = self.next_key.wrapping_add(1);
        self.entries.push((key, waker.clone()));
        key
    }

    fn remove(&mut self, key: usize) {
        if let Some(index) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.swap_remove(index);
        }
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the token and wakes every task waiting on it.
    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::AcqRel) {
            return;
        }

        let waiters = std::mem::take(
            &mut self
                .inner
                .waiters
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries,
        );

        for (_, waker) in waiters {
            waker.wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Returns a future that completes once the token is cancelled.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            key: None,
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Future returned by [`CancellationToken::cancelled`].
///
/// Dropping it before completion unregisters its waker.
#[derive(Debug)]
pub struct Cancelled<'a> {
    token: &'a CancellationToken,

    /// Slot of this future's waker in the token's waiter list.
    key: Option<usize>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    /// Registers the waker before re-checking the flag so a concurrent
    /// `cancel` is never missed.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();

        if this.token.is_cancelled() {
            return Poll::Ready(());
        }

        let key = this
            .token
            .inner
            .waiters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .register(this.key, cx.waker());
        this.key = Some(key);

        if this.token.is_cancelled() {
            return Poll::Ready(());
        }

        Poll::Pending
    }
}

impl Drop for Cancelled<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.token
                .inner
                .waiters
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiter_count(token: &CancellationToken) -> usize {
        token.inner.waiters.lock().expect("lock").entries.len()
    }

    #[test]
    fn dropped_cancelled_futures_unregister() {
        let token = CancellationToken::new();
        let mut cx = Context::from_waker(Waker::noop());

        for _ in 0..1000 {
            let mut cancelled = Box::pin(token.cancelled());
            assert!(cancelled.as_mut().poll(&mut cx).is_pending());
        }

        assert_eq!(waiter_count(&token), 0);
    }

    #[test]
    fn repolling_keeps_a_single_slot() {
        let token = CancellationToken::new();
        let mut cx = Context::from_waker(Waker::noop());

        let mut cancelled = Box::pin(token.cancelled());
        for _ in 0..10 {
            assert!(cancelled.as_mut().poll(&mut cx).is_pending());
        }
        assert_eq!(waiter_count(&token), 1);

        token.cancel();
        assert_eq!(waiter_count(&token), 0);
        assert!(cancelled.as_mut().poll(&mut cx).is_ready());
    }

    #[test]
    fn dropping_one_waiter_keeps_the_others() {
        let token = CancellationToken::new();
        let mut cx = Context::from_waker(Waker::noop());

        let mut first = Box::pin(token.cancelled());
        let mut second = Box::pin(token.cancelled());
        assert!(first.as_mut().poll(&mut cx).is_pending());
        assert!(second.as_mut().poll(&mut cx).is_pending());

        drop(first);
        assert_eq!(waiter_count(&token), 1);

        token.cancel();
        assert!(second.as_mut().poll(&mut cx).is_ready());
    }
}
