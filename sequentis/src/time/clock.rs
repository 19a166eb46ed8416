use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Time source of a runtime.
///
/// A real clock reads [`Instant::now`]. A paused clock starts at the
/// instant it was created and only moves through [`advance_to`](Self::advance_to).
#[derive(Clone, Debug)]
pub(crate) struct Clock {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Origin of the paused clock.
    base: Instant,

    /// Time elapsed since `base`, for a paused clock.
    elapsed: Option<Mutex<Duration>>,
}

impl Clock {
    pub(crate) fn real() -> Self {
        Self {
            inner: Arc::new(Inner {
                base: Instant::now(),
                elapsed: None,
            }),
        }
    }

    pub(crate) fn paused() -> Self {
        Self {
            inner: Arc::new(Inner {
                base: Instant::now(),
                elapsed: Some(Mutex::new(Duration::ZERO)),
            }),
        }
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.inner.elapsed.is_some()
    }

    pub(crate) fn now(&self) -> Instant {
        match &self.inner.elapsed {
            Some(elapsed) => {
                self.inner.base + *elapsed.lock().unwrap_or_else(PoisonError::into_inner)
            }
            None => Instant::now(),
        }
    }

    /// Moves a paused clock forward to `deadline`.
    ///
    /// Never moves the clock backwards. No-op on a real clock.
    pub(crate) fn advance_to(&self, deadline: Instant) {
        let Some(elapsed) = &self.inner.elapsed else {
            return;
        };

        let target = deadline.saturating_duration_since(self.inner.base);
        let mut elapsed = elapsed.lock().unwrap_or_else(PoisonError::into_inner);

        if target > *elapsed {
            *elapsed = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_clock_only_moves_forward() {
        let clock = Clock::paused();
        let start = clock.now();

        clock.advance_to(start + Duration::from_secs(2));
        assert_eq!(clock.now() - start, Duration::from_secs(2));

        clock.advance_to(start + Duration::from_secs(1));
        assert_eq!(clock.now() - start, Duration::from_secs(2));
    }

    #[test]
    fn paused_clock_does_not_follow_wall_time() {
        let clock = Clock::paused();
        let start = clock.now();

        std::thread::sleep(Duration::from_millis(5));

        assert_eq!(clock.now(), start);
    }

    #[test]
    fn real_clock_ignores_advance() {
        let clock = Clock::real();
        let far = Instant::now() + Duration::from_secs(3600);

        clock.advance_to(far);

        assert!(!clock.is_paused());
        assert!(clock.now() < far);
    }
}
