use super::Runtime;
use crate::time::clock::Clock;

/// Number of spawned tasks polled between two polls of the root future.
const DEFAULT_EVENT_INTERVAL: usize = 61;

/// Builder for configuring and creating a runtime.
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .start_paused(true)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    /// Whether the clock starts paused.
    start_paused: bool,

    /// Spawned tasks polled per scheduler tick.
    event_interval: usize,
}

impl RuntimeBuilder {
    /// Creates a builder with a real-time clock.
    pub fn new() -> Self {
        Self {
            start_paused: false,
            event_interval: DEFAULT_EVENT_INTERVAL,
        }
    }

    /// Starts the runtime with a paused clock.
    ///
    /// A paused clock never moves on its own. Whenever the runtime has
    /// nothing left to poll and a timer is pending, the clock jumps straight
    /// to the earliest deadline. Sleeps complete instantly in wall time while
    /// keeping their relative order, which makes timer-based tests
    /// deterministic.
    pub fn start_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }

    /// Sets how many spawned tasks are polled before the root future gets
    /// another chance to run.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn event_interval(mut self, n: usize) -> Self {
        assert!(n > 0, "event_interval must be > 0");

        self.event_interval = n;
        self
    }

    /// Builds the runtime with the configured options.
    pub fn build(self) -> Runtime {
        let clock = if self.start_paused {
            Clock::paused()
        } else {
            Clock::real()
        };

        Runtime::new(clock, self.event_interval)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
