//! Time utilities.
//!
//! Timers are owned by the runtime and measured on its clock, which is
//! either real time or a paused clock that jumps to the next deadline
//! whenever the runtime is idle (see
//! [`RuntimeBuilder::start_paused`](crate::RuntimeBuilder::start_paused)).
//!
//! It includes:
//! - [`sleep`] and [`sleep_until`] for scheduling timers,
//! - [`now`] for reading the runtime clock.

pub(crate) mod clock;
pub(crate) mod driver;

mod sleep;

use crate::runtime::context;

use std::time::Instant;

#[doc(inline)]
pub use sleep::{Sleep, sleep, sleep_until};

/// Returns the current instant of the runtime clock.
///
/// Outside of a runtime this is [`Instant::now`].
pub fn now() -> Instant {
    context::with_current(|handle| handle.clock.now()).unwrap_or_else(Instant::now)
}
