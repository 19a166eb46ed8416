//! Synchronization primitives for Sequentis.
//!
//! - [`CancellationToken`]: a shared, permanent stop signal that a
//!   [`Runner`](crate::Runner) observes between tasks.

mod cancel;

pub use cancel::{CancellationToken, Cancelled};
