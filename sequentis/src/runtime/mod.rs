//! Core runtime components.
//!
//! This module contains the single-threaded executor that drives the work
//! queue and everything it needs to make progress:
//! - the [`Runtime`] entry point and its [`RuntimeBuilder`],
//! - the ready queue used to schedule spawned tasks,
//! - the thread-local context that lets timers and `spawn` find the
//!   runtime without explicit handles,
//! - spawned tasks and their join handles.

mod core;
mod scheduler;

pub(crate) mod builder;
pub(crate) mod context;

pub mod task;

pub use self::core::Runtime;
pub(crate) use self::core::Handle;
