//! Spawned task primitives.
//!
//! This module defines how background futures are represented and driven
//! by the runtime:
//! - task state management,
//! - waker integration for spawned tasks and the root future,
//! - join handles for awaiting task completion.
//!
//! Most users interact with it through [`spawn`] and [`JoinHandle`].

pub(crate) mod state;
pub(crate) mod waker;

mod core;
mod handle;

pub(crate) use self::core::{Runnable, Task, spawn_on};

pub use self::core::spawn;
pub use handle::JoinHandle;
