//! # Sequentis
//!
//! **Sequentis** is a sequential async work queue for the **Nebula** ecosystem.
//!
//! Producers fill a [`WorkQueue`] with tasks: plain values, lazy futures, or
//! work already running on the runtime. A [`Runner`] then drains the queue
//! one task at a time, awaiting each before reading the next and reporting
//! every resolved value to a callback. Results are reported in queue order,
//! never in completion order.
//!
//! The crate ships the small single-threaded runtime needed to drive it:
//!
//! - A **`block_on` executor** with [`task::spawn`] and join handles
//! - **Timers** ([`time::sleep`]) on a real or paused clock
//! - A **[`CancellationToken`]** the runner observes between tasks
//! - **Macros** `#[sequentis::main]` and `#[sequentis::test]`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sequentis::time::sleep;
//! use sequentis::{Runner, Task, WorkQueue};
//! use std::time::Duration;
//!
//! #[sequentis::main]
//! async fn main() {
//!     let mut queue: WorkQueue<String, ()> = WorkQueue::new();
//!
//!     queue.add_value("ready".to_string());
//!     queue.add(Task::spawn(async {
//!         sleep(Duration::from_millis(100)).await;
//!         Ok("later".to_string())
//!     }));
//!
//!     Runner::new()
//!         .run(&mut queue, |value| println!("{value}"))
//!         .await
//!         .expect("no task fails");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`queue`]: The work queue and its tasks
//! - [`task`]: Spawning background futures
//! - [`time`]: Sleep and the runtime clock
//! - [`sync`]: Cancellation

mod error;
mod runner;
mod runtime;

pub mod queue;
pub mod sync;
pub mod time;

pub use error::RunError;
pub use queue::{Order, Outcome, Task, WorkQueue};
pub use runner::{Drained, Runner};
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::Runtime;
pub use sync::CancellationToken;

pub use sequentis_macros::*;
