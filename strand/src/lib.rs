//! # Strand
//!
//! **Strand** is a small task launcher for the **Nebula** ecosystem. It runs
//! units of work on a pool of worker threads and gives the caller a
//! [`JoinHandle`](task::JoinHandle) that acts as a true synchronization
//! barrier: joining never returns before the work has reached a terminal
//! state.
//!
//! It offers:
//!
//! - A **work-stealing worker pool** that picks launched tasks up as soon as a
//!   worker is free
//! - **Blocking and async joins**: [`join`](task::JoinHandle::join) parks the
//!   calling thread, `.await` suspends the calling task
//! - **Failures that are never lost**: a panic or an `Err` is captured as a
//!   [`WorkFailure`] and handed to every joiner
//! - **Group joins** through [`JoinSet`](task::JoinSet)
//! - A [`SharedLog`] for recording what happened, in the order it happened
//! - **Ergonomic macros** like `#[strand::main]` and `#[strand::test]`
//!
//! ## Quick Start
//!
//! ```rust
//! use strand::{Runtime, SharedLog};
//!
//! let runtime = Runtime::new();
//! let log = SharedLog::new();
//!
//! log.append("Hello,");
//!
//! let handle = runtime.launch({
//!     let log = log.clone();
//!     move || log.append("word!")
//! });
//!
//! // The task's append is visible once join returns.
//! handle.join().unwrap();
//! assert_eq!(log.snapshot(), ["Hello,", "word!"]);
//! ```
//!
//! ## Modules
//!
//! - [`task`] — Launching work from inside tasks, join handles and sets, task states
//! - [`sync`] — The shared, ordered log
//!
//! ## Getting Started
//!
//! Add Strand to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! strand = { git = "https://github.com/Nebula-ecosystem/Strand", package = "strand" }
//! ```

mod error;
mod runtime;
mod utils;

pub mod sync;

pub use error::{Timeout, WorkFailure};
pub use runtime::Runtime;
pub use runtime::builder::RuntimeBuilder;
pub use runtime::task;
pub use runtime::yield_now::yield_now;
pub use sync::SharedLog;

pub use strand_macros::{main, test};
