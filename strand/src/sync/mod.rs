//! Shared state for launched tasks.
//!
//! - [`SharedLog`] — an append-only, ordered record that a caller and
//!   the tasks it launches can all write to.
//!
//! The log is passed explicitly: clone it into each task that needs it.
//! There is no global log.

mod shared_log;

pub use shared_log::SharedLog;
