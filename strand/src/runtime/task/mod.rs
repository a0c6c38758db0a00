//! Task launching and joining.
//!
//! This module defines how work is handed to the runtime and how the
//! caller synchronizes with it afterwards.
//!
//! It includes:
//! - [`launch`], [`try_launch`] and [`spawn`] for work started from
//!   inside a running task,
//! - [`JoinHandle`], the caller's barrier on a task's completion,
//! - [`JoinSet`], a group of tasks joined as one,
//! - [`TaskState`], the observable lifecycle of a task.
//!
//! The scheduling states, wakers and the outcome slot underneath are
//! internal to the executor.

pub(crate) mod completion;
pub(crate) mod handle;
pub(crate) mod set;
pub(crate) mod state;
pub(crate) mod waker;

pub(crate) mod core;

pub(crate) use self::core::{Runnable, Task};

pub use self::core::{launch, spawn, try_launch};
pub use handle::JoinHandle;
pub use set::JoinSet;
pub use state::TaskState;
