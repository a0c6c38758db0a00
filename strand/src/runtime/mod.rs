//! Core runtime components.
//!
//! This module contains the task launcher and everything underneath it:
//! the worker pool, the work-stealing queues, the task state machine and
//! the join handles.
//!
//! It is responsible for:
//! - executing launched work on worker threads,
//! - managing task queues and work stealing,
//! - publishing each task's outcome exactly once to its joiners,
//! - enabling cooperative multitasking via yielding.

mod core;
mod executor;
mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod yield_now;

pub mod task;

pub use self::core::Runtime;
