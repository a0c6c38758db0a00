//! Task executor implementation.
//!
//! This module contains the worker pool that runs launched tasks.
//!
//! It is composed of:
//! - [`core`]: the main executor logic and lifecycle management,
//! - [`worker`]: worker threads that run tasks using work-stealing.
//!
//! Together, these components implement a fixed-size, multi-threaded
//! executor whose shutdown never leaves a joiner waiting forever.

pub(crate) mod core;
pub(crate) mod worker;
