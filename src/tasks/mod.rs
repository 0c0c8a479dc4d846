//! Background Tasks Module
//!
//! Optional maintenance tasks for the local tier. Nothing here is required for
//! correctness: expired entries are never returned even without a sweep.

mod sweep;

pub use sweep::{spawn_sweep_task, spawn_sweep_task_from_config};
