//! # Task abstractions.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait for implementing a synchronous unit of work
//! - [`TaskContext`] - per-execution handle (break signal, sequence id)
//! - [`TaskFn`] - closure-backed task implementation
//! - [`TaskCell`] / [`TaskState`] - a task plus its lock-free lifecycle state
//! - [`TaskEntry`] / [`Ownership`] - a submitted task and who releases it
//! - [`TaskGroup`] / [`Job`] - batches built by regrouping and the queue slot type

mod cell;
mod entry;
mod group;
mod job;
mod state;
mod task;
mod task_fn;

pub(crate) use cell::Runnable;
pub use cell::TaskCell;
pub use entry::{Ownership, TaskEntry};
pub use group::TaskGroup;
pub use job::Job;
pub use state::{TaskPhase, TaskState};
pub use task::{Task, TaskContext};
pub use task_fn::TaskFn;
