//! Runtime core: dispatch and lifecycle.
//!
//! The public API from this module is [`Scheduler`] (plus its builder and the
//! per-run [`RunSummary`]), which dispatches submitted tasks under a
//! concurrency limit and reaps them as they complete.
//!
//! Internal modules:
//! - [`runner`]: runs one pass of a task or group and records its outcome;
//! - [`scheduler`]: queues, the dispatch/reap loop, reset and clear;
//! - [`regroup`]: static and dynamic batching of pending tasks;
//! - [`poll`]: adaptive sleep interval of the control thread.

mod builder;
mod poll;
mod regroup;
pub(crate) mod runner;
mod scheduler;
mod summary;

pub use builder::SchedulerBuilder;
pub use scheduler::Scheduler;
pub use summary::{HaltReason, RunSummary};
