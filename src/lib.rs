//! # taskpool
//!
//! **Taskpool** is a bounded-concurrency task scheduler for synchronous work.
//!
//! Callers submit independent tasks, pick how many may run at once, and block
//! in [`Scheduler::run`] while the scheduler dispatches each task on its own
//! OS thread, reaps completions, and hands back the finished list. Many cheap
//! tasks can be regrouped into batches first so that thread creation is
//! amortized over several tasks.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  impl Task   │   │ TaskCell<T>  │   │   TaskFn     │
//!     │   (moved)    │   │  (borrowed)  │   │  (closure)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler<'t>                                                    │
//! │  - pending   VecDeque<Job>   (submission order)                   │
//! │  - finished  Vec<Job>        (completion order)                   │
//! │  - PollInterval              (adaptive, floored)                  │
//! │  - halt handle               (CancellationToken)                  │
//! │  - SubscriberSet             (fans out to user subscribers)       │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │ worker #1    │   │ worker #2    │   │ worker #N    │   │ N ≤ limit
//!     │ start(job)   │   │ start(group) │   │ start(job)   │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ writes TaskState │ (atomics)        │                 │
//!      ▼                  ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  control thread: poll → join finished → emit(Event + Snapshot)    │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                           (per-sub queues)
//!                      ┌────────────┼────────────┐
//!                      ▼            ▼            ▼
//!                 ProgressBar   LogWriter     custom
//! ```
//!
//! ### Lifecycle of a task
//! ```text
//! submit ──► pending ──► (disabled) ──────────────────────► finished (Idle)
//!                   └──► seq id, spawn ──► Running ──► Finished ──► finished
//!                                                          │
//!                     reset() ◄────────────────────────────┘ (result kept)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                       |
//! |-------------------|--------------------------------------------------------------|------------------------------------------|
//! | **Tasks**         | Units of work with a result code and a break signal.         | [`Task`], [`TaskFn`], [`TaskContext`]    |
//! | **Ownership**     | Tasks moved into the scheduler or borrowed from the caller.  | [`TaskCell`], [`TaskEntry`], [`Ownership`] |
//! | **Scheduling**    | Bounded dispatch, regrouping, reset and clear.               | [`Scheduler`], [`Job`], [`TaskGroup`]    |
//! | **Subscriber API**| Observe runs through events carrying snapshots.              | [`Subscribe`], [`Event`], [`Snapshot`]   |
//! | **Progress**      | Discrete or continuous text progress bar.                    | [`ProgressBar`], [`ProgressStyle`]       |
//! | **Configuration** | Settings, optionally seeded from the environment.            | [`Config`], [`ConfigError`]              |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] forwarding events to `tracing`.
//!
//! ## Example
//! ```rust
//! use taskpool::{Config, Scheduler, TaskCell, TaskContext, TaskFn};
//!
//! // Caller-owned cells outlive the scheduler and stay readable afterwards.
//! let cells: Vec<_> = (0..100)
//!     .map(|i| TaskCell::new(TaskFn::new(format!("square-{i}"), move |_: &TaskContext<'_>| i * i)))
//!     .collect();
//!
//! let mut pool = Scheduler::new(Config { max_concurrent: 8, ..Config::default() });
//! pool.submit_all_ref(&cells);
//! pool.reorganize_dynamic(2);
//!
//! let summary = pool.run();
//! assert!(summary.is_complete());
//! assert_eq!(pool.finished().len(), 100);
//! drop(pool);
//!
//! assert_eq!(cells[7].result(), 49);
//! ```
mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::{Config, ProgressStyle, ENV_PROGRESS, ENV_THREADS};
pub use crate::core::{HaltReason, RunSummary, Scheduler, SchedulerBuilder};
pub use error::ConfigError;
pub use events::{Event, EventKind, Snapshot};
pub use subscribers::{ProgressBar, Subscribe, SubscriberSet};
pub use tasks::{
    Job, Ownership, Task, TaskCell, TaskContext, TaskEntry, TaskFn, TaskGroup, TaskPhase,
    TaskState,
};

// Optional: expose a built-in subscriber forwarding events to `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

// Halt handle type returned by `Scheduler::halt_handle`.
pub use tokio_util::sync::CancellationToken;
