//! # Task abstraction.
//!
//! This module defines the [`Task`] trait, the unit of work a
//! [`Scheduler`](crate::Scheduler) dispatches, and the [`TaskContext`] handed
//! to every execution.
//!
//! A task is plain synchronous code. It runs on its own worker thread, returns
//! an integer result code, and may ask the scheduler to stop dispatching new
//! work once it completes (see [`TaskContext::request_break`]).
//!
//! Faults are the task's own business: capture them and report them through
//! the result code. A panic escaping `execute` stops dispatch and is resumed
//! on the caller of [`Scheduler::run`](crate::Scheduler::run) once the other
//! active tasks have finished.

use crate::tasks::state::TaskState;

/// # Synchronous unit of work.
///
/// # Example
/// ```
/// use taskpool::{Task, TaskContext};
///
/// struct Sum {
///     upto: u64,
///     total: u64,
/// }
///
/// impl Task for Sum {
///     fn name(&self) -> &str { "sum" }
///
///     fn execute(&mut self, _ctx: &TaskContext<'_>) -> i32 {
///         self.total = (1..=self.upto).sum();
///         0
///     }
/// }
/// ```
pub trait Task: Send + 'static {
    /// Human-readable task name (for events and logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Executes the work and returns a result code.
    ///
    /// Called at most once per pass; [`Scheduler::reset`](crate::Scheduler::reset)
    /// permits another pass on the same object.
    fn execute(&mut self, ctx: &TaskContext<'_>) -> i32;
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&mut self, ctx: &TaskContext<'_>) -> i32 {
        (**self).execute(ctx)
    }
}

/// Execution context passed to [`Task::execute`].
///
/// Grants the running task access to its own scheduling signals.
pub struct TaskContext<'a> {
    state: &'a TaskState,
}

impl<'a> TaskContext<'a> {
    pub(crate) fn new(state: &'a TaskState) -> Self {
        Self { state }
    }

    /// Asks the scheduler to stop dispatching **new** tasks once this one completes.
    ///
    /// Tasks already running keep running; nothing is preempted.
    pub fn request_break(&self) {
        self.state.request_break();
    }

    /// True if this pass already requested a break.
    pub fn break_requested(&self) -> bool {
        self.state.should_break_pool()
    }

    /// Sequence id of the dispatch running this task.
    pub fn sequence_id(&self) -> Option<u64> {
        self.state.sequence_id()
    }
}
