//! # Task cell: a task body plus its lifecycle state.
//!
//! [`TaskCell`] is what the scheduler actually tracks. It pairs the user's
//! [`Task`] (behind a mutex, locked only by the executing thread) with the
//! lock-free [`TaskState`] the control thread polls.
//!
//! Callers that want to keep ownership of a task build the cell themselves
//! and submit it by reference; after the run they read results straight from
//! the cell (`cell.result()`, `cell.lock().some_field`).

use std::any::Any;

use parking_lot::{Mutex, MutexGuard};

use crate::tasks::state::TaskState;
use crate::tasks::task::{Task, TaskContext};

/// Object-safe view of anything the dispatch loop can run.
pub(crate) trait Runnable: Send + Sync {
    fn name(&self) -> &str;
    fn state(&self) -> &TaskState;
    fn execute(&self, ctx: &TaskContext<'_>) -> i32;
}

/// Type-erased [`TaskCell`], recoverable through `as_any`.
pub(crate) trait ErasedCell: Runnable {
    fn as_any(&self) -> &dyn Any;
}

/// A [`Task`] together with its scheduling state.
pub struct TaskCell<T> {
    name: Box<str>,
    state: TaskState,
    body: Mutex<T>,
}

impl<T: Task> TaskCell<T> {
    /// Wraps `task` in a fresh, enabled cell.
    pub fn new(task: T) -> Self {
        Self {
            name: task.name().into(),
            state: TaskState::new(),
            body: Mutex::new(task),
        }
    }

    /// Wraps `task` in a cell that the scheduler will retire without running.
    pub fn disabled(task: T) -> Self {
        let cell = Self::new(task);
        cell.set_enabled(false);
        cell
    }

    /// Task name captured at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lifecycle state shared with the scheduler.
    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Enables or disables the task.
    pub fn set_enabled(&self, enabled: bool) {
        self.state.set_enabled(enabled);
    }

    /// Whether the task will be executed when dispatched.
    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// True once the current pass has completed.
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Result code of the last completed pass.
    pub fn result(&self) -> i32 {
        self.state.result()
    }

    /// Locks the task body.
    ///
    /// Blocks while the task is executing on a worker thread.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.body.lock()
    }

    /// Consumes the cell and returns the task body.
    pub fn into_inner(self) -> T {
        self.body.into_inner()
    }
}

impl<T> std::fmt::Debug for TaskCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskCell")
            .field("name", &self.name)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T: Task> Runnable for TaskCell<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> &TaskState {
        &self.state
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> i32 {
        self.body.lock().execute(ctx)
    }
}

impl<T: Task> ErasedCell for TaskCell<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
