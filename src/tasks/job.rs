//! # Job: the unit the scheduler queues and dispatches.
//!
//! A closed tagged type over the two things that can occupy a queue slot:
//! a single submitted task or a group built by regrouping. Both expose the
//! same scheduling surface (enabled, finished, break signal, execute).

use crate::tasks::cell::Runnable;
use crate::tasks::entry::TaskEntry;
use crate::tasks::group::TaskGroup;
use crate::tasks::state::TaskState;
use crate::tasks::task::TaskContext;

/// A queue slot: one task, or a batch of tasks run as one.
#[derive(Debug)]
pub enum Job<'t> {
    /// A task exactly as submitted.
    Task(TaskEntry<'t>),
    /// A batch produced by regrouping.
    Group(TaskGroup<'t>),
}

impl<'t> Job<'t> {
    /// Dispatch-level state (the task's own, or the group's).
    pub fn state(&self) -> &TaskState {
        match self {
            Job::Task(entry) => entry.state(),
            Job::Group(group) => group.state(),
        }
    }

    /// Name used in events.
    pub fn name(&self) -> &str {
        Runnable::name(self)
    }

    /// Disabled jobs are retired without a worker thread.
    pub fn is_enabled(&self) -> bool {
        self.state().is_enabled()
    }

    /// True once the job's worker completed.
    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// True if the job asked the scheduler to stop dispatching.
    pub fn should_break_pool(&self) -> bool {
        self.state().should_break_pool()
    }

    /// The single task, if this is not a group.
    pub fn as_task(&self) -> Option<&TaskEntry<'t>> {
        match self {
            Job::Task(entry) => Some(entry),
            Job::Group(_) => None,
        }
    }

    /// True if this slot holds a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Job::Group(_))
    }

    /// Every task carried by this job, in order.
    pub fn tasks(&self) -> &[TaskEntry<'t>] {
        match self {
            Job::Task(entry) => std::slice::from_ref(entry),
            Job::Group(group) => group.children(),
        }
    }

    /// Number of tasks carried by this job.
    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    /// True for an empty group.
    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }

    /// Unwraps the job into its tasks (a group yields its children in order).
    pub fn into_tasks(self) -> Vec<TaskEntry<'t>> {
        match self {
            Job::Task(entry) => vec![entry],
            Job::Group(group) => group.into_children(),
        }
    }
}

impl Runnable for Job<'_> {
    fn name(&self) -> &str {
        match self {
            Job::Task(entry) => Runnable::name(entry),
            Job::Group(group) => Runnable::name(group),
        }
    }

    fn state(&self) -> &TaskState {
        Job::state(self)
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> i32 {
        match self {
            Job::Task(entry) => entry.execute(ctx),
            Job::Group(group) => group.execute(ctx),
        }
    }
}
