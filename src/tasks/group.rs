//! # TaskGroup: several tasks dispatched as one unit.
//!
//! Regrouping replaces many cheap pending tasks with fewer [`TaskGroup`]s so
//! that one worker thread is spawned per group instead of per task.
//!
//! ## Execution
//! ```text
//! group.execute()
//!   for child in children (insertion order):
//!     ├─ disabled            → skipped
//!     ├─ start(child)        → child records its own result/elapsed/finished
//!     └─ child broke the pool → group requests a break, remaining children skipped
//! ```
//!
//! A group never owns memory on behalf of its children beyond holding their
//! entries; unwrapping it gives back the original entries, ownership intact.

use crate::core::runner;
use crate::tasks::cell::Runnable;
use crate::tasks::entry::TaskEntry;
use crate::tasks::state::TaskState;
use crate::tasks::task::TaskContext;

/// An ordered batch of tasks executed sequentially on one worker thread.
pub struct TaskGroup<'t> {
    state: TaskState,
    children: Vec<TaskEntry<'t>>,
}

impl<'t> TaskGroup<'t> {
    pub(crate) fn new() -> Self {
        Self {
            state: TaskState::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, child: TaskEntry<'t>) {
        self.children.push(child);
    }

    /// Number of tasks in the group.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True if the group holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Tasks in insertion order.
    pub fn children(&self) -> &[TaskEntry<'t>] {
        &self.children
    }

    /// Lifecycle state of the group itself.
    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub(crate) fn into_children(self) -> Vec<TaskEntry<'t>> {
        self.children
    }
}

impl Runnable for TaskGroup<'_> {
    fn name(&self) -> &str {
        "task-group"
    }

    fn state(&self) -> &TaskState {
        &self.state
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> i32 {
        for child in &self.children {
            if !child.is_enabled() {
                continue;
            }
            if let Some(id) = ctx.sequence_id() {
                child.state().assign_sequence(id);
            }
            runner::start(child);
            if child.state().should_break_pool() {
                ctx.request_break();
                break;
            }
        }
        0
    }
}

impl std::fmt::Debug for TaskGroup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskGroup")
            .field("children", &self.children)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::tasks::{TaskCell, TaskFn};

    fn recorder(
        log: &Arc<parking_lot::Mutex<Vec<usize>>>,
        id: usize,
        brk: bool,
    ) -> TaskCell<impl crate::Task> {
        let log = Arc::clone(log);
        TaskCell::new(TaskFn::new(format!("t{id}"), move |ctx: &TaskContext<'_>| {
            log.lock().push(id);
            if brk {
                ctx.request_break();
            }
            id as i32
        }))
    }

    #[test]
    fn test_children_run_in_order_and_record_results() {
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let cells: Vec<_> = (0..4).map(|i| recorder(&log, i, false)).collect();

        let mut group = TaskGroup::new();
        for (i, c) in cells.iter().enumerate() {
            group.push(TaskEntry::borrowed(i, c));
        }
        runner::start(&group);

        assert_eq!(*log.lock(), vec![0, 1, 2, 3]);
        assert!(group.state().is_finished());
        for (i, c) in cells.iter().enumerate() {
            assert!(c.is_finished());
            assert_eq!(c.result(), i as i32);
        }
    }

    #[test]
    fn test_disabled_children_are_skipped() {
        let hits = Arc::new(AtomicUsize::new(0));
        let cells: Vec<_> = (0..3)
            .map(|_| {
                let hits = Arc::clone(&hits);
                TaskCell::new(TaskFn::new("hit", move |_: &TaskContext<'_>| {
                    hits.fetch_add(1, Ordering::SeqCst);
                    0
                }))
            })
            .collect();
        cells[1].set_enabled(false);

        let mut group = TaskGroup::new();
        for (i, c) in cells.iter().enumerate() {
            group.push(TaskEntry::borrowed(i, c));
        }
        runner::start(&group);

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(!cells[1].state().is_running());
        assert!(!cells[1].is_finished());
    }

    #[test]
    fn test_break_stops_group_and_propagates() {
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let cells = vec![
            recorder(&log, 0, false),
            recorder(&log, 1, true),
            recorder(&log, 2, false),
        ];

        let mut group = TaskGroup::new();
        for (i, c) in cells.iter().enumerate() {
            group.push(TaskEntry::borrowed(i, c));
        }
        runner::start(&group);

        assert_eq!(*log.lock(), vec![0, 1]);
        assert!(group.state().should_break_pool());
        assert!(!cells[2].is_finished());
    }
}
