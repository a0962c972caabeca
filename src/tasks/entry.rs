//! # Submitted task entries and their ownership tag.
//!
//! Every task handed to a [`Scheduler`](crate::Scheduler) becomes a
//! [`TaskEntry`]. The entry records **who owns the task**, decided once at the
//! `submit` call site:
//!
//! ```text
//! submit(task) / submit_cell(cell)   ──► Ownership::Scheduler  (moved in, dropped by the scheduler)
//! submit_ref(&cell)                  ──► Ownership::Caller     (borrowed for 't, never dropped here)
//! ```
//!
//! The borrow checker enforces the caller side of the contract: a cell
//! submitted by reference cannot be dropped while the scheduler still lives.

use std::fmt;
use std::time::Duration;

use crate::tasks::cell::{ErasedCell, Runnable, TaskCell};
use crate::tasks::state::TaskState;
use crate::tasks::task::{Task, TaskContext};

/// Who releases a task's memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// Moved into the scheduler; dropped on `clear()` or when the scheduler drops.
    Scheduler,
    /// Borrowed from the caller; the scheduler only forgets the reference.
    Caller,
}

enum Slot<'t> {
    Owned(Box<dyn ErasedCell>),
    Borrowed(&'t dyn ErasedCell),
}

/// One submitted task as held by the scheduler.
pub struct TaskEntry<'t> {
    index: usize,
    slot: Slot<'t>,
}

impl<'t> TaskEntry<'t> {
    pub(crate) fn owned<T: Task>(index: usize, cell: TaskCell<T>) -> Self {
        Self {
            index,
            slot: Slot::Owned(Box::new(cell)),
        }
    }

    pub(crate) fn borrowed<T: Task>(index: usize, cell: &'t TaskCell<T>) -> Self {
        Self {
            index,
            slot: Slot::Borrowed(cell),
        }
    }

    fn cell(&self) -> &dyn ErasedCell {
        match &self.slot {
            Slot::Owned(cell) => cell.as_ref(),
            Slot::Borrowed(cell) => *cell,
        }
    }

    /// Position in submission order (0-based, per scheduler).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Task name.
    pub fn name(&self) -> &str {
        self.cell().name()
    }

    /// Lifecycle state of the task.
    pub fn state(&self) -> &TaskState {
        self.cell().state()
    }

    /// Ownership tag chosen at submission.
    pub fn ownership(&self) -> Ownership {
        match self.slot {
            Slot::Owned(_) => Ownership::Scheduler,
            Slot::Borrowed(_) => Ownership::Caller,
        }
    }

    /// True if the scheduler releases this task.
    pub fn is_auto_delete(&self) -> bool {
        self.ownership() == Ownership::Scheduler
    }

    /// Whether the task will be executed when dispatched.
    pub fn is_enabled(&self) -> bool {
        self.state().is_enabled()
    }

    /// Enables or disables the task.
    pub fn set_enabled(&self, enabled: bool) {
        self.state().set_enabled(enabled);
    }

    /// True once the current pass has completed.
    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// Result code of the last completed pass.
    pub fn result(&self) -> i32 {
        self.state().result()
    }

    /// Duration of the last completed pass.
    pub fn elapsed(&self) -> Duration {
        self.state().elapsed()
    }

    /// True if `cell` is the very object behind this entry.
    pub fn is<T>(&self, cell: &TaskCell<T>) -> bool {
        let ours = self.cell() as *const dyn ErasedCell as *const ();
        let theirs = cell as *const TaskCell<T> as *const ();
        std::ptr::eq(ours, theirs)
    }

    /// Returns the concrete cell if the task is a `T`.
    pub fn downcast_ref<T: Task>(&self) -> Option<&TaskCell<T>> {
        self.cell().as_any().downcast_ref::<TaskCell<T>>()
    }
}

impl Runnable for TaskEntry<'_> {
    fn name(&self) -> &str {
        self.cell().name()
    }

    fn state(&self) -> &TaskState {
        self.cell().state()
    }

    fn execute(&self, ctx: &TaskContext<'_>) -> i32 {
        self.cell().execute(ctx)
    }
}

impl fmt::Debug for TaskEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskEntry")
            .field("index", &self.index)
            .field("name", &self.name())
            .field("ownership", &self.ownership())
            .field("phase", &self.state().phase())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::state::TaskPhase;
    use crate::tasks::TaskFn;

    struct Counter(u32);

    impl Task for Counter {
        fn execute(&mut self, _ctx: &TaskContext<'_>) -> i32 {
            self.0 += 1;
            self.0 as i32
        }
    }

    #[test]
    fn test_ownership_tags() {
        let kept = TaskCell::new(Counter(0));
        let owned = TaskEntry::owned(0, TaskCell::new(Counter(0)));
        let borrowed = TaskEntry::borrowed(1, &kept);

        assert!(owned.is_auto_delete());
        assert_eq!(borrowed.ownership(), Ownership::Caller);
        assert!(!borrowed.is_auto_delete());
    }

    #[test]
    fn test_identity_and_downcast() {
        let a = TaskCell::new(Counter(5));
        let b = TaskCell::new(Counter(5));
        let entry = TaskEntry::borrowed(0, &a);

        assert!(entry.is(&a));
        assert!(!entry.is(&b));

        let cell = entry.downcast_ref::<Counter>().expect("counter cell");
        assert_eq!(cell.lock().0, 5);
        assert!(entry.downcast_ref::<TaskFn<fn(&TaskContext<'_>) -> i32>>().is_none());
    }

    #[test]
    fn test_enabled_flag_is_shared_with_cell() {
        let cell = TaskCell::new(Counter(0));
        let entry = TaskEntry::borrowed(0, &cell);
        entry.set_enabled(false);
        assert!(!cell.is_enabled());
        assert_eq!(entry.state().phase(), TaskPhase::Idle);
    }
}
