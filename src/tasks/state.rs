//! # Per-task lifecycle state.
//!
//! [`TaskState`] is the part of a task shared between the thread executing it
//! and the scheduler's control thread. There is no lock between the two sides,
//! so every field is an atomic.
//!
//! ## Writers
//! - executing thread: phase (`Running` → `Finished`), result, elapsed, break flag
//! - scheduler: sequence id (before dispatch), phase back to `Idle` on reset
//! - caller: enabled flag
//!
//! ## Rules
//! - `Finished` is published with `Release` after result and elapsed are stored,
//!   so an observer that sees `Finished` also sees the values of that pass.
//! - Result and elapsed survive a reset; the next pass overwrites them.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, AtomicU8, Ordering};
use std::time::Duration;

/// Where a task is in its lifecycle. Exactly one phase holds at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskPhase {
    /// Not run yet in this pass (also: disabled and retired without running).
    Idle,
    /// `execute` is in progress on a worker thread.
    Running,
    /// `execute` returned; result and elapsed are valid.
    Finished,
}

impl TaskPhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => TaskPhase::Running,
            2 => TaskPhase::Finished,
            _ => TaskPhase::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            TaskPhase::Idle => 0,
            TaskPhase::Running => 1,
            TaskPhase::Finished => 2,
        }
    }
}

/// Concurrency-safe state of one task.
#[derive(Debug)]
pub struct TaskState {
    phase: AtomicU8,
    enabled: AtomicBool,
    break_pool: AtomicBool,
    result: AtomicI32,
    elapsed_us: AtomicU64,
    /// `0` = never dispatched.
    sequence: AtomicU64,
}

impl Default for TaskState {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskState {
    /// Fresh state: idle, enabled, no break requested, result `0`.
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(TaskPhase::Idle.as_u8()),
            enabled: AtomicBool::new(true),
            break_pool: AtomicBool::new(false),
            result: AtomicI32::new(0),
            elapsed_us: AtomicU64::new(0),
            sequence: AtomicU64::new(0),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> TaskPhase {
        TaskPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// True while `execute` runs.
    pub fn is_running(&self) -> bool {
        self.phase() == TaskPhase::Running
    }

    /// True once `execute` has returned in the current pass.
    pub fn is_finished(&self) -> bool {
        self.phase() == TaskPhase::Finished
    }

    /// Whether the scheduler will execute this task.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Enables or disables the task. Disabled tasks are retired without running.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// True if the last pass asked the scheduler to stop dispatching new work.
    pub fn should_break_pool(&self) -> bool {
        self.break_pool.load(Ordering::Acquire)
    }

    /// Result code of the last completed pass (`0` before any).
    pub fn result(&self) -> i32 {
        self.result.load(Ordering::Acquire)
    }

    /// Measured duration of the last completed pass.
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_us.load(Ordering::Acquire))
    }

    /// Sequence id assigned at the last dispatch, if the task was ever dispatched.
    pub fn sequence_id(&self) -> Option<u64> {
        match self.sequence.load(Ordering::Acquire) {
            0 => None,
            id => Some(id),
        }
    }

    /// Clears the finished flag so the task can be dispatched again.
    ///
    /// Result and elapsed stay readable until the next pass overwrites them.
    pub fn reset(&self) {
        let _ = self.phase.compare_exchange(
            TaskPhase::Finished.as_u8(),
            TaskPhase::Idle.as_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub(crate) fn assign_sequence(&self, id: u64) {
        self.sequence.store(id, Ordering::Release);
    }

    /// Enters `Running` and drops the break flag left over from a previous pass.
    pub(crate) fn begin(&self) {
        self.break_pool.store(false, Ordering::Release);
        self.phase
            .store(TaskPhase::Running.as_u8(), Ordering::Release);
    }

    pub(crate) fn complete(&self, result: i32, elapsed: Duration) {
        let micros = elapsed.as_micros().min(u128::from(u64::MAX)) as u64;
        self.result.store(result, Ordering::Release);
        self.elapsed_us.store(micros, Ordering::Release);
        self.phase
            .store(TaskPhase::Finished.as_u8(), Ordering::Release);
    }

    pub(crate) fn request_break(&self) {
        self.break_pool.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let s = TaskState::new();
        assert_eq!(s.phase(), TaskPhase::Idle);
        assert!(s.is_enabled());
        assert!(!s.should_break_pool());
        assert_eq!(s.result(), 0);
        assert_eq!(s.sequence_id(), None);
    }

    #[test]
    fn test_lifecycle_phases_are_exclusive() {
        let s = TaskState::new();
        s.begin();
        assert!(s.is_running());
        assert!(!s.is_finished());

        s.complete(7, Duration::from_millis(3));
        assert!(s.is_finished());
        assert!(!s.is_running());
        assert_eq!(s.result(), 7);
        assert_eq!(s.elapsed(), Duration::from_millis(3));
    }

    #[test]
    fn test_reset_keeps_last_result() {
        let s = TaskState::new();
        s.begin();
        s.complete(42, Duration::from_millis(1));
        s.reset();
        assert_eq!(s.phase(), TaskPhase::Idle);
        assert_eq!(s.result(), 42);
        assert_eq!(s.elapsed(), Duration::from_millis(1));
    }

    #[test]
    fn test_reset_does_not_touch_running_task() {
        let s = TaskState::new();
        s.begin();
        s.reset();
        assert!(s.is_running());
    }

    #[test]
    fn test_new_pass_clears_break_flag() {
        let s = TaskState::new();
        s.begin();
        s.request_break();
        s.complete(0, Duration::ZERO);
        assert!(s.should_break_pool());

        s.reset();
        s.begin();
        assert!(!s.should_break_pool());
    }
}
