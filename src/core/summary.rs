use std::sync::Arc;
use std::time::Duration;

/// Why a run stopped dispatching before the queue was empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// A reaped job carried a break signal.
    Break {
        /// Name of the task that raised it (the child, when it ran inside a batch).
        task: Arc<str>,
    },
    /// The scheduler's halt handle was cancelled.
    Halted,
}

impl HaltReason {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HaltReason::Break { .. } => "break_signal",
            HaltReason::Halted => "halt_requested",
        }
    }
}

/// Outcome of one [`Scheduler::run`](crate::Scheduler::run).
///
/// Counts are in dispatch units: after regrouping one group counts once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Jobs handed to a worker thread.
    pub dispatched: usize,
    /// Disabled jobs moved to finished without a worker.
    pub retired: usize,
    /// Jobs added to the finished list by this run (dispatched + retired).
    pub finished: usize,
    /// Entries left pending because dispatch was halted, counted after
    /// groups are unwrapped (a group cut off by a break adds its unrun children).
    pub stranded: usize,
    /// Wall time of the run.
    pub elapsed: Duration,
    /// Set when dispatch stopped early.
    pub halt: Option<HaltReason>,
}

impl RunSummary {
    /// True if nothing was left pending.
    pub fn is_complete(&self) -> bool {
        self.stranded == 0
    }
}
