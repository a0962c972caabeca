//! # Events emitted by the scheduler.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Run events**: a run starts, is halted, finishes
//! - **Task events**: a job is dispatched, retired while disabled, reaped
//! - **Queue events**: regrouping, reset, clear
//!
//! Every [`Event`] carries a [`Snapshot`] of the scheduler's collections taken
//! at emission time, which is all a progress reporter needs.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskpool::{Event, EventKind, Snapshot};
//!
//! let ev = Event::new(EventKind::TaskFinished)
//!     .with_task("resize-42")
//!     .with_result(0)
//!     .with_elapsed(Duration::from_millis(12))
//!     .with_snapshot(Snapshot { finished: 3, active: 2, pending: 5, total: 10, limit: 4 });
//!
//! assert_eq!(ev.kind, EventKind::TaskFinished);
//! assert_eq!(ev.task.as_deref(), Some("resize-42"));
//! assert_eq!(ev.snapshot.progress(), 0.3);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Counts of the scheduler's collections at one point in time.
///
/// Counted in dispatch units: after regrouping a group counts once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Jobs in the finished list.
    pub finished: usize,
    /// Jobs currently running on worker threads.
    pub active: usize,
    /// Jobs still waiting for dispatch.
    pub pending: usize,
    /// Jobs in the queue when the run started.
    pub total: usize,
    /// Concurrency limit in effect.
    pub limit: usize,
}

impl Snapshot {
    /// Finished fraction of `total` in `[0, 1]` (`0` for an empty run).
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.finished as f64 / self.total as f64
        }
    }

    /// Finished plus active fraction of `total`.
    pub fn started(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.finished + self.active) as f64 / self.total as f64
        }
    }

    /// Active jobs as a fraction of the concurrency limit.
    pub fn load(&self) -> f64 {
        self.active as f64 / self.limit.max(1) as f64
    }
}

/// Classification of scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run events ===
    /// `run()` entered the dispatch loop.
    ///
    /// Sets:
    /// - `snapshot.total`: jobs queued at start
    RunStarted,

    /// A job requested a break; no new job will be dispatched.
    ///
    /// Sets:
    /// - `task`: name of the job that raised the signal
    BreakRequested,

    /// The external halt handle was cancelled; no new job will be dispatched.
    HaltRequested,

    /// `run()` is about to return.
    ///
    /// Sets:
    /// - `elapsed`: wall time of the run
    RunFinished,

    // === Task events ===
    /// A job was handed to a fresh worker thread.
    ///
    /// Sets:
    /// - `task`: job name
    /// - `sequence`: dispatch sequence id
    TaskDispatched,

    /// A disabled job was moved to finished without running.
    ///
    /// Sets:
    /// - `task`: job name
    TaskRetired,

    /// A job completed and its worker was joined.
    ///
    /// Sets:
    /// - `task`: job name
    /// - `sequence`: dispatch sequence id
    /// - `result`: result code
    /// - `elapsed`: measured duration
    TaskFinished,

    /// The adaptive poll interval shrank.
    ///
    /// Sets:
    /// - `interval`: new poll interval
    PollTightened,

    // === Queue events ===
    /// Pending tasks were regrouped into batches.
    ///
    /// Sets:
    /// - `reason`: strategy (`static` or `dynamic`)
    /// - `count`: number of groups now pending
    Regrouped,

    /// Finished tasks were moved back to pending.
    ///
    /// Sets:
    /// - `count`: number of requeued tasks
    PoolReset,

    /// All collections were discarded.
    ///
    /// Sets:
    /// - `count`: number of tasks released
    PoolCleared,
}

/// Scheduler event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Collection counts at emission time.
    pub snapshot: Snapshot,

    /// Name of the job, if applicable.
    pub task: Option<Arc<str>>,
    /// Dispatch sequence id of the job.
    pub sequence: Option<u64>,
    /// Result code of a finished job.
    pub result: Option<i32>,
    /// Measured duration (job or whole run).
    pub elapsed: Option<Duration>,
    /// Poll interval after tightening.
    pub interval: Option<Duration>,
    /// Number of items affected (groups, requeued or released tasks).
    pub count: Option<usize>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            snapshot: Snapshot::default(),
            task: None,
            sequence: None,
            result: None,
            elapsed: None,
            interval: None,
            count: None,
            reason: None,
        }
    }

    /// Attaches a collection snapshot.
    #[inline]
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Attaches a job name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a dispatch sequence id.
    #[inline]
    pub fn with_sequence(mut self, sequence: Option<u64>) -> Self {
        self.sequence = sequence;
        self
    }

    /// Attaches a result code.
    #[inline]
    pub fn with_result(mut self, result: i32) -> Self {
        self.result = Some(result);
        self
    }

    /// Attaches a measured duration.
    #[inline]
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Attaches the current poll interval.
    #[inline]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Attaches an item count.
    #[inline]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for the events that change the collection counts.
    #[inline]
    pub fn is_transition(&self) -> bool {
        matches!(
            self.kind,
            EventKind::RunStarted
                | EventKind::TaskDispatched
                | EventKind::TaskRetired
                | EventKind::TaskFinished
                | EventKind::RunFinished
        )
    }
}
