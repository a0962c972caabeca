//! # LogWriter: scheduler events as `tracing` records
//!
//! A minimal subscriber that forwards incoming [`Event`]s to `tracing`.
//! Install any `tracing` subscriber (for example `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO  taskpool: run started total=1000 limit=32
//! DEBUG taskpool: dispatched task="resize-7" seq=8
//! DEBUG taskpool: finished task="resize-7" seq=8 result=0 elapsed=12.1ms
//! DEBUG taskpool: retired task="skip-3"
//! WARN  taskpool: break requested task="validator"
//! INFO  taskpool: regrouped strategy="dynamic" groups=72
//! INFO  taskpool: run finished finished=1000 pending=0 elapsed=1.4s
//! ```

use tracing::{debug, info, trace, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("unknown");
        let s = &e.snapshot;
        match e.kind {
            EventKind::RunStarted => {
                info!(target: "taskpool", total = s.total, limit = s.limit, "run started");
            }
            EventKind::RunFinished => {
                info!(
                    target: "taskpool",
                    finished = s.finished,
                    pending = s.pending,
                    elapsed = ?e.elapsed,
                    "run finished"
                );
            }
            EventKind::BreakRequested => {
                warn!(target: "taskpool", task, "break requested");
            }
            EventKind::HaltRequested => {
                warn!(target: "taskpool", pending = s.pending, "halt requested");
            }
            EventKind::TaskDispatched => {
                debug!(target: "taskpool", task, seq = ?e.sequence, active = s.active, "dispatched");
            }
            EventKind::TaskRetired => {
                debug!(target: "taskpool", task, "retired");
            }
            EventKind::TaskFinished => {
                debug!(
                    target: "taskpool",
                    task,
                    seq = ?e.sequence,
                    result = ?e.result,
                    elapsed = ?e.elapsed,
                    "finished"
                );
            }
            EventKind::PollTightened => {
                trace!(target: "taskpool", interval = ?e.interval, "poll tightened");
            }
            EventKind::Regrouped => {
                info!(
                    target: "taskpool",
                    strategy = e.reason.as_deref().unwrap_or("unknown"),
                    groups = ?e.count,
                    "regrouped"
                );
            }
            EventKind::PoolReset => {
                info!(target: "taskpool", requeued = ?e.count, "reset");
            }
            EventKind::PoolCleared => {
                info!(target: "taskpool", released = ?e.count, "cleared");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
