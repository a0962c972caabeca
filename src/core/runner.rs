//! # Run a single pass of a task or group.
//!
//! [`start`] is the only place that moves a unit through its lifecycle:
//!
//! ```text
//! start(unit)
//!   ├─ state.begin()          Idle → Running, stale break flag dropped
//!   ├─ unit.execute(ctx)      user code (or each child of a group)
//!   └─ state.complete(..)     result + elapsed stored, then Running → Finished
//! ```
//!
//! ## Rules
//! - Elapsed is measured around `execute` only, on the executing thread.
//! - `Finished` is the last store, so the control thread never observes a
//!   finished unit with a stale result.
//! - A panic in `execute` unwinds out of `start`; the unit stays `Running`
//!   and the scheduler treats the dead worker as a fault of the run.

use std::time::Instant;

use tracing::trace;

use crate::tasks::{Runnable, TaskContext};

/// Executes one pass of `unit` on the calling thread and records its outcome.
pub(crate) fn start<R: Runnable + ?Sized>(unit: &R) {
    let state = unit.state();
    state.begin();

    let started = Instant::now();
    let code = unit.execute(&TaskContext::new(state));
    let elapsed = started.elapsed();

    state.complete(code, elapsed);
    trace!(
        task = unit.name(),
        result = code,
        elapsed_us = elapsed.as_micros() as u64,
        "pass completed"
    );
}
