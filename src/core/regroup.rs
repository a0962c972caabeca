//! # Regrouping pending tasks into batches.
//!
//! Turns a queue of many cheap tasks into fewer [`TaskGroup`]s so that one
//! worker thread is spawned per batch instead of per task.
//!
//! ```text
//! pending: t0 t1 t2 ... t(k-1)
//!            │
//!            ▼  flatten existing groups, then per outer round:
//!          per_group = (remaining / divisor) / limit
//!            ├─ per_group > 0 → `limit` groups of `per_group` tasks each
//!            └─ per_group = 0 → one singleton group
//!            ▼
//! pending: [g0] [g1] ... [gm]        (task order preserved end to end)
//! ```
//!
//! ## Strategies
//! - **Static**: divisor `1`. Early rounds take almost the whole queue, the
//!   tail is split into singletons.
//! - **Dynamic**: divisor `divide`. Every round only takes `1/divide` of what
//!   is left, so batch size tapers off as the queue drains.
//!
//! ## Rules
//! - No-op when `len / 2 / limit == 0`: the queue is too short to amortize anything.
//! - A partially filled group (queue ran dry mid-round) is kept, never dropped.
//! - Task identity and relative order are never changed.

use std::collections::VecDeque;

use crate::tasks::{Job, TaskEntry, TaskGroup};

/// How batch size is derived from the remaining queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// Batch size from the full remaining queue.
    Static,
    /// Batch size from `remaining / divide` (`0` is treated as 1).
    Dynamic { divide: usize },
}

impl Strategy {
    fn divisor(self) -> usize {
        match self {
            Strategy::Static => 1,
            Strategy::Dynamic { divide } => divide.max(1),
        }
    }

    /// Short label used in events and logs.
    pub(crate) fn as_label(self) -> &'static str {
        match self {
            Strategy::Static => "static",
            Strategy::Dynamic { .. } => "dynamic",
        }
    }
}

/// Replaces every group in `jobs` by its children, keeping order.
pub(crate) fn flatten<'t, I>(jobs: I) -> impl Iterator<Item = TaskEntry<'t>>
where
    I: IntoIterator<Item = Job<'t>>,
{
    jobs.into_iter().flat_map(Job::into_tasks)
}

/// True if a queue of `len` tasks is long enough to be regrouped under `limit`.
pub(crate) fn worth_regrouping(len: usize, limit: usize) -> bool {
    len / 2 / limit.max(1) > 0
}

/// Regroups `pending` in place.
///
/// Returns the number of groups formed, or `None` if the queue was left untouched.
pub(crate) fn regroup(
    pending: &mut VecDeque<Job<'_>>,
    limit: usize,
    strategy: Strategy,
) -> Option<usize> {
    let limit = limit.max(1);
    let tasks: usize = pending.iter().map(Job::len).sum();
    if !worth_regrouping(tasks, limit) {
        return None;
    }

    let mut queue: VecDeque<TaskEntry<'_>> = flatten(pending.drain(..)).collect();
    let divisor = strategy.divisor();
    let mut groups: Vec<TaskGroup<'_>> = Vec::new();

    while !queue.is_empty() {
        let per_group = queue.len() / divisor / limit;

        if per_group == 0 {
            let mut single = TaskGroup::new();
            if let Some(task) = queue.pop_front() {
                single.push(task);
            }
            groups.push(single);
            continue;
        }

        for _ in 0..limit {
            let mut group = TaskGroup::new();
            while group.len() < per_group {
                match queue.pop_front() {
                    Some(task) => group.push(task),
                    None => break,
                }
            }
            if !group.is_empty() {
                groups.push(group);
            }
            if queue.is_empty() {
                break;
            }
        }
    }

    let formed = groups.len();
    pending.extend(groups.into_iter().map(Job::Group));
    Some(formed)
}
