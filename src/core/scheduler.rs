//! # Scheduler: bounded-concurrency dispatch of submitted tasks.
//!
//! The [`Scheduler`] owns the pending queue and the finished list, and runs the
//! dispatch/reap loop on the caller's thread. Every dispatched job gets a fresh
//! OS thread; at most `concurrency_limit` of them exist at any time.
//!
//! ## Architecture
//! ```text
//! submit / submit_ref ──► pending (FIFO)
//!                            │ run()
//!                            ▼
//!   ┌──────────────── thread::scope ────────────────┐
//!   │ loop {                                        │
//!   │   halt handle cancelled?  → stop dispatch     │
//!   │   dispatch: head disabled → finished (no slot)│
//!   │             else seq id + spawn(start(job))   │
//!   │   reap:     job finished  → join, finished,   │
//!   │                             tighten poll,     │
//!   │                             break? stop       │
//!   │   done?     active empty and (queue empty     │
//!   │                             or stopped)       │
//!   │   sleep(poll) if nothing was reaped           │
//!   │ }                                             │
//!   └───────────────────────────────────────────────┘
//!                            │
//!                            ▼
//!   finished (completion order), groups unwrapped into their tasks
//! ```
//!
//! ## Rules
//! - `|active| <= concurrency_limit` at every point of a run.
//! - Disabled jobs are retired straight to finished and never reach a thread.
//! - A break signal or the halt handle only stops **new** dispatch; active
//!   jobs always run to completion.
//! - Every worker is joined before its job enters the finished list; no
//!   thread outlives `run()`.
//! - After `run()` the finished and pending lists hold only original tasks.

use std::any::Any;
use std::collections::VecDeque;
use std::panic;
use std::sync::Arc;
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::core::builder::SchedulerBuilder;
use crate::core::poll::PollInterval;
use crate::core::regroup::{self, Strategy};
use crate::core::runner;
use crate::core::summary::{HaltReason, RunSummary};
use crate::events::{Event, EventKind, Snapshot};
use crate::subscribers::SubscriberSet;
use crate::tasks::{Job, Task, TaskCell, TaskEntry};

type Payload = Box<dyn Any + Send + 'static>;

/// Bounded-concurrency task scheduler.
///
/// `'t` is the lifetime of tasks the caller keeps ownership of
/// ([`submit_ref`](Scheduler::submit_ref)); the scheduler cannot outlive them.
///
/// # Example
/// ```
/// use taskpool::{Config, Scheduler, TaskContext, TaskFn};
///
/// let mut pool = Scheduler::new(Config { max_concurrent: 4, ..Config::default() });
/// for i in 0..8 {
///     pool.submit(TaskFn::new(format!("job-{i}"), move |_: &TaskContext<'_>| i * 10));
/// }
/// let summary = pool.run();
///
/// assert!(summary.is_complete());
/// assert_eq!(pool.finished().len(), 8);
/// ```
pub struct Scheduler<'t> {
    cfg: Config,
    limit: usize,
    pending: VecDeque<Job<'t>>,
    finished: Vec<Job<'t>>,
    poll: PollInterval,
    reorganized: bool,
    next_sequence: u64,
    next_index: usize,
    halt: CancellationToken,
    subs: SubscriberSet,
}

/// Emission context of a single run.
struct Frame<'r> {
    subs: &'r SubscriberSet,
    total: usize,
    limit: usize,
}

impl Frame<'_> {
    fn emit(&self, event: Event, finished: usize, active: usize, pending: usize) {
        if self.subs.is_empty() {
            return;
        }
        self.subs.emit(event.with_snapshot(Snapshot {
            finished,
            active,
            pending,
            total: self.total,
            limit: self.limit,
        }));
    }
}

impl<'t> Scheduler<'t> {
    /// Creates a scheduler with no subscribers beyond what `cfg` asks for.
    pub fn new(cfg: Config) -> Self {
        Self::builder(cfg).build()
    }

    /// Returns a builder for attaching event subscribers.
    pub fn builder(cfg: Config) -> SchedulerBuilder {
        SchedulerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, subs: SubscriberSet) -> Self {
        Self {
            limit: cfg.concurrency_limit(),
            poll: PollInterval::new(cfg.initial_poll_interval(), cfg.poll_floor),
            cfg,
            pending: VecDeque::new(),
            finished: Vec::new(),
            reorganized: false,
            next_sequence: 0,
            next_index: 0,
            halt: CancellationToken::new(),
            subs,
        }
    }

    /// Configuration the scheduler was built from.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Sets the maximum number of simultaneously running jobs (`0` → 1).
    pub fn set_concurrency_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
    }

    /// Maximum number of simultaneously running jobs.
    pub fn concurrency_limit(&self) -> usize {
        self.limit
    }

    /// Current adaptive poll interval.
    pub fn poll_interval(&self) -> Duration {
        self.poll.get()
    }

    /// Overrides the poll interval (never below [`Config::poll_floor`]).
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll.set(interval);
    }

    /// Token that stops new dispatch when cancelled, from any thread.
    ///
    /// A cancelled token keeps halting later runs until [`reset`](Self::reset)
    /// or [`clear`](Self::clear) arms a fresh one; handles taken before that
    /// are detached.
    pub fn halt_handle(&self) -> CancellationToken {
        self.halt.clone()
    }

    // ---------------------------------------------------------------------
    // Submission
    // ---------------------------------------------------------------------

    /// Moves `task` into the scheduler; it is dropped by the scheduler.
    ///
    /// Returns the submission index.
    pub fn submit<T: Task>(&mut self, task: T) -> usize {
        self.submit_cell(TaskCell::new(task))
    }

    /// Moves every task of `tasks` in, preserving order.
    pub fn submit_all<T, I>(&mut self, tasks: I)
    where
        T: Task,
        I: IntoIterator<Item = T>,
    {
        for task in tasks {
            self.submit(task);
        }
    }

    /// Moves a prepared cell in (for example one built with [`TaskCell::disabled`]).
    pub fn submit_cell<T: Task>(&mut self, cell: TaskCell<T>) -> usize {
        let index = self.take_index();
        self.pending.push_back(Job::Task(TaskEntry::owned(index, cell)));
        index
    }

    /// Queues a caller-owned cell. The scheduler only holds a reference.
    pub fn submit_ref<T: Task>(&mut self, cell: &'t TaskCell<T>) -> usize {
        let index = self.take_index();
        self.pending
            .push_back(Job::Task(TaskEntry::borrowed(index, cell)));
        index
    }

    /// Queues every caller-owned cell of `cells`, preserving order.
    pub fn submit_all_ref<T, I>(&mut self, cells: I)
    where
        T: Task,
        I: IntoIterator<Item = &'t TaskCell<T>>,
    {
        for cell in cells {
            self.submit_ref(cell);
        }
    }

    fn take_index(&mut self) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    // ---------------------------------------------------------------------
    // Run
    // ---------------------------------------------------------------------

    /// Dispatches pending jobs until the queue drains or dispatch is halted.
    ///
    /// Blocks the calling thread. Jobs left pending after a halt stay queued
    /// for the next run.
    ///
    /// # Panics
    /// If a task panics, the other active jobs are allowed to finish, the
    /// collections are restored, and the panic is resumed here.
    pub fn run(&mut self) -> RunSummary {
        let started = Instant::now();
        let limit = self.limit;
        let jobs: Vec<Job<'t>> = self.pending.drain(..).collect();
        let total = jobs.len();
        let frame = Frame {
            subs: &self.subs,
            total,
            limit,
        };

        let mut queue: VecDeque<usize> = (0..total).collect();
        let mut done: Vec<usize> = Vec::with_capacity(total);
        let mut halt: Option<HaltReason> = None;
        let mut fault: Option<Payload> = None;
        let mut dispatched = 0usize;
        let mut retired = 0usize;

        debug!(jobs = total, limit, "run started");
        frame.emit(Event::new(EventKind::RunStarted), 0, 0, total);

        thread::scope(|scope| {
            let mut active: Vec<(usize, ScopedJoinHandle<'_, ()>)> = Vec::with_capacity(limit);

            loop {
                if halt.is_none() && self.halt.is_cancelled() {
                    warn!("halt requested, dispatch stopped");
                    halt = Some(HaltReason::Halted);
                    frame.emit(
                        Event::new(EventKind::HaltRequested),
                        done.len(),
                        active.len(),
                        queue.len(),
                    );
                }
                let stopped = halt.is_some() || fault.is_some();

                while let Some(&idx) = queue.front() {
                    if stopped || active.len() >= limit {
                        break;
                    }
                    let job = &jobs[idx];
                    if !job.is_enabled() {
                        queue.pop_front();
                        done.push(idx);
                        retired += 1;
                        frame.emit(
                            Event::new(EventKind::TaskRetired).with_task(job.name()),
                            done.len(),
                            active.len(),
                            queue.len(),
                        );
                        continue;
                    }
                    queue.pop_front();

                    self.next_sequence += 1;
                    let sequence = self.next_sequence;
                    let state = job.state();
                    state.reset();
                    state.assign_sequence(sequence);
                    active.push((idx, scope.spawn(move || runner::start(job))));
                    dispatched += 1;

                    frame.emit(
                        Event::new(EventKind::TaskDispatched)
                            .with_task(job.name())
                            .with_sequence(Some(sequence)),
                        done.len(),
                        active.len(),
                        queue.len(),
                    );
                }

                let mut reaped = 0usize;
                let mut i = 0;
                while i < active.len() {
                    let idx = active[i].0;
                    let job = &jobs[idx];
                    if !job.is_finished() && !active[i].1.is_finished() {
                        i += 1;
                        continue;
                    }

                    let (_, handle) = active.remove(i);
                    let joined = handle.join();
                    done.push(idx);
                    reaped += 1;

                    if let Err(payload) = joined {
                        error!(task = job.name(), "task panicked, dispatch stopped");
                        fault.get_or_insert(payload);
                        continue;
                    }
                    if !job.is_finished() {
                        error!(task = job.name(), "worker exited without finishing its job");
                        fault.get_or_insert(Box::new("worker exited without finishing its job") as Payload);
                        continue;
                    }

                    let state = job.state();
                    let elapsed = state.elapsed();
                    if let Some(interval) = self.poll.observe(elapsed) {
                        frame.emit(
                            Event::new(EventKind::PollTightened).with_interval(interval),
                            done.len(),
                            active.len(),
                            queue.len(),
                        );
                    }
                    frame.emit(
                        Event::new(EventKind::TaskFinished)
                            .with_task(job.name())
                            .with_sequence(state.sequence_id())
                            .with_result(state.result())
                            .with_elapsed(elapsed),
                        done.len(),
                        active.len(),
                        queue.len(),
                    );

                    if halt.is_none() && job.should_break_pool() {
                        let task: Arc<str> = job
                            .tasks()
                            .iter()
                            .find(|child| child.state().should_break_pool())
                            .map_or(job.name(), TaskEntry::name)
                            .into();
                        warn!(task = %task, "break signal received, dispatch stopped");
                        frame.emit(
                            Event::new(EventKind::BreakRequested).with_task(Arc::clone(&task)),
                            done.len(),
                            active.len(),
                            queue.len(),
                        );
                        halt = Some(HaltReason::Break { task });
                    }
                }

                let stopped = halt.is_some() || fault.is_some();
                if stopped && active.is_empty() {
                    let (disabled, enabled): (Vec<usize>, Vec<usize>) =
                        queue.drain(..).partition(|&idx| !jobs[idx].is_enabled());
                    queue.extend(enabled);
                    for idx in disabled {
                        done.push(idx);
                        retired += 1;
                        frame.emit(
                            Event::new(EventKind::TaskRetired).with_task(jobs[idx].name()),
                            done.len(),
                            0,
                            queue.len(),
                        );
                    }
                    break;
                }
                if active.is_empty() && queue.is_empty() {
                    break;
                }
                if reaped == 0 {
                    thread::sleep(self.poll.get());
                }
            }
        });

        let mut slots: Vec<Option<Job<'t>>> = jobs.into_iter().map(Some).collect();
        self.finished
            .extend(done.iter().filter_map(|&idx| slots[idx].take()));
        self.pending
            .extend(queue.iter().filter_map(|&idx| slots[idx].take()));
        if self.reorganized {
            unwrap_groups(&mut self.finished, &mut self.pending);
            self.reorganized = false;
        }

        // Counted after unwrapping so children cut off inside a group show up.
        let stranded = self.pending.len();
        let elapsed = started.elapsed();
        if fault.is_none() {
            debug!(
                dispatched,
                retired,
                stranded,
                elapsed_ms = elapsed.as_millis() as u64,
                "run finished"
            );
            self.emit_now(Event::new(EventKind::RunFinished).with_elapsed(elapsed));
        }
        if let Some(payload) = fault {
            panic::resume_unwind(payload);
        }

        RunSummary {
            dispatched,
            retired,
            finished: done.len(),
            stranded,
            elapsed,
            halt,
        }
    }

    // ---------------------------------------------------------------------
    // Regrouping
    // ---------------------------------------------------------------------

    /// Batches pending tasks into `limit`-sized rounds of equal groups.
    ///
    /// No-op unless at least `2 * concurrency_limit` tasks are pending.
    /// Returns `true` if the queue was regrouped.
    pub fn reorganize_static(&mut self) -> bool {
        self.reorganize(Strategy::Static)
    }

    /// Batches pending tasks with group size tapering as the queue drains.
    ///
    /// Each round takes `remaining / divide` tasks (`divide = 0` → 1); the
    /// conventional value is 2. Same no-op threshold as
    /// [`reorganize_static`](Self::reorganize_static).
    pub fn reorganize_dynamic(&mut self, divide: usize) -> bool {
        self.reorganize(Strategy::Dynamic { divide })
    }

    fn reorganize(&mut self, strategy: Strategy) -> bool {
        let formed = regroup::regroup(&mut self.pending, self.limit, strategy);
        self.reorganized = self.pending.iter().any(Job::is_group);

        match formed {
            Some(groups) => {
                debug!(strategy = strategy.as_label(), groups, "pending tasks regrouped");
                self.emit_now(
                    Event::new(EventKind::Regrouped)
                        .with_reason(strategy.as_label())
                        .with_count(groups),
                );
                true
            }
            None => false,
        }
    }

    /// True while pending holds groups built by regrouping.
    pub fn is_reorganized(&self) -> bool {
        self.reorganized
    }

    // ---------------------------------------------------------------------
    // Requeue / discard
    // ---------------------------------------------------------------------

    /// Moves finished tasks back to pending, in finished order, for another pass.
    ///
    /// Result codes and durations stay readable until the next pass.
    pub fn reset(&mut self) {
        let count = self.finished.len();
        for job in self.finished.drain(..) {
            for task in job.tasks() {
                task.state().reset();
            }
            job.state().reset();
            self.pending.push_back(job);
        }
        self.rearm_halt();
        self.emit_now(Event::new(EventKind::PoolReset).with_count(count));
    }

    /// Drops every collection.
    ///
    /// Tasks the scheduler owns are dropped; caller-owned cells are only forgotten.
    pub fn clear(&mut self) {
        let count = self.tasks().count();
        self.pending.clear();
        self.finished.clear();
        self.reorganized = false;
        self.rearm_halt();
        self.emit_now(Event::new(EventKind::PoolCleared).with_count(count));
    }

    fn rearm_halt(&mut self) {
        if self.halt.is_cancelled() {
            self.halt = CancellationToken::new();
        }
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    /// Jobs waiting for dispatch, in dispatch order.
    pub fn pending(&self) -> &VecDeque<Job<'t>> {
        &self.pending
    }

    /// Jobs currently running. Always empty: kept so the three collections
    /// each have a view.
    ///
    /// The active set only exists inside [`run`](Self::run), which holds the
    /// scheduler exclusively; observe it live through event snapshots.
    pub fn active(&self) -> &[Job<'t>] {
        &[]
    }

    /// Finished jobs in completion order.
    pub fn finished(&self) -> &[Job<'t>] {
        &self.finished
    }

    /// Every held task, pending and finished, in submission order.
    pub fn ordered(&self) -> Vec<&TaskEntry<'t>> {
        let mut all: Vec<&TaskEntry<'t>> = self.tasks().collect();
        all.sort_by_key(|entry| entry.index());
        all
    }

    /// Collection counts right now.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            finished: self.finished.len(),
            active: 0,
            pending: self.pending.len(),
            total: self.finished.len() + self.pending.len(),
            limit: self.limit,
        }
    }

    fn tasks(&self) -> impl Iterator<Item = &TaskEntry<'t>> {
        self.pending
            .iter()
            .chain(self.finished.iter())
            .flat_map(|job| job.tasks().iter())
    }

    fn emit_now(&self, event: Event) {
        if !self.subs.is_empty() {
            self.subs.emit(event.with_snapshot(self.snapshot()));
        }
    }
}

/// Replaces every group by its tasks.
///
/// Children a break cut off (enabled, never finished) go back to the
/// front of pending, ahead of the jobs the halt stranded.
fn unwrap_groups<'t>(finished: &mut Vec<Job<'t>>, pending: &mut VecDeque<Job<'t>>) {
    let mut done = Vec::with_capacity(finished.len());
    let mut skipped = VecDeque::new();
    for entry in regroup::flatten(std::mem::take(finished)) {
        if entry.is_enabled() && !entry.is_finished() {
            skipped.push_back(Job::Task(entry));
        } else {
            done.push(Job::Task(entry));
        }
    }
    skipped.extend(regroup::flatten(std::mem::take(pending)).map(Job::Task));

    *finished = done;
    *pending = skipped;
}

impl std::fmt::Debug for Scheduler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("limit", &self.limit)
            .field("pending", &self.pending.len())
            .field("finished", &self.finished.len())
            .field("poll", &self.poll.get())
            .field("reorganized", &self.reorganized)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::tasks::{Ownership, TaskContext, TaskFn, TaskPhase};

    fn config(limit: usize) -> Config {
        Config {
            max_concurrent: limit,
            poll_interval: Duration::from_millis(5),
            ..Config::default()
        }
    }

    fn value_task(value: i32) -> TaskFn<impl FnMut(&TaskContext<'_>) -> i32 + Send + 'static> {
        TaskFn::new(format!("value-{value}"), move |_: &TaskContext<'_>| value)
    }

    fn results(pool: &Scheduler<'_>) -> Vec<(usize, i32)> {
        let mut out: Vec<_> = pool
            .finished()
            .iter()
            .map(|job| {
                let task = job.as_task().expect("plain task after run");
                (task.index(), task.result())
            })
            .collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn test_each_task_reports_its_own_result() {
        let mut pool = Scheduler::new(config(5));
        pool.submit_all((0..5).map(|i| value_task(i * 10)));
        let summary = pool.run();

        assert_eq!(summary.dispatched, 5);
        assert!(summary.is_complete());
        assert_eq!(pool.finished().len(), 5);
        assert!(pool.pending().is_empty());
        assert_eq!(
            results(&pool),
            vec![(0, 0), (1, 10), (2, 20), (3, 30), (4, 40)]
        );
    }

    #[test]
    fn test_disabled_tasks_never_run() {
        let ran: Vec<Arc<AtomicBool>> = (0..10).map(|_| Arc::new(AtomicBool::new(false))).collect();
        let cells: Vec<_> = ran
            .iter()
            .map(|flag| {
                let flag = Arc::clone(flag);
                TaskCell::new(TaskFn::new("flag", move |_: &TaskContext<'_>| {
                    flag.store(true, Ordering::SeqCst);
                    0
                }))
            })
            .collect();
        cells[1].set_enabled(false);
        cells[3].set_enabled(false);

        let mut pool = Scheduler::new(config(3));
        pool.submit_all_ref(&cells);
        let summary = pool.run();

        assert_eq!(pool.finished().len(), 10);
        assert_eq!(summary.retired, 2);
        assert_eq!(summary.dispatched, 8);
        for (i, flag) in ran.iter().enumerate() {
            assert_eq!(flag.load(Ordering::SeqCst), i != 1 && i != 3, "task {i}");
        }
        assert_eq!(cells[1].state().phase(), TaskPhase::Idle);
        assert_eq!(cells[3].state().sequence_id(), None);
    }

    #[test]
    fn test_concurrency_limit_is_never_exceeded() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut pool = Scheduler::new(config(3));
        for _ in 0..20 {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            pool.submit(TaskFn::new("busy", move |_: &TaskContext<'_>| {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(5));
                current.fetch_sub(1, Ordering::SeqCst);
                0
            }));
        }
        pool.run();

        assert_eq!(pool.finished().len(), 20);
        let peak = peak.load(Ordering::SeqCst);
        assert!((1..=3).contains(&peak), "peak = {peak}");
    }

    #[test]
    fn test_zero_limit_clamps_to_one() {
        let mut pool = Scheduler::new(config(0));
        assert_eq!(pool.concurrency_limit(), 1);
        pool.set_concurrency_limit(0);
        assert_eq!(pool.concurrency_limit(), 1);
        pool.set_concurrency_limit(6);
        assert_eq!(pool.concurrency_limit(), 6);
    }

    #[test]
    fn test_break_signal_stops_new_dispatch() {
        let mut pool = Scheduler::new(config(1));
        pool.submit(TaskFn::new("stopper", |ctx: &TaskContext<'_>| {
            ctx.request_break();
            1
        }));
        pool.submit_all((0..5).map(value_task));
        let summary = pool.run();

        assert!(pool.finished().len() < 6);
        assert_eq!(pool.finished()[0].name(), "stopper");
        assert_eq!(summary.stranded, 5);
        assert_eq!(pool.pending().len(), 5);
        assert!(matches!(summary.halt, Some(HaltReason::Break { ref task }) if &**task == "stopper"));
    }

    #[test]
    fn test_active_tasks_drain_after_break() {
        let mut pool = Scheduler::new(config(2));
        pool.submit(TaskFn::new("stopper", |ctx: &TaskContext<'_>| {
            ctx.request_break();
            0
        }));
        pool.submit(TaskFn::new("slow", |_: &TaskContext<'_>| {
            thread::sleep(Duration::from_millis(30));
            7
        }));
        pool.submit_all((0..4).map(value_task));
        pool.run();

        let slow = pool
            .finished()
            .iter()
            .find(|job| job.name() == "slow")
            .expect("slow task drained");
        assert_eq!(slow.state().result(), 7);
        assert!(!pool.pending().is_empty());
    }

    #[test]
    fn test_halt_handle_stops_new_dispatch() {
        let mut pool = Scheduler::new(config(1));
        let halt = pool.halt_handle();
        pool.submit(TaskFn::new("halter", move |_: &TaskContext<'_>| {
            halt.cancel();
            0
        }));
        pool.submit_all((0..3).map(value_task));
        let summary = pool.run();

        assert_eq!(summary.halt, Some(HaltReason::Halted));
        assert_eq!(pool.finished().len(), 1);
        assert_eq!(pool.pending().len(), 3);

        pool.reset();
        let summary = pool.run();
        assert!(summary.halt.is_none());
        assert_eq!(pool.finished().len(), 4);
    }

    #[test]
    fn test_reset_replays_identical_results() {
        let cells: Vec<_> = (0..6).map(|i| TaskCell::new(value_task(i * 3))).collect();
        let mut pool = Scheduler::new(config(2));
        pool.submit_all_ref(&cells);

        pool.run();
        let first = results(&pool);
        let order: Vec<usize> = pool
            .finished()
            .iter()
            .filter_map(|job| job.as_task().map(TaskEntry::index))
            .collect();

        pool.reset();
        assert!(pool.finished().is_empty());
        assert!(cells.iter().all(|c| !c.is_finished()));
        let requeued: Vec<usize> = pool
            .pending()
            .iter()
            .filter_map(|job| job.as_task().map(TaskEntry::index))
            .collect();
        assert_eq!(requeued, order);

        pool.run();
        assert_eq!(results(&pool), first);
        assert_eq!(pool.finished().len(), 6);
    }

    #[test]
    fn test_static_regrouping_is_transparent() {
        let cells: Vec<_> = (0..50).map(|i| TaskCell::new(value_task(i))).collect();
        let mut pool = Scheduler::new(config(4));
        pool.submit_all_ref(&cells);

        assert!(pool.reorganize_static());
        assert!(pool.is_reorganized());
        assert!(pool.pending().len() < 50);

        pool.run();
        assert!(!pool.is_reorganized());
        assert_eq!(pool.finished().len(), 50);
        for cell in &cells {
            let hits = pool
                .finished()
                .iter()
                .filter(|job| job.as_task().is_some_and(|t| t.is(cell)))
                .count();
            assert_eq!(hits, 1);
            assert!(cell.is_finished());
        }
        assert_eq!(results(&pool), (0..50).map(|i| (i, i as i32)).collect::<Vec<_>>());
    }

    #[test]
    fn test_dynamic_regrouping_is_transparent() {
        for divide in 0..4 {
            let mut pool = Scheduler::new(config(3));
            pool.submit_all((0..40).map(value_task));
            assert!(pool.reorganize_dynamic(divide));
            pool.run();

            assert_eq!(pool.finished().len(), 40, "divide = {divide}");
            assert!(pool.finished().iter().all(|job| !job.is_group()));
            assert_eq!(results(&pool), (0..40).map(|i| (i, i as i32)).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_regrouping_below_threshold_is_noop() {
        let mut pool = Scheduler::new(config(4));
        pool.submit_all((0..7).map(value_task));

        assert!(!pool.reorganize_static());
        assert!(!pool.reorganize_dynamic(2));
        assert!(!pool.is_reorganized());
        let order: Vec<usize> = pool
            .pending()
            .iter()
            .filter_map(|job| job.as_task().map(TaskEntry::index))
            .collect();
        assert_eq!(order, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_break_inside_group_leaves_rest_pending() {
        let mut pool = Scheduler::new(config(1));
        pool.submit_all((0..3).map(value_task));
        pool.submit(TaskFn::new("stopper", |ctx: &TaskContext<'_>| {
            ctx.request_break();
            0
        }));
        pool.submit_all((4..8).map(value_task));
        assert!(pool.reorganize_static());

        let summary = pool.run();
        assert!(summary.halt.is_some());
        assert!(!pool.is_reorganized());
        assert!(pool.finished().iter().all(|job| !job.is_group()));
        assert_eq!(results(&pool), vec![(0, 0), (1, 1), (2, 2), (3, 0)]);

        let waiting: Vec<usize> = pool
            .pending()
            .iter()
            .filter_map(|job| job.as_task().map(TaskEntry::index))
            .collect();
        assert_eq!(waiting, vec![4, 5, 6, 7]);
        assert_eq!(pool.ordered().len(), 8);

        assert_eq!(summary.stranded, 4);
        assert!(!summary.is_complete());
        assert_eq!(
            summary.halt,
            Some(HaltReason::Break {
                task: "stopper".into()
            })
        );
    }

    #[test]
    fn test_disabled_tasks_drain_after_break() {
        let cell = |name: &'static str, stop: bool| {
            TaskCell::new(TaskFn::new(name, move |ctx: &TaskContext<'_>| {
                if stop {
                    ctx.request_break();
                }
                0
            }))
        };
        let cells = [
            cell("stopper", true),
            cell("d1", false),
            cell("e", false),
            cell("d2", false),
        ];
        cells[1].set_enabled(false);
        cells[3].set_enabled(false);

        let mut pool = Scheduler::new(config(1));
        pool.submit_all_ref(&cells);
        let summary = pool.run();

        let finished: Vec<&str> = pool.finished().iter().map(Job::name).collect();
        assert_eq!(finished, vec!["stopper", "d1", "d2"]);
        let waiting: Vec<&str> = pool.pending().iter().map(Job::name).collect();
        assert_eq!(waiting, vec!["e"]);

        assert_eq!(summary.dispatched, 1);
        assert_eq!(summary.retired, 2);
        assert_eq!(summary.stranded, 1);
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_clear_drops_owned_and_forgets_borrowed() {
        struct Tracked(Arc<AtomicUsize>);

        impl Task for Tracked {
            fn execute(&mut self, _ctx: &TaskContext<'_>) -> i32 {
                5
            }
        }

        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let owned_drops = Arc::new(AtomicUsize::new(0));
        let kept_drops = Arc::new(AtomicUsize::new(0));
        let kept = TaskCell::new(Tracked(Arc::clone(&kept_drops)));

        let mut pool = Scheduler::new(config(2));
        pool.submit(Tracked(Arc::clone(&owned_drops)));
        pool.submit_ref(&kept);
        pool.run();

        let owners: Vec<Ownership> = pool.ordered().iter().map(|t| t.ownership()).collect();
        assert_eq!(owners, vec![Ownership::Scheduler, Ownership::Caller]);
        pool.clear();

        assert_eq!(owned_drops.load(Ordering::SeqCst), 1);
        assert_eq!(kept_drops.load(Ordering::SeqCst), 0);
        assert!(pool.finished().is_empty() && pool.pending().is_empty());
        drop(pool);
        assert_eq!(kept.result(), 5);
    }

    #[test]
    fn test_ordered_follows_submission() {
        let mut pool = Scheduler::new(config(4));
        for i in 0..4u64 {
            pool.submit(TaskFn::new(format!("sleep-{i}"), move |_: &TaskContext<'_>| {
                thread::sleep(Duration::from_millis(20 - i * 5));
                0
            }));
        }
        pool.run();

        let indices: Vec<usize> = pool.ordered().iter().map(|t| t.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_sequence_ids_follow_dispatch_order() {
        let mut pool = Scheduler::new(config(1));
        pool.submit_all((0..4).map(value_task));
        pool.run();

        let ids: Vec<Option<u64>> = pool
            .ordered()
            .iter()
            .map(|t| t.state().sequence_id())
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_fast_tasks_tighten_poll_interval() {
        let mut pool = Scheduler::new(Config {
            max_concurrent: 2,
            poll_interval: Duration::from_millis(200),
            ..Config::default()
        });
        pool.submit_all((0..4).map(value_task));
        pool.run();
        assert!(pool.poll_interval() < Duration::from_millis(200));
        assert!(pool.poll_interval() >= pool.config().poll_floor);
    }

    #[test]
    fn test_empty_run_returns_immediately() {
        let mut pool = Scheduler::new(config(2));
        let summary = pool.run();
        assert_eq!(summary.finished, 0);
        assert!(summary.is_complete());
        assert!(pool.active().is_empty());
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn test_task_panic_resumes_on_caller() {
        let mut pool = Scheduler::new(config(2));
        pool.submit(TaskFn::new("bomb", |_: &TaskContext<'_>| panic!("boom")));
        pool.submit_all((0..3).map(value_task));
        pool.run();
    }
}
