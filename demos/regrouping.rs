//! # Example: Regrouping strategies
//!
//! Runs the same 1000 short sleeping tasks several times on one scheduler:
//! one thread per task, then static batches, then dynamic batches with a few
//! divisors. `reset()` requeues the finished tasks between runs.
//!
//! ```text
//! cargo run --example regrouping --features logging
//! TASKPOOL_THREADS=16 TASKPOOL_PROGRESS=1 cargo run --example regrouping --features logging
//! ```

use std::{sync::Arc, thread, time::Duration};

use taskpool::{Config, LogWriter, Scheduler, Subscribe, TaskCell, TaskContext, TaskFn};

const TASKS: usize = 1000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut cfg = Config::from_env()?;
    if std::env::var_os(taskpool::ENV_THREADS).is_none() {
        cfg.max_concurrent = 32;
    }

    let cells: Vec<_> = (0..TASKS)
        .map(|i| {
            TaskCell::new(TaskFn::new(format!("sleep-{i}"), move |_: &TaskContext<'_>| {
                thread::sleep(Duration::from_millis(1 + (i % 5) as u64));
                0
            }))
        })
        .collect();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let mut pool = Scheduler::builder(cfg).with_subscribers(subs).build();
    pool.submit_all_ref(&cells);

    let plain = pool.run();
    println!("plain:            {:>8.1?}", plain.elapsed);

    pool.reset();
    pool.reorganize_static();
    let batched = pool.run();
    println!("static:           {:>8.1?}", batched.elapsed);

    for divide in 1..=4 {
        pool.reset();
        pool.reorganize_dynamic(divide);
        let summary = pool.run();
        println!("dynamic (/{divide}):     {:>8.1?}", summary.elapsed);
    }

    let failed = cells.iter().filter(|c| c.result() != 0).count();
    println!("tasks: {TASKS}, non-zero results: {failed}");
    Ok(())
}
