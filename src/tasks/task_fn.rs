//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: FnMut(&TaskContext) -> i32`. The closure owns
//! whatever state it captures; share state with the caller explicitly through
//! `Arc<...>` if the result must be observed outside the task.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use taskpool::{Config, Scheduler, TaskContext, TaskFn};
//!
//! let ran = Arc::new(AtomicBool::new(false));
//! let flag = Arc::clone(&ran);
//!
//! let mut pool = Scheduler::new(Config::default());
//! pool.submit(TaskFn::new("hello", move |_ctx: &TaskContext<'_>| {
//!     flag.store(true, Ordering::SeqCst);
//!     0
//! }));
//! pool.run();
//!
//! assert!(ran.load(Ordering::SeqCst));
//! ```

use std::borrow::Cow;

use crate::tasks::task::{Task, TaskContext};

/// Function-backed task implementation.
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F>
where
    F: FnMut(&TaskContext<'_>) -> i32 + Send + 'static,
{
    /// Creates a new function-backed task.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> std::fmt::Debug for TaskFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskFn").field("name", &self.name).finish()
    }
}

impl<F> Task for TaskFn<F>
where
    F: FnMut(&TaskContext<'_>) -> i32 + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self, ctx: &TaskContext<'_>) -> i32 {
        (self.f)(ctx)
    }
}
