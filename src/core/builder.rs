use std::sync::Arc;

use crate::{
    config::{Config, ProgressStyle},
    subscribers::{ProgressBar, Subscribe, SubscriberSet},
};

use super::scheduler::Scheduler;

/// Builder for constructing a [`Scheduler`] with event subscribers.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use taskpool::{Config, Event, Scheduler, Subscribe};
///
/// struct Quiet;
///
/// impl Subscribe for Quiet {
///     fn on_event(&self, _event: &Event) {}
///     fn name(&self) -> &'static str { "quiet" }
/// }
///
/// let pool: Scheduler<'_> = Scheduler::builder(Config::default())
///     .with_subscriber(Arc::new(Quiet))
///     .build();
/// assert_eq!(pool.concurrency_limit(), 1);
/// ```
pub struct SchedulerBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive scheduler events (dispatch, completion, regrouping)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber to the ones already set.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the scheduler and starts one worker per subscriber.
    ///
    /// A [`ProgressBar`] writing to stderr is appended when
    /// `cfg.progress` is not [`ProgressStyle::None`].
    pub fn build<'t>(mut self) -> Scheduler<'t> {
        if self.cfg.progress != ProgressStyle::None {
            self.subscribers.push(Arc::new(ProgressBar::new(
                self.cfg.progress,
                self.cfg.bar_width,
            )));
        }
        let subs = SubscriberSet::new(self.subscribers);
        Scheduler::new_internal(self.cfg, subs)
    }
}
