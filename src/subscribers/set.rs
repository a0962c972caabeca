//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`] to multiple subscribers
//! **without waiting** for their processing.
//!
//! ## What it guarantees
//! - `emit(Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and logged (isolation).
//! - Dropping the set drains every queue and joins every worker.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for that
//!   subscriber).
//!
//! ## Diagram
//! ```text
//!    emit(Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► thread S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► thread S2 ─► on_event()
//!        └────────────────► [queue SN] ─► thread SN ─► on_event()
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;
use tracing::warn;

use crate::events::Event;

use super::Subscribe;

/// Per-subscriber channel with metadata
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker threads.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker thread per subscriber.
    ///
    /// A subscriber whose thread cannot be spawned is skipped (warn).
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);

            let spawned = thread::Builder::new()
                .name(format!("taskpool-sub-{name}"))
                .spawn(move || {
                    while let Some(ev) = rx.blocking_recv() {
                        let handled = panic::catch_unwind(AssertUnwindSafe(|| sub.on_event(&ev)));
                        if let Err(payload) = handled {
                            warn!(
                                subscriber = sub.name(),
                                info = panic_message(payload.as_ref()),
                                "subscriber panicked"
                            );
                        }
                    }
                });

            match spawned {
                Ok(handle) => {
                    channels.push(SubscriberChannel { name, sender: tx });
                    workers.push(handle);
                }
                Err(err) => {
                    warn!(subscriber = name, error = %err, "subscriber worker not started");
                }
            }
        }

        Self { channels, workers }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is dropped for it
    /// and a warning is logged with the subscriber's name.
    pub fn emit(&self, event: Event) {
        if self.channels.is_empty() {
            return;
        }
        let ev = Arc::new(event);
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber = channel.name, "event dropped: queue full");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    warn!(subscriber = channel.name, "event dropped: worker closed");
                }
            }
        }
    }

    /// Graceful shutdown: close all queues and join the workers.
    ///
    /// Events already queued are still delivered. Called on drop.
    pub fn shutdown(&mut self) {
        self.channels.clear();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

impl Drop for SubscriberSet {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown"
    }
}
