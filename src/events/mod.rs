//! Scheduler events: types and state snapshots.
//!
//! This module groups the event **data model** emitted by the scheduler's
//! control thread and delivered to subscribers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Snapshot`] counts of finished/active/pending jobs at emission time
//!
//! ## Quick reference
//! - **Publisher**: `Scheduler` (dispatch, reap, regroup, reset, clear).
//! - **Consumers**: `SubscriberSet` workers, one per [`Subscribe`](crate::Subscribe).

mod event;

pub use event::{Event, EventKind, Snapshot};
