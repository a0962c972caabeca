//! # Event subscribers for the scheduler.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and built-in implementations for handling events emitted by a
//! [`Scheduler`](crate::Scheduler).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Scheduler::run ── emit(Event) ──► SubscriberSet ──► queue per subscriber
//!                                                          │
//!                                                          ├──► ProgressBar (stderr)
//!                                                          ├──► LogWriter   (tracing)
//!                                                          └──► Custom ...
//! ```
//!
//! Subscribers only observe: they get owned snapshots, never the scheduler.

mod embedded;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use embedded::ProgressBar;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
