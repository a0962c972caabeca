//! # Built-in subscribers
//!
//! These are small, self-contained implementations useful for demos and
//! interactive runs.
//!
//! - [`ProgressBar`]: renders run progress as a text bar (stderr by default).
//! - [`LogWriter`]: forwards events to `tracing` (feature `logging`).

#[cfg(feature = "logging")]
mod log;
mod progress;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use progress::ProgressBar;
