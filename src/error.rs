//! Error types used by the taskpool configuration layer.
//!
//! The scheduler itself never fails: task faults travel through each task's own
//! result code, and batching degrades to a no-op when it would not pay off.
//! The only typed error is [`ConfigError`], raised while seeding a
//! [`Config`](crate::Config) from the process environment.
//!
//! Like the rest of the crate, errors provide `as_label` / `as_message`
//! helpers for logs.

use thiserror::Error;

/// # Errors produced while loading configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable was set but its value could not be used.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidVar {
        /// Name of the offending variable.
        var: &'static str,
        /// Raw value as found in the environment.
        value: String,
        /// What was expected instead.
        reason: &'static str,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskpool::ConfigError;
    ///
    /// let err = ConfigError::InvalidVar {
    ///     var: "TASKPOOL_THREADS",
    ///     value: "many".into(),
    ///     reason: "expected a non-negative integer",
    /// };
    /// assert_eq!(err.as_label(), "config_invalid_var");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidVar { .. } => "config_invalid_var",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::InvalidVar { var, value, reason } => {
                format!("{var}={value:?} rejected: {reason}")
            }
        }
    }
}
