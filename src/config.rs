//! # Scheduler configuration.
//!
//! Provides [`Config`], the settings a [`Scheduler`](crate::Scheduler) is built from.
//!
//! Config is populated **once**, before the scheduler exists, and is never
//! re-read during a run. The scheduler core does not look at process state;
//! seeding from the environment is done explicitly with [`Config::from_env`].
//!
//! ## Sentinel values
//! - `max_concurrent = 0` → clamped to 1 (a scheduler always runs something)
//! - `poll_floor = 0s` → no floor (the poll interval may shrink to zero)
//!
//! ## Environment
//! | Variable            | Meaning                                       |
//! |---------------------|-----------------------------------------------|
//! | `TASKPOOL_THREADS`  | default concurrency limit (`0` → 1)           |
//! | `TASKPOOL_PROGRESS` | `0` none, `1` discrete, `2` continuous        |

use std::time::Duration;

use crate::error::ConfigError;

/// Environment variable carrying the default concurrency limit.
pub const ENV_THREADS: &str = "TASKPOOL_THREADS";
/// Environment variable carrying the progress rendering style.
pub const ENV_PROGRESS: &str = "TASKPOOL_PROGRESS";

/// How the built-in progress reporter renders run state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Nothing is rendered (default).
    #[default]
    None,
    /// One line per 10% of finished work.
    Discrete,
    /// A single line redrawn on every state change.
    Continuous,
}

impl ProgressStyle {
    /// Maps the numeric environment code (`0`, `1`, `2`) to a style.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ProgressStyle::None),
            1 => Some(ProgressStyle::Discrete),
            2 => Some(ProgressStyle::Continuous),
            _ => None,
        }
    }
}

/// Configuration for a [`Scheduler`](crate::Scheduler).
///
/// ## Field semantics
/// - `max_concurrent`: simultaneously running dispatch units (`0` is treated as 1)
/// - `poll_interval`: initial sleep between reap passes
/// - `poll_floor`: lower bound the adaptive interval never shrinks below
/// - `progress`: style of the built-in progress reporter (`None` = not installed)
/// - `bar_width`: width of the rendered progress bar in characters
///
/// ## Notes
/// All fields are public. Prefer the helper accessors so the clamping rules
/// stay in one place.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of tasks (or task groups) running at the same time.
    pub max_concurrent: usize,

    /// Initial sleep between two reap passes.
    ///
    /// Tightened during a run to the fastest task observed so far.
    pub poll_interval: Duration,

    /// Lower bound for the adaptive poll interval.
    pub poll_floor: Duration,

    /// Progress reporter installed by the builder.
    pub progress: ProgressStyle,

    /// Width of the progress bar in characters.
    pub bar_width: usize,
}

impl Config {
    /// Returns the concurrency limit, clamped to at least 1.
    #[inline]
    pub fn concurrency_limit(&self) -> usize {
        self.max_concurrent.max(1)
    }

    /// Returns the initial poll interval, never below [`Config::poll_floor`].
    #[inline]
    pub fn initial_poll_interval(&self) -> Duration {
        self.poll_interval.max(self.poll_floor)
    }

    /// Builds a config from the process environment on top of [`Config::default`].
    ///
    /// Unset variables keep their defaults; set-but-invalid variables are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// `lookup` is called once per known variable.
    ///
    /// # Example
    /// ```
    /// use taskpool::{Config, ProgressStyle};
    ///
    /// let cfg = Config::from_lookup(|var| match var {
    ///     "TASKPOOL_THREADS" => Some("8".to_string()),
    ///     "TASKPOOL_PROGRESS" => Some("1".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(cfg.concurrency_limit(), 8);
    /// assert_eq!(cfg.progress, ProgressStyle::Discrete);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_THREADS) {
            let threads = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidVar {
                    var: ENV_THREADS,
                    value: raw.clone(),
                    reason: "expected a non-negative integer",
                })?;
            cfg.max_concurrent = threads.max(1);
        }

        if let Some(raw) = lookup(ENV_PROGRESS) {
            cfg.progress = raw
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(ProgressStyle::from_code)
                .ok_or_else(|| ConfigError::InvalidVar {
                    var: ENV_PROGRESS,
                    value: raw.clone(),
                    reason: "expected 0, 1 or 2",
                })?;
        }

        Ok(cfg)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_concurrent = 1`
    /// - `poll_interval = 100ms`
    /// - `poll_floor = 1ms` (keeps zero-length tasks from causing a busy loop)
    /// - `progress = ProgressStyle::None`
    /// - `bar_width = 100`
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            poll_interval: Duration::from_millis(100),
            poll_floor: Duration::from_millis(1),
            progress: ProgressStyle::None,
            bar_width: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_zero_concurrency_clamps_to_one() {
        let cfg = Config {
            max_concurrent: 0,
            ..Config::default()
        };
        assert_eq!(cfg.concurrency_limit(), 1);
    }

    #[test]
    fn test_initial_poll_respects_floor() {
        let cfg = Config {
            poll_interval: Duration::ZERO,
            poll_floor: Duration::from_millis(2),
            ..Config::default()
        };
        assert_eq!(cfg.initial_poll_interval(), Duration::from_millis(2));
    }

    #[test]
    fn test_unset_environment_keeps_defaults() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.max_concurrent, 1);
        assert_eq!(cfg.progress, ProgressStyle::None);
    }

    #[test]
    fn test_environment_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            (ENV_THREADS, " 12 "),
            (ENV_PROGRESS, "2"),
        ]))
        .unwrap();
        assert_eq!(cfg.concurrency_limit(), 12);
        assert_eq!(cfg.progress, ProgressStyle::Continuous);
    }

    #[test]
    fn test_zero_threads_in_environment_clamps() {
        let cfg = Config::from_lookup(lookup(&[(ENV_THREADS, "0")])).unwrap();
        assert_eq!(cfg.max_concurrent, 1);
    }

    #[test]
    fn test_invalid_threads_is_rejected() {
        let err = Config::from_lookup(lookup(&[(ENV_THREADS, "-3")])).unwrap_err();
        assert_eq!(err.as_label(), "config_invalid_var");
        assert!(err.to_string().contains(ENV_THREADS));
    }

    #[test]
    fn test_unknown_progress_code_is_rejected() {
        let err = Config::from_lookup(lookup(&[(ENV_PROGRESS, "7")])).unwrap_err();
        match err {
            ConfigError::InvalidVar { var, value, .. } => {
                assert_eq!(var, ENV_PROGRESS);
                assert_eq!(value, "7");
            }
        }
    }
}
