//! # ProgressBar: text rendering of run progress
//!
//! Consumes the [`Snapshot`] carried by every transition event and draws a
//! bar where `=` marks finished jobs, `-` marks running jobs and blanks mark
//! what is still pending.
//!
//! ## Styles
//! ```text
//! Discrete   (one line per 10% of finished jobs)
//! [==========----                ]  30 % finished jobs (2 secs)
//!
//! Continuous (one line, redrawn in place)
//! [==========----                ] 30 % finished jobs | 12 % active jobs | 100 % load
//! ```
//!
//! The bar never touches the scheduler; it only reads snapshots, so a slow
//! terminal delays nothing but its own queue.

use std::io::{self, Write};
use std::time::Instant;

use parking_lot::Mutex;

use crate::config::ProgressStyle;
use crate::events::{Event, EventKind, Snapshot};
use crate::subscribers::Subscribe;

struct Steps {
    next: usize,
    last: Instant,
}

/// Progress bar subscriber.
pub struct ProgressBar {
    style: ProgressStyle,
    width: usize,
    out: Mutex<Box<dyn Write + Send>>,
    steps: Mutex<Steps>,
}

impl ProgressBar {
    /// Bar of `width` characters drawn on stderr.
    #[must_use]
    pub fn new(style: ProgressStyle, width: usize) -> Self {
        Self::with_writer(style, width, io::stderr())
    }

    /// Bar of `width` characters drawn on `out`.
    pub fn with_writer(style: ProgressStyle, width: usize, out: impl Write + Send + 'static) -> Self {
        Self {
            style,
            width,
            out: Mutex::new(Box::new(out)),
            steps: Mutex::new(Steps {
                next: 0,
                last: Instant::now(),
            }),
        }
    }

    /// Draws the bar body (without brackets) for `snapshot`.
    pub fn render(snapshot: &Snapshot, width: usize) -> String {
        let finished = (width as f64 * snapshot.progress()) as usize;
        let started = (width as f64 * snapshot.started()) as usize;
        (1..width)
            .map(|i| {
                if i <= finished {
                    '='
                } else if i <= started {
                    '-'
                } else {
                    ' '
                }
            })
            .collect()
    }

    fn discrete(&self, e: &Event) -> io::Result<()> {
        let s = &e.snapshot;
        let mut steps = self.steps.lock();
        if e.kind == EventKind::RunStarted {
            steps.next = 0;
            steps.last = Instant::now();
        }
        if s.total == 0 {
            return Ok(());
        }

        let step = s.finished * 10 / s.total;
        if step < steps.next {
            return Ok(());
        }
        steps.next = step + 1;

        let pct = s.finished * 100 / s.total;
        let bar = Self::render(s, self.width);
        let mut out = self.out.lock();
        if pct == 0 {
            writeln!(out, "[{bar}] {pct:>3} % finished jobs")?;
        } else {
            let secs = steps.last.elapsed().as_secs();
            writeln!(out, "[{bar}] {pct:>3} % finished jobs ({secs} secs)")?;
        }
        steps.last = Instant::now();
        Ok(())
    }

    fn continuous(&self, e: &Event) -> io::Result<()> {
        let s = &e.snapshot;
        let total = s.total.max(1);
        let bar = Self::render(s, self.width);
        let mut out = self.out.lock();
        write!(
            out,
            "\r[{bar}] {} % finished jobs | {} % active jobs | {} % load ",
            s.finished * 100 / total,
            s.active * 100 / total,
            (s.load() * 100.0) as usize,
        )?;
        if e.kind == EventKind::RunFinished {
            writeln!(out)?;
        }
        out.flush()
    }
}

impl Subscribe for ProgressBar {
    fn on_event(&self, e: &Event) {
        if !e.is_transition() {
            return;
        }
        // Write errors are dropped.
        let _ = match self.style {
            ProgressStyle::None => Ok(()),
            ProgressStyle::Discrete => self.discrete(e),
            ProgressStyle::Continuous => self.continuous(e),
        };
    }

    fn name(&self) -> &'static str {
        "ProgressBar"
    }

    fn queue_capacity(&self) -> usize {
        4096
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    fn event(kind: EventKind, finished: usize, active: usize, total: usize) -> Event {
        Event::new(kind).with_snapshot(Snapshot {
            finished,
            active,
            pending: total - finished - active,
            total,
            limit: 4,
        })
    }

    #[test]
    fn test_render_marks_finished_and_active() {
        let s = Snapshot {
            finished: 2,
            active: 3,
            pending: 5,
            total: 10,
            limit: 4,
        };
        assert_eq!(ProgressBar::render(&s, 11), "==---     ");
        assert_eq!(ProgressBar::render(&s, 0), "");
    }

    #[test]
    fn test_discrete_prints_each_tenth_once() {
        let buf = Buffer::default();
        let bar = ProgressBar::with_writer(ProgressStyle::Discrete, 21, buf.clone());

        bar.on_event(&event(EventKind::RunStarted, 0, 0, 20));
        for finished in 1..=20 {
            bar.on_event(&event(EventKind::TaskFinished, finished, 0, 20));
            bar.on_event(&event(EventKind::PollTightened, finished, 0, 20));
        }

        let text = buf.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].ends_with("  0 % finished jobs"));
        assert!(lines[10].contains("100 % finished jobs"));
        assert!(lines[10].starts_with(&format!("[{}]", "=".repeat(20))));
    }

    #[test]
    fn test_continuous_redraws_in_place() {
        let buf = Buffer::default();
        let bar = ProgressBar::with_writer(ProgressStyle::Continuous, 10, buf.clone());

        bar.on_event(&event(EventKind::TaskDispatched, 0, 2, 8));
        bar.on_event(&event(EventKind::RunFinished, 8, 0, 8));

        let text = buf.text();
        assert!(text.starts_with("\r["));
        assert!(text.contains("0 % finished jobs | 25 % active jobs | 50 % load"));
        assert!(text.ends_with("100 % finished jobs | 0 % active jobs | 0 % load \n"));
    }

    #[test]
    fn test_none_style_is_silent() {
        let buf = Buffer::default();
        let bar = ProgressBar::with_writer(ProgressStyle::None, 10, buf.clone());
        bar.on_event(&event(EventKind::RunStarted, 0, 0, 3));
        assert!(buf.text().is_empty());
    }
}
