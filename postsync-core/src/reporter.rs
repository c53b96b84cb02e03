//! Operator-facing status channel.
//!
//! Pipeline stages never print. They talk to an injected [`Reporter`], so a
//! run can be observed on a console, through `tracing`, or in memory.

use std::sync::Mutex;

/// Status sink with three severities.
pub trait Reporter: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards every line to `tracing` under the `postsync::report` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: &str) {
        tracing::info!(target: "postsync::report", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "postsync::report", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "postsync::report", "{message}");
    }
}

/// One line captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedLine {
    Info(String),
    Warn(String),
    Error(String),
}

impl RecordedLine {
    pub fn message(&self) -> &str {
        match self {
            RecordedLine::Info(m) | RecordedLine::Warn(m) | RecordedLine::Error(m) => m,
        }
    }
}

/// Keeps every reported line in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    lines: Mutex<Vec<RecordedLine>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn lines(&self) -> Vec<RecordedLine> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| match l {
                RecordedLine::Warn(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| match l {
                RecordedLine::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// True if any line, of any severity, contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.message().contains(needle))
    }

    fn push(&self, line: RecordedLine) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(RecordedLine::Info(message.to_owned()));
    }

    fn warn(&self, message: &str) {
        self.push(RecordedLine::Warn(message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.push(RecordedLine::Error(message.to_owned()));
    }
}
