//! Human-readable progress narration.
//!
//! Drivers push one line per phase transition to an [`OutputSink`]. Lines are
//! observational only: nothing reads them back to make decisions. The text of
//! every line comes from the pure functions in [`format`].

use std::sync::{Arc, Mutex};

pub mod format;

/// A push-style sink for narration lines.
pub trait OutputSink {
    /// Appends one line of output.
    fn push_output(&self, line: &str);
}

impl<S: OutputSink + ?Sized> OutputSink for &S {
    fn push_output(&self, line: &str) {
        (**self).push_output(line)
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Arc<S> {
    fn push_output(&self, line: &str) {
        (**self).push_output(line)
    }
}

/// Forwards narration to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn push_output(&self, line: &str) {
        tracing::info!(target: "fiddle_bisect::narration", "{}", line);
    }
}

/// Records narration lines in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line pushed so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl OutputSink for RecordingSink {
    fn push_output(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }
}
