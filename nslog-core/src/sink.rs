//! Output sinks: where rendered lines end up.
//!
//! [`ConsoleSink`] prefixes each line with a `[HH:MM:SS]` local timestamp
//! and writes to stdout or stderr. [`MemorySink`] keeps lines in memory.
//! Write failures are ignored; console output is fire-and-forget.

use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::Local;

use crate::level::Stream;
use crate::render::{Styler, Tone};

/// Destination for one rendered line made of pre-styled tokens.
pub trait OutputSink: Send + Sync {
    fn write_line(&self, stream: Stream, tokens: &[String]);
}

/// Writes timestamped lines to the process's standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    styler: Styler,
}

impl ConsoleSink {
    pub fn new(styler: Styler) -> Self {
        Self { styler }
    }

    fn timestamp(&self) -> String {
        let stamp = Local::now().format("%H:%M:%S").to_string();
        format!("[{}]", self.styler.paint(Tone::Grey, &stamp))
    }
}

impl OutputSink for ConsoleSink {
    fn write_line(&self, stream: Stream, tokens: &[String]) {
        let line = format!("{} {}", self.timestamp(), tokens.join(" "));
        let _ = match stream {
            Stream::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
            Stream::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
        };
    }
}

/// One captured line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub stream: Stream,
    pub text: String,
}

/// Collects lines in memory instead of printing them.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain captured lines.
    pub fn take(&self) -> Vec<CapturedLine> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CapturedLine>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OutputSink for MemorySink {
    fn write_line(&self, stream: Stream, tokens: &[String]) {
        self.lock().push(CapturedLine {
            stream,
            text: tokens.join(" "),
        });
    }
}
