//! Namespace-free console output.
//!
//! These calls always write: no namespace label, no threshold and no
//! events. Use them where no logger instance is at hand.

use std::sync::Arc;

use serde_json::Value;

use crate::level::{Level, Stream};
use crate::render::{display_args, Styler, Tone};
use crate::sink::{ConsoleSink, OutputSink};

/// Level-tagged output bound to a sink.
#[derive(Clone)]
pub struct StaticFacade {
    sink: Arc<dyn OutputSink>,
    styler: Styler,
}

impl Default for StaticFacade {
    fn default() -> Self {
        let styler = Styler::default();
        Self::new(Arc::new(ConsoleSink::new(styler)), styler)
    }
}

impl std::fmt::Debug for StaticFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticFacade")
            .field("styler", &self.styler)
            .finish_non_exhaustive()
    }
}

impl StaticFacade {
    pub fn new(sink: Arc<dyn OutputSink>, styler: Styler) -> Self {
        Self { sink, styler }
    }

    pub fn emit(&self, level: Level, args: &[Value]) {
        self.emit_to(level.stream(), level, args);
    }

    /// Write a level-tagged line to an explicit stream.
    pub fn emit_to(&self, stream: Stream, level: Level, args: &[Value]) {
        let message = display_args(args);
        self.sink.write_line(
            stream,
            &[
                self.styler.level_symbol(level),
                self.styler.paint(Tone::for_level(level), &message),
            ],
        );
    }

    pub fn debug(&self, args: &[Value]) {
        self.emit(Level::Debug, args);
    }

    pub fn info(&self, args: &[Value]) {
        self.emit(Level::Info, args);
    }

    pub fn success(&self, args: &[Value]) {
        self.emit(Level::Success, args);
    }

    pub fn warn(&self, args: &[Value]) {
        self.emit(Level::Warn, args);
    }

    pub fn error(&self, args: &[Value]) {
        self.emit(Level::Error, args);
    }
}

pub fn debug(args: &[Value]) {
    StaticFacade::default().debug(args);
}

pub fn info(args: &[Value]) {
    StaticFacade::default().info(args);
}

pub fn success(args: &[Value]) {
    StaticFacade::default().success(args);
}

pub fn warn(args: &[Value]) {
    StaticFacade::default().warn(args);
}

pub fn error(args: &[Value]) {
    StaticFacade::default().error(args);
}
