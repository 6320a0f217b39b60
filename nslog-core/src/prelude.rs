//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use nslog_core::prelude::*;
//! ```

// Loggers and levels
pub use crate::error::{LoggerError, LoggerResult};
pub use crate::level::{Level, LevelInput, Severity};
pub use crate::logger::{LoggerHandle, NamespaceLogger};

// Events
pub use crate::events::{global_bus, EventBus};

// Benchmarks
pub use crate::bench::{BenchMark, BenchPhase};

// Output
pub use crate::facade::StaticFacade;
pub use crate::sink::{ConsoleSink, MemorySink, OutputSink};
