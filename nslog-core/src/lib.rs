//! nslog-core: namespaced console logging with event republication.
//!
//! Each [`NamespaceLogger`] carries a namespace label and a severity
//! threshold. Calls that pass the threshold are written to the console and
//! republished as events, on the logger's own bus and on a process-wide bus
//! shared by every logger. Loggers also keep named benchmark timers.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use nslog_core::prelude::*;
//! use serde_json::json;
//!
//! global_bus().subscribe("Error", |args| eprintln!("someone failed: {:?}", args));
//!
//! let log = NamespaceLogger::with_level("db", "info")?;
//! log.info(&[json!("connected"), json!({ "pool": 8 })]);
//! log.debug(&[json!("not shown at info")]);
//!
//! log.bench("migrate", false);
//! // ...
//! let took_ms = log.bench("migrate", true);
//! ```
//!
//! # Module Organization
//!
//! - [`level`]: Severity ranks, level names and the five emitting levels
//! - [`events`]: Publish/subscribe buses and the global bus
//! - [`logger`]: Namespaced loggers, detached handles, builder
//! - [`bench`]: Start/tick/end benchmark timers
//! - [`facade`]: Namespace-free console output
//! - [`render`]: Symbols, colour tones, display strings
//! - [`sink`]: Console and in-memory output sinks
//! - [`clock`]: Monotonic time sources
//! - [`config`]: `nslog.toml` and `LOG_LEVEL`
//! - [`logging`]: Internal tracing diagnostics
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `color` (default): ANSI styling of console output

pub mod bench;
pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod facade;
pub mod level;
pub mod logger;
pub mod logging;
pub mod prelude;
pub mod render;
pub mod sink;

// ============================================================================
// Explicit Re-exports
// ============================================================================

// Error types
pub use error::{LoggerError, LoggerResult};

// Levels
pub use level::{rank, Level, LevelInput, Severity, Stream};

// Events
pub use events::{global_bus, EventBus, Handler, SubscriptionHandle};

// Loggers
pub use logger::{BenchFn, EmitFn, LevelFn, LoggerBuilder, LoggerHandle, NamespaceLogger};

// Benchmarks
pub use bench::{BenchMark, BenchPhase, BenchmarkTimer, BENCH_EVENT};

// Static output
pub use facade::StaticFacade;

// Rendering and sinks
pub use render::{display_arg, display_args, inspect, Styler, Tone, INSPECT_DEPTH};
pub use sink::{CapturedLine, ConsoleSink, MemorySink, OutputSink};

// Clocks
pub use clock::{Clock, ManualClock, SystemClock};

// Configuration
pub use config::{env_default_level, load_config, LevelSetting, NslogConfig, LEVEL_ENV_VAR};

// Diagnostics
pub use logging::init_diagnostics;
