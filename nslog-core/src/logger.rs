//! Namespaced, level-filtered loggers.
//!
//! A [`NamespaceLogger`] is bound to a namespace label and a severity
//! threshold. Each emit call that passes the threshold writes one line to
//! the output sink and then republishes the original arguments, first on
//! the logger's own [`EventBus`] and then on the global one.
//!
//! ```rust,ignore
//! use nslog_core::prelude::*;
//! use serde_json::json;
//!
//! let log = NamespaceLogger::with_level("svc", "warn")?;
//! log.events().subscribe("Warn", |args| println!("warned: {:?}", args));
//!
//! log.info(&[json!("dropped")]);
//! log.warn(&[json!("disk almost full"), json!({ "free_mb": 120 })]);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::bench::{format_elapsed, BenchMark, BenchmarkTimer, BENCH_EVENT};
use crate::clock::{Clock, SystemClock};
use crate::config::{env_default_level, level_from_lookup};
use crate::error::{LoggerError, LoggerResult};
use crate::events::{global_bus, EventBus};
use crate::level::{rank, Level, LevelInput, Severity, Stream};
use crate::render::{display_args, Styler, Tone, BENCH_SYMBOL};
use crate::sink::{ConsoleSink, OutputSink};

/// Detached emit operation.
pub type EmitFn = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Detached level setter; `None` reads the current threshold.
pub type LevelFn = Arc<dyn Fn(Option<LevelInput>) -> LoggerResult<Severity> + Send + Sync>;

/// Detached benchmark operation: `(name, end) -> elapsed_ms`.
pub type BenchFn = Arc<dyn Fn(&str, bool) -> f64 + Send + Sync>;

struct Inner {
    namespace: String,
    threshold: AtomicU8,
    events: Arc<EventBus>,
    global: Arc<EventBus>,
    timers: BenchmarkTimer,
    sink: Arc<dyn OutputSink>,
    clock: Arc<dyn Clock>,
    styler: Styler,
}

/// Logger bound to one namespace.
///
/// Cloning is cheap and yields a handle to the same logger state.
#[derive(Clone)]
pub struct NamespaceLogger {
    inner: Arc<Inner>,
}

impl fmt::Debug for NamespaceLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceLogger")
            .field("namespace", &self.inner.namespace)
            .field("threshold", &self.level())
            .finish()
    }
}

impl NamespaceLogger {
    /// Logger at the default level (`LOG_LEVEL`, else `error`).
    pub fn new(namespace: impl Into<String>) -> LoggerResult<Self> {
        Self::builder(namespace).build()
    }

    pub fn with_level(
        namespace: impl Into<String>,
        level: impl Into<LevelInput>,
    ) -> LoggerResult<Self> {
        Self::builder(namespace).level(level).build()
    }

    pub fn builder(namespace: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(namespace)
    }

    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// Current threshold.
    pub fn level(&self) -> Severity {
        Severity::clamped(i64::from(self.inner.threshold.load(Ordering::Acquire)))
    }

    /// Validate and store a new threshold, returning it.
    pub fn set_level(&self, level: impl Into<LevelInput>) -> LoggerResult<Severity> {
        self.update_level(Some(level.into()))
    }

    /// Set the threshold when `level` is given; otherwise read it.
    pub fn update_level(&self, level: Option<LevelInput>) -> LoggerResult<Severity> {
        let Some(level) = level else {
            return Ok(self.level());
        };
        let severity = rank(&level)?;
        self.inner
            .threshold
            .store(severity.rank(), Ordering::Release);
        debug!(namespace = %self.inner.namespace, threshold = severity.name(), "level changed");
        Ok(severity)
    }

    /// Whether calls at `level` currently pass the threshold.
    pub fn is_enabled(&self, level: Level) -> bool {
        level.enabled_at(self.level())
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

    /// Emit at `level`: threshold check, one output line, then the instance
    /// and global events carrying the unconverted arguments.
    pub fn emit(&self, level: Level, args: &[Value]) {
        if !self.is_enabled(level) {
            return;
        }
        let inner = &self.inner;
        let tone = Tone::for_level(level);
        let message = display_args(args);

        inner.sink.write_line(
            level.stream(),
            &[
                inner.styler.level_symbol(level),
                inner.styler.namespace_label(&inner.namespace),
                inner.styler.paint(tone, &message),
            ],
        );

        inner.events.publish(level.event_name(), args);
        inner.global.publish(level.event_name(), args);
    }

    /// Start, tick or end the timer called `name`; returns elapsed
    /// milliseconds (`0` when the call started a timer).
    ///
    /// Publishes `Bench(name, elapsed, phase)` on the instance and global
    /// buses, then always writes a `Benchmark - name: elapsed` line,
    /// whatever the threshold.
    pub fn bench(&self, name: &str, end: bool) -> f64 {
        self.bench_mark(name, end).elapsed_ms
    }

    /// Like [`bench`](Self::bench) but also reports which transition ran.
    pub fn bench_mark(&self, name: &str, end: bool) -> BenchMark {
        let inner = &self.inner;
        let mark = inner.timers.mark(name, end, inner.clock.now());
        trace!(
            namespace = %inner.namespace,
            bench = %name,
            phase = %mark.phase,
            elapsed_ms = mark.elapsed_ms,
            "benchmark"
        );

        let payload = [
            Value::from(name),
            Value::from(mark.elapsed_ms),
            Value::from(mark.phase.as_str()),
        ];
        inner.events.publish(BENCH_EVENT, &payload);
        inner.global.publish(BENCH_EVENT, &payload);

        let text = format!("Benchmark - {}: {}", name, format_elapsed(mark.elapsed_ms));
        inner.sink.write_line(
            Stream::Stdout,
            &[
                inner.styler.paint(Tone::Magenta, BENCH_SYMBOL),
                inner.styler.namespace_label(&inner.namespace),
                inner.styler.paint(Tone::Magenta, &text),
            ],
        );
        mark
    }

    /// Names of this logger's running benchmark timers.
    pub fn running_benchmarks(&self) -> Vec<String> {
        self.inner.timers.running()
    }

    /// This logger's own event bus.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.inner.events
    }

    /// The shared bus this logger republishes into.
    pub fn global_events(&self) -> &Arc<EventBus> {
        &self.inner.global
    }

    /// Emit operation for `level` as a free-standing closure.
    pub fn emitter(&self, level: Level) -> EmitFn {
        let logger = self.clone();
        Arc::new(move |args: &[Value]| logger.emit(level, args))
    }

    /// Capability struct of detached closures over this logger's state.
    pub fn handle(&self) -> LoggerHandle {
        let for_level = self.clone();
        let for_bench = self.clone();
        LoggerHandle {
            debug: self.emitter(Level::Debug),
            info: self.emitter(Level::Info),
            success: self.emitter(Level::Success),
            warn: self.emitter(Level::Warn),
            error: self.emitter(Level::Error),
            level: Arc::new(move |level: Option<LevelInput>| for_level.update_level(level)),
            bench: Arc::new(move |name: &str, end: bool| for_bench.bench(name, end)),
            events: Arc::clone(&self.inner.events),
        }
    }
}

/// Detached operations of one logger. Every field keeps the logger state
/// alive, so the handle may outlive the logger value it came from.
#[derive(Clone)]
pub struct LoggerHandle {
    pub debug: EmitFn,
    pub info: EmitFn,
    pub success: EmitFn,
    pub warn: EmitFn,
    pub error: EmitFn,
    pub level: LevelFn,
    pub bench: BenchFn,
    pub events: Arc<EventBus>,
}

impl LoggerHandle {
    /// Emit operation for `level`.
    pub fn emit_fn(&self, level: Level) -> &EmitFn {
        match level {
            Level::Debug => &self.debug,
            Level::Info => &self.info,
            Level::Success => &self.success,
            Level::Warn => &self.warn,
            Level::Error => &self.error,
        }
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Builder for [`NamespaceLogger`].
///
/// # Example
///
/// ```rust,ignore
/// let log = NamespaceLogger::builder("worker")
///     .level("debug")
///     .sink(Arc::new(MemorySink::new()))
///     .global_bus(Arc::new(EventBus::new()))
///     .build()?;
/// ```
pub struct LoggerBuilder {
    /// Namespace label, validated on build
    namespace: String,

    /// Explicit initial level
    level: Option<LevelInput>,

    /// Whether `LOG_LEVEL` supplies the level when none is given
    use_env: bool,

    /// Variable lookup replacing the process environment
    env_lookup: Option<EnvLookup>,

    sink: Option<Arc<dyn OutputSink>>,
    clock: Option<Arc<dyn Clock>>,
    global: Option<Arc<EventBus>>,
    styler: Option<Styler>,
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("namespace", &self.namespace)
            .field("level", &self.level)
            .field("use_env", &self.use_env)
            .field("env_lookup", &self.env_lookup.is_some())
            .field("styler", &self.styler)
            .finish_non_exhaustive()
    }
}

impl LoggerBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            level: None,
            use_env: true,
            env_lookup: None,
            sink: None,
            clock: None,
            global: None,
            styler: None,
        }
    }

    /// Initial threshold, by name or rank.
    pub fn level(mut self, level: impl Into<LevelInput>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Enable or disable the `LOG_LEVEL` fallback.
    pub fn env_default(mut self, enabled: bool) -> Self {
        self.use_env = enabled;
        self
    }

    /// Resolve `LOG_LEVEL` through `lookup` instead of the process
    /// environment.
    pub fn env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env_lookup = Some(Box::new(lookup));
        self
    }

    pub fn sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Publish into `bus` instead of the process-wide bus.
    pub fn global_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.global = Some(bus);
        self
    }

    pub fn styler(mut self, styler: Styler) -> Self {
        self.styler = Some(styler);
        self
    }

    pub fn color(self, enabled: bool) -> Self {
        self.styler(Styler::new(enabled))
    }

    pub fn build(self) -> LoggerResult<NamespaceLogger> {
        if self.namespace.trim().is_empty() {
            return Err(LoggerError::EmptyNamespace);
        }

        let level = match (self.level, &self.env_lookup) {
            (Some(level), _) => Some(level),
            (None, _) if !self.use_env => None,
            (None, Some(lookup)) => level_from_lookup(lookup),
            (None, None) => env_default_level(),
        };
        let threshold = match level {
            Some(level) => rank(&level)?,
            None => Severity::default(),
        };

        let styler = self.styler.unwrap_or_default();
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(ConsoleSink::new(styler)));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let global = self.global.unwrap_or_else(global_bus);

        debug!(namespace = %self.namespace, threshold = threshold.name(), "logger created");

        Ok(NamespaceLogger {
            inner: Arc::new(Inner {
                timers: BenchmarkTimer::new(self.namespace.clone()),
                namespace: self.namespace,
                threshold: AtomicU8::new(threshold.rank()),
                events: Arc::new(EventBus::new()),
                global,
                sink,
                clock,
                styler,
            }),
        })
    }
}
