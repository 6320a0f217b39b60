//! nslog CLI - drive namespaced loggers from the command line.
//!
//! Features:
//! - Emit messages at any level through a namespaced logger
//! - Run start/tick/end benchmark timers
//! - Demo of every level, called directly and through detached handles
//! - Watch the process-wide event bus

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use nslog_core::{
    facade, global_bus, init_diagnostics, load_config, ConsoleSink, EventBus, Level,
    LoggerBuilder, NamespaceLogger, StaticFacade, Stream, Styler, BENCH_EVENT,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Namespaced console logger")]
pub struct Cli {
    /// Disable ANSI colours
    #[arg(long, global = true)]
    no_color: bool,

    /// Print internal diagnostics to stderr (filtered by RUST_LOG)
    #[arg(long, global = true)]
    diagnostics: bool,

    /// Report every event published on the global bus
    #[arg(long, global = true)]
    watch: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Emit messages at one level
    Emit {
        /// Logger namespace
        #[arg(long, short)]
        namespace: String,

        /// Logger threshold (name or 0-5)
        #[arg(long, short)]
        level: Option<String>,

        /// Level to emit at
        #[arg(long, value_parser = parse_emit_level, default_value = "info")]
        at: Level,

        /// Messages; JSON values are passed through as structured arguments
        #[arg(required = true)]
        messages: Vec<String>,
    },

    /// Run a benchmark timer through start, ticks and end
    Bench {
        #[arg(long, short)]
        namespace: String,

        /// Benchmark name
        #[arg(long)]
        name: String,

        /// Number of ticks between start and end
        #[arg(long, default_value_t = 1)]
        ticks: u32,

        /// Sleep between steps, in milliseconds
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
    },

    /// Emit at every level, directly and through detached handles
    Demo {
        #[arg(long, short, default_value = "demo")]
        namespace: String,
    },
}

/// Parses an emit level name. `disable` is a threshold, not an emit level.
fn parse_emit_level(raw: &str) -> std::result::Result<Level, String> {
    Level::ALL
        .into_iter()
        .find(|level| level.event_name().eq_ignore_ascii_case(raw))
        .ok_or_else(|| format!("'{}' is not an emit level", raw.to_lowercase()))
}

/// Turns a CLI message into an argument: valid JSON objects, arrays and
/// numbers stay structured, everything else is a plain string.
fn message_arg(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Object(_) | Value::Array(_) | Value::Number(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Base builder for every logger the CLI creates.
fn base_builder(namespace: &str, cli: &Cli, cwd: &Path) -> LoggerBuilder {
    let mut builder = NamespaceLogger::builder(namespace);
    match load_config(cwd) {
        Ok(Some(cfg)) => builder = cfg.apply(builder),
        Ok(None) => {}
        Err(e) => facade::warn(&[json!(format!("config load failed: {:#}", e))]),
    }
    if cli.no_color {
        builder = builder.color(false);
    }
    builder
}

/// Report every level and bench event published on `bus` to stderr, so
/// watched events never interleave with the logger's own stdout lines.
fn watch_bus(bus: &EventBus, reporter: StaticFacade) {
    let names = Level::ALL
        .iter()
        .map(|l| l.event_name())
        .chain(std::iter::once(BENCH_EVENT));
    for name in names {
        let reporter = reporter.clone();
        bus.subscribe(name, move |args| {
            reporter.emit_to(
                Stream::Stderr,
                Level::Debug,
                &[json!(format!("[event {}]", name)), Value::Array(args.to_vec())],
            );
        });
    }
}

fn run_emit(logger: &NamespaceLogger, at: Level, messages: &[String]) {
    let args: Vec<Value> = messages.iter().map(|m| message_arg(m)).collect();
    logger.emit(at, &args);
}

fn run_bench(logger: &NamespaceLogger, name: &str, ticks: u32, interval: Duration) -> f64 {
    logger.bench(name, false);
    for _ in 0..ticks {
        std::thread::sleep(interval);
        logger.bench(name, false);
    }
    std::thread::sleep(interval);
    logger.bench(name, true)
}

fn run_demo(logger: &NamespaceLogger) {
    for level in Level::ALL {
        logger.emit(level, &[json!(level.event_name().to_lowercase())]);
    }

    let handle = logger.handle();
    for level in Level::ALL {
        let message = format!("{} lost context", level.event_name().to_lowercase());
        (handle.emit_fn(level))(&[json!(message)]);
    }

    for level in Level::ALL {
        let message = format!("{} static", level.event_name().to_lowercase());
        match level {
            Level::Debug => facade::debug(&[json!(message)]),
            Level::Info => facade::info(&[json!(message)]),
            Level::Success => facade::success(&[json!(message)]),
            Level::Warn => facade::warn(&[json!(message)]),
            Level::Error => facade::error(&[json!(message)]),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.diagnostics {
        init_diagnostics();
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let styler = if cli.no_color {
        Styler::plain()
    } else {
        Styler::default()
    };
    if cli.watch {
        let reporter = StaticFacade::new(Arc::new(ConsoleSink::new(styler)), styler);
        watch_bus(&global_bus(), reporter);
    }

    match &cli.command {
        Command::Emit {
            namespace,
            level,
            at,
            messages,
        } => {
            let mut builder = base_builder(namespace, &cli, &cwd);
            if let Some(level) = level {
                builder = builder.level(level.as_str());
            }
            let logger = builder
                .build()
                .with_context(|| format!("Failed to create logger '{}'", namespace))?;
            run_emit(&logger, *at, messages);
        }
        Command::Bench {
            namespace,
            name,
            ticks,
            interval_ms,
        } => {
            let logger = base_builder(namespace, &cli, &cwd)
                .build()
                .with_context(|| format!("Failed to create logger '{}'", namespace))?;
            run_bench(&logger, name, *ticks, Duration::from_millis(*interval_ms));
        }
        Command::Demo { namespace } => {
            let logger = base_builder(namespace, &cli, &cwd)
                .level("debug")
                .build()
                .with_context(|| format!("Failed to create logger '{}'", namespace))?;
            run_demo(&logger);
        }
    }

    Ok(())
}
