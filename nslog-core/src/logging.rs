//! Internal diagnostics via **tracing**.
//!
//! The library itself only emits `tracing` events (logger creation, level
//! changes, benchmark transitions, panicking subscribers). Nothing is
//! printed unless a subscriber is installed, for example with
//! [`init_diagnostics`].

/// Initializes a human-readable tracing subscriber on stderr.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls filtering (e.g., `RUST_LOG=nslog_core=trace`)
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_diagnostics() -> bool {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr) // keep stdout for log lines
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        init_diagnostics();
        assert!(!init_diagnostics());
    }
}
