//! Named interval timers owned by one logger.
//!
//! A timer is either absent or running. The first call for a name starts
//! it, later calls report elapsed time, and a call with `end = true`
//! reports and removes it. Presence in the map is the only state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::Instant;

use crate::clock::elapsed_millis;

/// Event name published for every benchmark call.
pub const BENCH_EVENT: &str = "Bench";

/// Which transition a benchmark call performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchPhase {
    Start,
    Tick,
    End,
}

impl BenchPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            BenchPhase::Start => "start",
            BenchPhase::Tick => "tick",
            BenchPhase::End => "end",
        }
    }
}

impl fmt::Display for BenchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one benchmark call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchMark {
    pub phase: BenchPhase,
    /// Milliseconds since the timer started; `0.0` on start.
    pub elapsed_ms: f64,
}

#[derive(Debug)]
pub struct BenchmarkTimer {
    namespace: String,
    entries: Mutex<HashMap<String, Instant>>,
}

impl BenchmarkTimer {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Internal key for a benchmark name: `namespace__name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}__{}", self.namespace, name)
    }

    /// Apply one start/tick/end transition at time `now`.
    ///
    /// `end` on a timer that does not exist starts a new one.
    pub fn mark(&self, name: &str, end: bool, now: Instant) -> BenchMark {
        let key = self.key(name);
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());

        match entries.get(&key).copied() {
            None => {
                entries.insert(key, now);
                BenchMark {
                    phase: BenchPhase::Start,
                    elapsed_ms: 0.0,
                }
            }
            Some(start) if end => {
                entries.remove(&key);
                BenchMark {
                    phase: BenchPhase::End,
                    elapsed_ms: elapsed_millis(start, now),
                }
            }
            Some(start) => BenchMark {
                phase: BenchPhase::Tick,
                elapsed_ms: elapsed_millis(start, now),
            },
        }
    }

    /// Names of running timers, sorted.
    pub fn running(&self) -> Vec<String> {
        let prefix = format!("{}__", self.namespace);
        let mut names: Vec<String> = self
            .entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix).map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

/// Format elapsed milliseconds for the benchmark output line.
pub fn format_elapsed(elapsed_ms: f64) -> String {
    let rounded = (elapsed_ms * 1000.0).round() / 1000.0;
    format!("{}ms", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_start_tick_end_cycle() {
        let timer = BenchmarkTimer::new("svc");
        let t0 = Instant::now();

        let start = timer.mark("op", false, t0);
        assert_eq!(start.phase, BenchPhase::Start);
        assert_eq!(start.elapsed_ms, 0.0);
        assert_eq!(timer.running(), vec!["op"]);

        let tick = timer.mark("op", false, t0 + Duration::from_millis(500));
        assert_eq!(tick.phase, BenchPhase::Tick);
        assert_eq!(tick.elapsed_ms, 500.0);

        let end = timer.mark("op", true, t0 + Duration::from_millis(1000));
        assert_eq!(end.phase, BenchPhase::End);
        assert_eq!(end.elapsed_ms, 1000.0);
        assert!(timer.running().is_empty());

        let restart = timer.mark("op", false, t0 + Duration::from_millis(1200));
        assert_eq!(restart.phase, BenchPhase::Start);
        assert_eq!(restart.elapsed_ms, 0.0);
    }

    #[test]
    fn test_end_without_start_starts() {
        let timer = BenchmarkTimer::new("svc");
        let mark = timer.mark("ghost", true, Instant::now());
        assert_eq!(mark.phase, BenchPhase::Start);
        assert_eq!(mark.elapsed_ms, 0.0);
        assert_eq!(timer.running(), vec!["ghost"]);
    }

    #[test]
    fn test_timers_are_independent_by_name() {
        let timer = BenchmarkTimer::new("svc");
        let t0 = Instant::now();
        timer.mark("a", false, t0);
        timer.mark("b", false, t0 + Duration::from_millis(100));

        let a = timer.mark("a", false, t0 + Duration::from_millis(300));
        let b = timer.mark("b", false, t0 + Duration::from_millis(300));
        assert_eq!(a.elapsed_ms, 300.0);
        assert_eq!(b.elapsed_ms, 200.0);
        assert_eq!(timer.running(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_key_format() {
        let timer = BenchmarkTimer::new("svc");
        assert_eq!(timer.key("op"), "svc__op");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0), "0ms");
        assert_eq!(format_elapsed(500.0), "500ms");
        assert_eq!(format_elapsed(12.3456789), "12.346ms");
        assert_eq!(BenchPhase::Tick.to_string(), "tick");
    }
}
