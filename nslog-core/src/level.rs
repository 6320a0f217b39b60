//! Severity ranks and the five emitting levels.
//!
//! Severity is a total order over `0..=5` where larger means more verbose.
//! A logger at threshold `t` lets through every level whose required
//! severity is `<= t`.

use std::fmt;

use serde_json::Value;

use crate::error::{LoggerError, LoggerResult};

/// Severity rank in `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(u8);

impl Severity {
    pub const DISABLE: Severity = Severity(0);
    pub const ERROR: Severity = Severity(1);
    pub const WARN: Severity = Severity(2);
    pub const SUCCESS: Severity = Severity(3);
    pub const INFO: Severity = Severity(4);
    pub const DEBUG: Severity = Severity(5);

    /// Highest (most verbose) rank.
    pub const MAX: Severity = Severity::DEBUG;

    /// Build a severity from a raw rank, clamping to `0..=5`.
    pub fn clamped(rank: i64) -> Self {
        Severity(rank.clamp(0, Self::MAX.0 as i64) as u8)
    }

    /// Raw numeric rank.
    pub fn rank(self) -> u8 {
        self.0
    }

    /// Canonical name for this rank.
    pub fn name(self) -> &'static str {
        LEVEL_TABLE
            .iter()
            .find(|(_, sev)| *sev == self)
            .map(|(name, _)| *name)
            .unwrap_or("disable")
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::ERROR
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name-to-rank lookup, most verbose first.
const LEVEL_TABLE: [(&str, Severity); 6] = [
    ("debug", Severity::DEBUG),
    ("info", Severity::INFO),
    ("success", Severity::SUCCESS),
    ("warn", Severity::WARN),
    ("error", Severity::ERROR),
    ("disable", Severity::DISABLE),
];

/// A level as supplied by a caller: either a name or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelInput {
    Name(String),
    Number(f64),
}

impl From<&str> for LevelInput {
    fn from(s: &str) -> Self {
        LevelInput::Name(s.to_string())
    }
}

impl From<String> for LevelInput {
    fn from(s: String) -> Self {
        LevelInput::Name(s)
    }
}

impl From<f64> for LevelInput {
    fn from(n: f64) -> Self {
        LevelInput::Number(n)
    }
}

impl From<i64> for LevelInput {
    fn from(n: i64) -> Self {
        LevelInput::Number(n as f64)
    }
}

impl From<i32> for LevelInput {
    fn from(n: i32) -> Self {
        LevelInput::Number(f64::from(n))
    }
}

impl From<u8> for LevelInput {
    fn from(n: u8) -> Self {
        LevelInput::Number(f64::from(n))
    }
}

impl From<Severity> for LevelInput {
    fn from(sev: Severity) -> Self {
        LevelInput::Number(f64::from(sev.0))
    }
}

impl TryFrom<&Value> for LevelInput {
    type Error = LoggerError;

    /// Dynamic values only qualify when they are strings or numbers.
    fn try_from(value: &Value) -> LoggerResult<Self> {
        match value {
            Value::String(s) => Ok(LevelInput::Name(s.clone())),
            Value::Number(n) => n
                .as_f64()
                .map(LevelInput::Number)
                .ok_or(LoggerError::InvalidLevelType),
            _ => Err(LoggerError::InvalidLevelType),
        }
    }
}

/// Resolve a caller-supplied level to a severity.
///
/// Numbers are clamped into `0..=5` (fractions floor); names are matched
/// case-insensitively against the six anchors.
pub fn rank(input: &LevelInput) -> LoggerResult<Severity> {
    match input {
        LevelInput::Number(n) => {
            if !n.is_finite() {
                return Err(LoggerError::InvalidLevelType);
            }
            let clamped = n.clamp(0.0, f64::from(Severity::MAX.0));
            Ok(Severity::clamped(clamped.floor() as i64))
        }
        LevelInput::Name(name) => {
            let lowered = name.to_lowercase();
            LEVEL_TABLE
                .iter()
                .find(|(candidate, _)| *candidate == lowered)
                .map(|(_, sev)| *sev)
                .ok_or_else(|| LoggerError::unknown_level(&lowered))
        }
    }
}

/// The five emitting levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Debug,
    Info,
    Success,
    Warn,
    Error,
}

/// Which standard stream a line goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Level {
    /// All levels, most verbose first.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Success,
        Level::Warn,
        Level::Error,
    ];

    /// Minimum threshold needed for this level to emit.
    pub fn required(self) -> Severity {
        match self {
            Level::Debug => Severity::DEBUG,
            Level::Info => Severity::INFO,
            Level::Success => Severity::SUCCESS,
            Level::Warn => Severity::WARN,
            Level::Error => Severity::ERROR,
        }
    }

    /// Event name published on the buses.
    pub fn event_name(self) -> &'static str {
        match self {
            Level::Debug => "Debug",
            Level::Info => "Info",
            Level::Success => "Success",
            Level::Warn => "Warn",
            Level::Error => "Error",
        }
    }

    pub fn stream(self) -> Stream {
        match self {
            Level::Error => Stream::Stderr,
            _ => Stream::Stdout,
        }
    }

    /// Whether a logger at `threshold` lets this level through.
    pub fn enabled_at(self, threshold: Severity) -> bool {
        threshold >= self.required()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_levels_clamp() {
        for n in [-100.0_f64, -1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 1e9] {
            let expected = n.clamp(0.0, 5.0) as u8;
            assert_eq!(rank(&LevelInput::Number(n)).unwrap().rank(), expected);
        }
    }

    #[test]
    fn test_fractional_level_floors() {
        assert_eq!(rank(&LevelInput::Number(2.5)).unwrap(), Severity::WARN);
        assert_eq!(rank(&LevelInput::Number(4.99)).unwrap(), Severity::INFO);
    }

    #[test]
    fn test_non_finite_level_rejected() {
        for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(rank(&n.into()), Err(LoggerError::InvalidLevelType));
        }
    }

    #[test]
    fn test_named_levels_case_insensitive() {
        let cases = [
            ("debug", 5),
            ("INFO", 4),
            ("Success", 3),
            ("wArN", 2),
            ("error", 1),
            ("DISABLE", 0),
        ];
        for (name, expected) in cases {
            assert_eq!(rank(&name.into()).unwrap().rank(), expected, "{}", name);
        }
    }

    #[test]
    fn test_unknown_name_embeds_lowercase() {
        let err = rank(&"NotALevel".into()).unwrap_err();
        assert_eq!(err.to_string(), "'notalevel' is not a valid logging level.");
    }

    #[test]
    fn test_dynamic_values() {
        assert_eq!(
            LevelInput::try_from(&json!("warn")).unwrap(),
            LevelInput::Name("warn".into())
        );
        assert_eq!(
            LevelInput::try_from(&json!(3)).unwrap(),
            LevelInput::Number(3.0)
        );
        for bad in [json!(true), json!(null), json!({}), json!([1])] {
            assert_eq!(
                LevelInput::try_from(&bad),
                Err(LoggerError::InvalidLevelType)
            );
        }
    }

    #[test]
    fn test_level_required_severity() {
        let required: Vec<u8> = Level::ALL.iter().map(|l| l.required().rank()).collect();
        assert_eq!(required, vec![5, 4, 3, 2, 1]);
        assert!(Level::Warn.enabled_at(Severity::WARN));
        assert!(!Level::Info.enabled_at(Severity::WARN));
        assert!(!Level::Error.enabled_at(Severity::DISABLE));
    }

    #[test]
    fn test_only_error_goes_to_stderr() {
        for level in Level::ALL {
            let expected = if level == Level::Error {
                Stream::Stderr
            } else {
                Stream::Stdout
            };
            assert_eq!(level.stream(), expected);
        }
    }

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::DEBUG.name(), "debug");
        assert_eq!(Severity::DISABLE.name(), "disable");
        assert_eq!(Severity::default(), Severity::ERROR);
    }
}
