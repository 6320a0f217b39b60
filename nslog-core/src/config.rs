//! Configuration loading from `nslog.toml` and the `LOG_LEVEL` variable.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{LoggerError, LoggerResult};
use crate::level::LevelInput;
use crate::logger::LoggerBuilder;
use crate::render::Styler;

/// Environment variable holding the default level for new loggers.
pub const LEVEL_ENV_VAR: &str = "LOG_LEVEL";

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = "nslog.toml";

/// Main configuration structure for nslog.toml.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct NslogConfig {
    /// Default level, by name or rank.
    pub level: Option<LevelSetting>,
    /// Whether console output is coloured.
    pub color: Option<bool>,
}

/// A level as written in the config file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum LevelSetting {
    Name(String),
    Rank(i64),
}

impl From<&LevelSetting> for LevelInput {
    fn from(setting: &LevelSetting) -> Self {
        match setting {
            LevelSetting::Name(name) => LevelInput::Name(name.clone()),
            LevelSetting::Rank(rank) => LevelInput::from(*rank),
        }
    }
}

impl NslogConfig {
    /// Feed configured values into a logger builder. Values the file does
    /// not set leave the builder untouched.
    pub fn apply(&self, mut builder: LoggerBuilder) -> LoggerBuilder {
        if let Some(level) = &self.level {
            builder = builder.level(LevelInput::from(level));
        }
        if let Some(color) = self.color {
            builder = builder.styler(Styler::new(color));
        }
        builder
    }
}

/// Loads configuration from nslog.toml if it exists.
///
/// Read and parse failures come back as [`LoggerError::Config`] carrying
/// the file path.
pub fn load_config(root: &Path) -> LoggerResult<Option<NslogConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| LoggerError::config(&path, format!("read failed: {}", e)))?;
    let cfg = parse_config(&content)
        .map_err(|e| LoggerError::config(&path, format!("invalid nslog.toml: {}", e)))?;
    Ok(Some(cfg))
}

pub fn parse_config(content: &str) -> Result<NslogConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Resolve the default level through a variable lookup.
///
/// Blank values count as unset. Numeric text becomes a rank, anything
/// else a level name; validation happens when a logger is built.
pub fn level_from_lookup<F>(lookup: F) -> Option<LevelInput>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(LEVEL_ENV_VAR)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(rank) => Some(LevelInput::Number(rank)),
        Err(_) => Some(LevelInput::Name(trimmed.to_string())),
    }
}

/// Default level from the process environment.
pub fn env_default_level() -> Option<LevelInput> {
    level_from_lookup(|key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir(name: &str) -> std::path::PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir()
            .join("nslog_config_test")
            .join(format!("{}_{}_{}", name, std::process::id(), id));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = create_temp_dir("missing");
        assert!(load_config(&dir).unwrap().is_none());
    }

    #[test]
    fn test_config_with_named_level() {
        let dir = create_temp_dir("named");
        fs::write(dir.join(CONFIG_FILE), "level = \"warn\"\ncolor = false\n").unwrap();

        let cfg = load_config(&dir).unwrap().unwrap();
        assert_eq!(cfg.level, Some(LevelSetting::Name("warn".into())));
        assert_eq!(cfg.color, Some(false));
    }

    #[test]
    fn test_config_with_numeric_level() {
        let cfg = parse_config("level = 4").unwrap();
        assert_eq!(cfg.level, Some(LevelSetting::Rank(4)));
        assert_eq!(cfg.color, None);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = create_temp_dir("invalid");
        fs::write(dir.join(CONFIG_FILE), "level = [1, 2").unwrap();
        let err = load_config(&dir).unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
        assert_eq!(err.path(), Some(&dir.join(CONFIG_FILE)));
        assert!(err.to_string().contains("invalid nslog.toml"));
    }

    #[test]
    fn test_level_from_lookup() {
        let numeric = level_from_lookup(|_| Some("5".to_string()));
        assert_eq!(numeric, Some(LevelInput::Number(5.0)));

        let named = level_from_lookup(|_| Some(" Info ".to_string()));
        assert_eq!(named, Some(LevelInput::Name("Info".into())));

        assert_eq!(level_from_lookup(|_| Some("   ".to_string())), None);
        assert_eq!(level_from_lookup(|_| None), None);
    }

    #[test]
    fn test_lookup_uses_level_variable() {
        let seen = level_from_lookup(|key| {
            assert_eq!(key, LEVEL_ENV_VAR);
            Some("debug".to_string())
        });
        assert!(seen.is_some());
    }
}
