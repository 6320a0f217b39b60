//! Text rendering: level symbols, colour tones and display strings.
//!
//! Styling goes through `colored`; structural values are turned into
//! display strings by [`inspect`], which stops descending at a fixed depth.

use colored::Colorize;
use serde_json::Value;

use crate::level::Level;

/// Nesting depth used when converting non-string arguments for display.
pub const INSPECT_DEPTH: usize = 6;

/// Colour/decoration token understood by [`Styler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Cyan,
    Blue,
    Green,
    Yellow,
    Red,
    Magenta,
    Grey,
    Underline,
}

impl Tone {
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Debug => Tone::Cyan,
            Level::Info => Tone::Blue,
            Level::Success => Tone::Green,
            Level::Warn => Tone::Yellow,
            Level::Error => Tone::Red,
        }
    }
}

pub fn symbol(level: Level) -> &'static str {
    match level {
        Level::Debug => "☼",
        Level::Info => "ℹ",
        Level::Success => "✔",
        Level::Warn => "⚠",
        Level::Error => "✖",
    }
}

pub const BENCH_SYMBOL: &str = "⏱";

/// Applies tones to text, or passes text through when colour is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styler {
    color: bool,
}

impl Default for Styler {
    fn default() -> Self {
        Self::new(cfg!(feature = "color"))
    }
}

impl Styler {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        match tone {
            Tone::Cyan => text.cyan().to_string(),
            Tone::Blue => text.blue().to_string(),
            Tone::Green => text.green().to_string(),
            Tone::Yellow => text.yellow().to_string(),
            Tone::Red => text.red().to_string(),
            Tone::Magenta => text.magenta().to_string(),
            Tone::Grey => text.bright_black().to_string(),
            Tone::Underline => text.underline().to_string(),
        }
    }

    /// Symbol for a level, painted in the level's tone.
    pub fn level_symbol(&self, level: Level) -> String {
        self.paint(Tone::for_level(level), symbol(level))
    }

    /// `namespace:` label, underlined.
    pub fn namespace_label(&self, namespace: &str) -> String {
        self.paint(Tone::Underline, &format!("{}:", namespace))
    }
}

/// Display form of one emit argument.
///
/// Strings are shown raw and arrays pass through element-wise; every other
/// value is rendered by [`inspect`].
pub fn display_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                Value::Array(_) => display_arg(item),
                other => inspect(other, INSPECT_DEPTH),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => inspect(other, INSPECT_DEPTH),
    }
}

/// Render the arguments of one call as a single space-separated string.
pub fn display_args(args: &[Value]) -> String {
    args.iter().map(display_arg).collect::<Vec<_>>().join(" ")
}

/// Depth-bounded structural rendering of a value.
///
/// Containers nested deeper than `depth` collapse to `[Object]` /
/// `[Array]`.
pub fn inspect(value: &Value, depth: usize) -> String {
    inspect_at(value, depth, 0)
}

fn inspect_at(value: &Value, depth: usize, level: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "\\'")),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Array(_) if level > depth => "[Array]".to_string(),
        Value::Object(_) if level > depth => "[Object]".to_string(),
        Value::Array(items) => {
            let inner: Vec<String> = items
                .iter()
                .map(|item| inspect_at(item, depth, level + 1))
                .collect();
            format!("[ {} ]", inner.join(", "))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(key, item)| {
                    format!("{}: {}", display_key(key), inspect_at(item, depth, level + 1))
                })
                .collect();
            format!("{{ {} }}", inner.join(", "))
        }
    }
}

fn display_key(key: &str) -> String {
    let bare = !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if bare {
        key.to_string()
    } else {
        format!("'{}'", key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_styler_passes_text_through() {
        let styler = Styler::plain();
        assert_eq!(styler.paint(Tone::Red, "boom"), "boom");
        assert_eq!(styler.namespace_label("svc"), "svc:");
        assert_eq!(styler.level_symbol(Level::Warn), "⚠");
    }

    #[test]
    fn test_colored_styler_keeps_text() {
        colored::control::set_override(true);
        let styler = Styler::new(true);
        let painted = styler.paint(Tone::Green, "ok");
        assert!(painted.contains("ok"));
        assert!(painted.contains('\u{1b}'));
    }

    #[test]
    fn test_display_strings_raw() {
        assert_eq!(display_arg(&json!("hello")), "hello");
        assert_eq!(display_arg(&json!(42)), "42");
        assert_eq!(display_arg(&json!(null)), "null");
    }

    #[test]
    fn test_display_arrays_join() {
        assert_eq!(display_arg(&json!(["a", 1, true])), "a,1,true");
        assert_eq!(display_arg(&json!([["a", "b"], "c"])), "a,b,c");
    }

    #[test]
    fn test_inspect_object() {
        let rendered = inspect(&json!({"name": "svc", "port": 8080}), INSPECT_DEPTH);
        assert_eq!(rendered, "{ name: 'svc', port: 8080 }");
        assert_eq!(inspect(&json!({}), 2), "{}");
        assert_eq!(inspect(&json!({"a-b": 1}), 2), "{ 'a-b': 1 }");
    }

    #[test]
    fn test_inspect_depth_limit() {
        let nested = json!({"a": {"b": {"c": {}}}});
        assert_eq!(inspect(&nested, 1), "{ a: { b: [Object] } }");
        let arrays = json!([[[1]]]);
        assert_eq!(inspect(&arrays, 0), "[ [Array] ]");
    }

    #[test]
    fn test_display_args_space_separated() {
        let args = [json!("count"), json!({"n": 3})];
        assert_eq!(display_args(&args), "count { n: 3 }");
    }
}
