use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Serializer, Value};

use crate::error::Error;

/// Pretty-printing options. Persisted by the host alongside theme state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    pub indent: usize,
    pub sort_keys: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            sort_keys: false,
        }
    }
}

/// The parsed document plus its canonical text form.
///
/// A parse failure is terminal for that render pass only: the error string
/// is recorded and the previous good value and text stay intact, so the
/// last successfully rendered tree remains on screen next to the error
/// banner.
#[derive(Debug, Default)]
pub struct Document {
    value: Option<Value>,
    text: String,
    error: Option<String>,
    pub options: FormatOptions,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.text.is_empty()
    }

    /// Parse `input` and store the pretty-printed result. On a parse error
    /// the previous document is kept and the error is recorded.
    pub fn format(&mut self, input: &str) -> Result<(), Error> {
        if input.trim().is_empty() {
            self.clear();
            return Ok(());
        }
        match serde_json::from_str::<Value>(input) {
            Ok(parsed) => {
                let parsed = if self.options.sort_keys {
                    sort_keys(&parsed)
                } else {
                    parsed
                };
                self.text = to_pretty(&parsed, self.options.indent)?;
                self.value = Some(parsed);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                Err(Error::Parse(message))
            }
        }
    }

    /// Accept a mutated value from the edit layer and re-derive the
    /// canonical text. This is the write-back signal the host persists.
    pub fn replace_value(&mut self, value: Value) -> Result<(), Error> {
        let value = if self.options.sort_keys {
            sort_keys(&value)
        } else {
            value
        };
        self.text = to_pretty(&value, self.options.indent)?;
        self.value = Some(value);
        self.error = None;
        Ok(())
    }

    /// Store output text that need not be a JSON document (the unescape
    /// result). The tree is rebuilt only when the text happens to parse.
    pub fn set_output_text(&mut self, text: String) {
        self.value = serde_json::from_str(&text).ok();
        self.text = text;
        self.error = None;
    }

    pub fn set_indent(&mut self, indent: usize) -> Result<(), Error> {
        self.options.indent = indent;
        if let Some(value) = self.value.clone() {
            self.text = to_pretty(&value, indent)?;
        }
        Ok(())
    }

    pub fn set_sort_keys(&mut self, sort: bool) -> Result<(), Error> {
        self.options.sort_keys = sort;
        if let Some(value) = self.value.take() {
            self.replace_value(value)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.value = None;
        self.text.clear();
        self.error = None;
    }
}

/// Recursively re-order object members by key; arrays keep their order.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Pretty-print with a configurable indent width.
pub fn to_pretty(value: &Value, indent: usize) -> Result<String, Error> {
    let indent_str = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(value, &mut ser).map_err(|e| Error::Parse(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| Error::Parse(e.to_string()))
}

/// Encode raw text as a JSON string literal (the "escape" button).
pub fn escape_text(input: &str) -> String {
    Value::String(input.to_string()).to_string()
}

/// Decode a JSON string literal back to raw text, tolerating missing
/// surrounding quotes (the "unescape" button).
pub fn unescape_text(input: &str) -> Result<String, Error> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    let inner = if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    };
    serde_json::from_str::<String>(&format!("\"{}\"", inner))
        .map_err(|e| Error::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_pretty_prints_with_indent() {
        let mut doc = Document::new();
        doc.format(r#"{"a":1}"#).unwrap();
        assert_eq!(doc.text(), "{\n  \"a\": 1\n}");
        assert_eq!(doc.value(), Some(&json!({"a": 1})));
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_format_error_keeps_last_good_document() {
        let mut doc = Document::new();
        doc.format(r#"{"a":1}"#).unwrap();
        let good_text = doc.text().to_string();

        assert!(doc.format(r#"{"a":}"#).is_err());
        assert_eq!(doc.value(), Some(&json!({"a": 1})));
        assert_eq!(doc.text(), good_text);
        assert!(doc.error().is_some());
    }

    #[test]
    fn test_format_empty_input_clears() {
        let mut doc = Document::new();
        doc.format(r#"{"a":1}"#).unwrap();
        doc.format("   ").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_indent_width_change_reformats() {
        let mut doc = Document::new();
        doc.format(r#"{"a":1}"#).unwrap();
        doc.set_indent(4).unwrap();
        assert_eq!(doc.text(), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn test_sort_keys_recurses() {
        let value: Value = serde_json::from_str(r#"{"b":{"d":1,"c":2},"a":[{"z":0,"y":1}]}"#).unwrap();
        let sorted = sort_keys(&value);
        let text = serde_json::to_string(&sorted).unwrap();
        assert_eq!(text, r#"{"a":[{"y":1,"z":0}],"b":{"c":2,"d":1}}"#);
    }

    #[test]
    fn test_replace_value_rewrites_canonical_text() {
        let mut doc = Document::new();
        doc.format(r#"{"a":1}"#).unwrap();
        doc.replace_value(json!({"a": 2})).unwrap();
        assert_eq!(doc.text(), "{\n  \"a\": 2\n}");
    }

    #[test]
    fn test_escape_then_unescape_round_trips() {
        let raw = "line one\n\"quoted\"\tend";
        let escaped = escape_text(raw);
        assert_eq!(unescape_text(&escaped).unwrap(), raw);
    }

    #[test]
    fn test_unescape_without_quotes() {
        assert_eq!(unescape_text(r#"a\nb"#).unwrap(), "a\nb");
    }

    #[test]
    fn test_escaped_output_is_a_json_string_document() {
        let mut doc = Document::new();
        let escaped = escape_text("hi\nthere");
        doc.format(&escaped).unwrap();
        assert_eq!(doc.value(), Some(&json!("hi\nthere")));
    }

    #[test]
    fn test_set_output_text_without_valid_json() {
        let mut doc = Document::new();
        doc.set_output_text("not json at all".to_string());
        assert!(doc.value().is_none());
        assert_eq!(doc.text(), "not json at all");
        assert!(doc.error().is_none());
    }
}
