//! Output formatting

use std::collections::BTreeMap;
use std::fmt::Display;

use serde_json::Value;

/// Collects fields for `--json` and lines for humans; prints one of them.
pub struct Output {
    json_mode: bool,
    fields: BTreeMap<String, Value>,
    lines: Vec<String>,
}

impl Output {
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: BTreeMap::new(),
            lines: Vec::new(),
        }
    }

    /// Add a field rendered as a string. Large integers stay exact this way.
    pub fn field(mut self, key: &str, value: impl Display) -> Self {
        self.fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Value::from(value));
        self
    }

    pub fn field_value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Add a human-readable line
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn print(self) {
        if self.json_mode {
            let json = Value::Object(self.fields.into_iter().collect());
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        } else {
            for line in self.lines {
                println!("{}", line);
            }
        }
    }
}
