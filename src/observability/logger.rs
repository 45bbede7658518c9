//! Structured JSON logger
//!
//! One line per event, synchronous, no buffering. Keys are ordered
//! deterministically: `event` first, `severity` second, then the caller's
//! fields sorted by name. Observability is read-only: nothing in the model
//! changes behavior based on what was logged.

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail (resize traces and the like)
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Surprising but tolerated (duplicate adds)
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Structural corruption, the run stops
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous structured logger. Trace through Warn go to stdout, Error
/// and Fatal to stderr.
pub struct Logger;

impl Logger {
    /// Log at TRACE level
    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Severity::Error, event, fields);
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::emit(Severity::Fatal, event, fields);
    }

    fn emit(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = render_line(severity, event, fields);
        if severity >= Severity::Error {
            let mut err = io::stderr();
            let _ = err.write_all(line.as_bytes());
            let _ = err.flush();
        } else {
            let mut out = io::stdout();
            let _ = out.write_all(line.as_bytes());
            let _ = out.flush();
        }
    }
}

/// Render one event as a JSON line with deterministic key order.
pub(crate) fn render_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut line = String::with_capacity(128);
    line.push_str("{\"event\":\"");
    escape_into(&mut line, event);
    line.push_str("\",\"severity\":\"");
    line.push_str(severity.as_str());
    line.push('"');

    let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
    sorted.sort_by_key(|(key, _)| *key);
    for (key, value) in sorted {
        line.push_str(",\"");
        escape_into(&mut line, key);
        line.push_str("\":\"");
        escape_into(&mut line, value);
        line.push('"');
    }
    line.push_str("}\n");
    line
}

fn escape_into(line: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '"' => line.push_str("\\\""),
            '\\' => line.push_str("\\\\"),
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            '\t' => line.push_str("\\t"),
            c if c.is_control() => {
                line.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => line.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_is_valid_json() {
        let line = render_line(Severity::Warn, "INDEX_DUPLICATE_ADD", &[("id", "roll:3")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "INDEX_DUPLICATE_ADD");
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["id"], "roll:3");
    }

    #[test]
    fn test_fields_sorted_by_key() {
        let line = render_line(
            Severity::Trace,
            "INDEX_RESIZE",
            &[("to", "16"), ("from", "8")],
        );
        let from_pos = line.find("\"from\"").unwrap();
        let to_pos = line.find("\"to\"").unwrap();
        assert!(from_pos < to_pos);
    }

    #[test]
    fn test_escaping() {
        let line = render_line(Severity::Info, "X", &[("note", "a\"b\\c\nd")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["note"], "a\"b\\c\nd");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Warn);
        assert!(Severity::Error < Severity::Fatal);
    }
}
