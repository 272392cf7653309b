//! Capture entries and the one-line-per-entry log format.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One captured, already-redacted text fragment.
///
/// Field names on the wire follow the device upload format
/// (`text`, `appPackage`, `timestamp`, `deviceId`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
    #[serde(rename = "appPackage", alias = "app_package", alias = "source_app")]
    pub source_app: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(
        rename = "deviceId",
        alias = "device_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub device_id: Option<String>,
}

impl LogEntry {
    pub fn new(text: impl Into<String>, source_app: impl Into<String>, timestamp: i64) -> Self {
        Self {
            text: text.into(),
            source_app: source_app.into(),
            timestamp,
            device_id: None,
        }
    }

    pub fn with_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Render `[HH:MM:SS] [source_app] text\n` for the given local time of day.
    pub fn format_line(&self, time: NaiveTime) -> String {
        let app = single_line(&self.source_app);
        let app = if app.is_empty() { "unknown" } else { app.as_str() };
        format!(
            "[{}] [{}] {}\n",
            time.format("%H:%M:%S"),
            app,
            single_line(&self.text)
        )
    }
}

/// Collapse every line break (LF, CR, CRLF) and the whitespace around it
/// into one space, so an entry can never span more than one log line.
pub fn single_line(text: &str) -> String {
    text.split(|c: char| c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of entries in raw log content (non-blank lines).
pub fn count_entries(content: &str) -> usize {
    content.lines().filter(|line| !line.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn line_format_matches_layout() {
        let entry = LogEntry::new("Working on backend", "com.android.vscode", 0);
        assert_eq!(
            entry.format_line(t(9, 15, 0)),
            "[09:15:00] [com.android.vscode] Working on backend\n"
        );
    }

    #[test]
    fn embedded_newlines_are_collapsed() {
        let entry = LogEntry::new("first line\nsecond\r\nthird\rfourth\n\n", "com.notes", 0);
        let line = entry.format_line(t(23, 59, 59));
        assert_eq!(line, "[23:59:59] [com.notes] first line second third fourth\n");
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn blank_app_becomes_unknown() {
        let entry = LogEntry::new("hello", "  \n", 0);
        assert_eq!(entry.format_line(t(0, 0, 1)), "[00:00:01] [unknown] hello\n");
    }

    #[test]
    fn counts_non_blank_lines() {
        assert_eq!(count_entries(""), 0);
        assert_eq!(count_entries("[a] x\n\n[b] y\n   \n"), 2);
    }

    #[test]
    fn deserializes_upload_format() {
        let json = r#"{"text":"hi","appPackage":"com.chat","timestamp":1763198100000,"deviceId":"pixel-7"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.source_app, "com.chat");
        assert_eq!(entry.device_id.as_deref(), Some("pixel-7"));

        let json = r#"{"text":"hi","source_app":"com.chat","timestamp":1}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.source_app, "com.chat");
        assert!(entry.device_id.is_none());
    }
}
