//! JSONL file writer for log records.
//!
//! Each [`LogRecord`] is serialized as a single JSON line and appended to
//! the file via a buffered writer.

use relay_application::{LogRecord, LogSink};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Log sink that appends one JSON object per line to a local file.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlLogSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlLogSink {
    /// Open `path` for appending, creating it (and parent directories) if needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for JsonlLogSink {
    fn emit(&self, record: LogRecord) {
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlLogSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_application::LogLevel;

    #[test]
    fn test_writes_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("relay.jsonl");
        let sink = JsonlLogSink::open(&path).unwrap();

        sink.emit(
            LogRecord::new(LogLevel::Info, "contact_pipeline", "submission_received")
                .with_fields(serde_json::json!({"emailDomain": "example.com"})),
        );
        sink.emit(LogRecord::new(LogLevel::Warn, "relay", "plain line"));
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["level"], "info");
        assert_eq!(first["message"], "submission_received");
        assert_eq!(first["fields"]["emailDomain"], "example.com");
        assert!(first["timestamp"].is_string());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["level"], "warn");
        assert!(second.get("fields").is_none());
    }

    #[test]
    fn test_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.jsonl");
        for i in 0..2 {
            let sink = JsonlLogSink::open(&path).unwrap();
            sink.emit(LogRecord::new(LogLevel::Info, "t", format!("line {}", i)));
        }
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_open_reports_unusable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        assert!(JsonlLogSink::open(blocker.join("relay.jsonl")).is_err());
    }
}
