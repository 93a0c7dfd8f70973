//! JSONL transcript writer.
//!
//! Each [`ConversationEvent`] (evaluation prompt, evaluator reply, planner
//! reply, ...) becomes one JSON line carrying `type` and `timestamp` next to
//! the event's own fields.

use quorum_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Transcript logger that writes one JSON object per line.
///
/// Shared by all concurrently running evaluators; writes are serialized by
/// the mutex so lines never interleave. Flushes on `Drop`.
///
/// Write errors never interrupt an evaluation; the first one is logged as a
/// warning and later ones are dropped silently.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    write_failed: AtomicBool,
}

impl JsonlConversationLogger {
    /// Create a logger writing to `path`, truncating any previous transcript.
    ///
    /// Creates parent directories as needed. Returns `None` if the file
    /// cannot be created; the caller then runs without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not create transcript file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            write_failed: AtomicBool::new(false),
        })
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any line failed to reach the file
    pub fn write_failed(&self) -> bool {
        self.write_failed.load(Ordering::Relaxed)
    }

    fn report_write_error(&self, error: std::io::Error) {
        if !self.write_failed.swap(true, Ordering::Relaxed) {
            warn!(
                "Transcript {} is incomplete, write failed: {}",
                self.path.display(),
                error
            );
        }
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        // Build the record: merge payload with type + timestamp
        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": event.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            // Flush every line so a crashed run still leaves a usable transcript
            let written = writeln!(writer, "{}", line).and_then(|()| writer.flush());
            if let Err(e) = written {
                self.report_write_error(e);
            }
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        let flushed = match self.writer.lock() {
            Ok(mut writer) => writer.flush(),
            Err(_) => return,
        };
        if let Err(e) = flushed {
            self.report_write_error(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.transcript.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::evaluation_prompt(
            "CFO Agent",
            "anthropic/claude-sonnet-4-20250514",
            "PURCHASE REQUEST:\nAmount: $500",
        ));
        logger.log(ConversationEvent::evaluator_reply(
            "CFO Agent",
            "anthropic/claude-sonnet-4-20250514",
            r#"{"vote": "YES"}"#,
            "structured",
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.get("timestamp").is_some());
            assert_eq!(record["agent"], "CFO Agent");
        }
        assert_eq!(records[0]["type"], "evaluation_prompt");
        assert!(records[0]["prompt"].as_str().unwrap().contains("$500"));
        assert_eq!(records[1]["type"], "evaluator_reply");
        assert_eq!(records[1]["parse_tier"], "structured");
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wrapped.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new("note", serde_json::json!("plain text")));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "note");
        assert_eq!(records[0]["data"], "plain text");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/transcript.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();
        assert_eq!(logger.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_healthy_writes_report_no_failure() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlConversationLogger::new(dir.path().join("ok.jsonl")).unwrap();
        logger.log(ConversationEvent::new("note", serde_json::json!({"n": 1})));
        assert!(!logger.write_failed());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_full_disk_is_reported_once() {
        // Every write to /dev/full fails with ENOSPC
        let logger = JsonlConversationLogger::new("/dev/full").unwrap();
        assert!(!logger.write_failed());

        logger.log(ConversationEvent::new("note", serde_json::json!({"n": 1})));
        assert!(logger.write_failed());

        // Later failures keep the flag set and do not panic
        logger.log(ConversationEvent::new("note", serde_json::json!({"n": 2})));
        assert!(logger.write_failed());
    }

    #[test]
    fn test_concurrent_writers_do_not_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concurrent.jsonl");
        let logger = Arc::new(JsonlConversationLogger::new(&path).unwrap());

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for j in 0..20 {
                        logger.log(ConversationEvent::evaluator_error(
                            &format!("agent-{}", i),
                            "m",
                            &format!("attempt {}", j),
                        ));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        drop(logger);

        assert_eq!(read_lines(&path).len(), 100);
    }
}
