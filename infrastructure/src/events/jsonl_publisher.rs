//! JSONL file sink for published events.
//!
//! Each event is written as a single JSON line with `topic`, `key`,
//! `timestamp` and the payload, appended to the file via a buffered writer.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use toolgraph_application::{EventPublisher, PublishError};

/// Event publisher that appends one JSON object per line.
///
/// Flushes after every event and on `Drop`.
pub struct JsonlEventPublisher {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventPublisher {
    /// Open `path` for appending, creating it (and parent directories) if
    /// needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, PublishError> {
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

    /// Get the path to the event log.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventPublisher for JsonlEventPublisher {
    async fn publish(&self, topic: &str, key: &str, payload: Value) -> Result<(), PublishError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let record = serde_json::json!({
            "topic": topic,
            "key": key,
            "timestamp": timestamp,
            "payload": payload,
        });
        let line = serde_json::to_string(&record)?;

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlEventPublisher {
    fn drop(&mut self) {
        let _ = self.writer.lock().flush();
    }
}
