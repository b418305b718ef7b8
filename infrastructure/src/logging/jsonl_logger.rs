//! JSONL file writer for solve events.
//!
//! Each event is serialized as a single JSON line with a `type` field and
//! `timestamp`, appended via a buffered writer. The logger also implements
//! [`ProgressNotifier`], so it can ride along the solve's progress stream
//! as an audit log.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use mcq_application::{ProgressNotifier, SolveProgress};

/// JSONL solve-event logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create event log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event line; logging failures are warnings, never errors.
    pub fn log(&self, event_type: &str, payload: serde_json::Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = if let serde_json::Value::Object(mut map) = payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event_type.to_string()),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event_type,
                "timestamp": timestamp,
                "data": payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        let mut writer = self.writer.lock().unwrap();
        if let Err(e) = writeln!(writer, "{}", line) {
            warn!("Could not write event log line: {}", e);
        }
        let _ = writer.flush();
    }
}

impl ProgressNotifier for JsonlEventLogger {
    fn on_solve_start(&self, total_calls: usize) {
        self.log("solve_start", serde_json::json!({ "total_calls": total_calls }));
    }

    fn on_batch_recorded(&self, update: &SolveProgress) {
        let answers: serde_json::Value = update
            .answers_so_far
            .iter()
            .map(|(id, letter)| (id.clone(), serde_json::json!(letter.to_string())))
            .collect::<serde_json::Map<_, _>>()
            .into();
        self.log(
            "batch_recorded",
            serde_json::json!({
                "model_key": update.model_key,
                "iteration": update.iteration,
                "answers_so_far": answers,
            }),
        );
    }

    fn on_call_failed(&self, model_key: &str, iteration: u32, error: &str) {
        self.log(
            "call_failed",
            serde_json::json!({
                "model_key": model_key,
                "iteration": iteration,
                "error": error,
            }),
        );
    }

    fn on_solve_complete(&self, resolved: usize) {
        self.log("solve_complete", serde_json::json!({ "resolved": resolved }));
    }
}
