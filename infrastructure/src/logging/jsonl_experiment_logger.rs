//! JSONL file writer for experiment events.
//!
//! Every event becomes one JSON line carrying a `type`, an RFC 3339
//! `timestamp`, and event-specific fields:
//!
//! | `type`      | Fields                                                    |
//! |-------------|-----------------------------------------------------------|
//! | `step`      | `stepId`, `stepType`, `failureMode`, `historyLength`, `content` |
//! | `response`  | `httpStatus`, `usage`, `content`, `errorMessage`          |
//! | `error`     | `message`                                                 |
//! | `milestone` | `message`                                                 |

use relay_application::ExperimentLogger;
use relay_domain::{AgentReply, TestStep};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Experiment logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`.
pub struct JsonlExperimentLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlExperimentLogger {
    /// Create a logger writing to `path`, truncating any previous run.
    ///
    /// Parent directories are created as needed. Returns `None` if the file
    /// cannot be created; the run then proceeds without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create experiment log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not create experiment log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, event_type: &str, mut record: Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        if let Value::Object(map) = &mut record {
            map.insert("type".to_string(), Value::String(event_type.to_string()));
            map.insert("timestamp".to_string(), Value::String(timestamp));
        }

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl ExperimentLogger for JsonlExperimentLogger {
    fn log_step(&self, step: &TestStep, history_len: usize) {
        self.write(
            "step",
            json!({
                "stepId": step.id(),
                "stepType": step.step_type(),
                "failureMode": step.failure_mode(),
                "historyLength": history_len,
                "content": step.content(),
            }),
        );
    }

    fn log_response(&self, reply: &AgentReply) {
        self.write(
            "response",
            json!({
                "httpStatus": reply.http_status,
                "usage": reply.usage,
                "content": reply.content,
                "errorMessage": reply.error_message,
            }),
        );
    }

    fn log_error(&self, message: &str) {
        self.write("error", json!({ "message": message }));
    }

    fn log_milestone(&self, message: &str) {
        self.write("milestone", json!({ "message": message }));
    }
}

impl Drop for JsonlExperimentLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
