//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of experiment events; disabled when unset
    pub conversation_log: Option<PathBuf>,
    /// Directory for daily rolling diagnostic logs; disabled when unset
    pub directory: Option<PathBuf>,
}
