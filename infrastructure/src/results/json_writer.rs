//! Pretty-printed JSON snapshot of a finished suite.

use relay_domain::FullExperimentResult;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while saving a result snapshot
#[derive(Error, Debug)]
pub enum ResultWriteError {
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Writes [`FullExperimentResult`] snapshots to disk.
pub struct JsonResultWriter;

impl JsonResultWriter {
    /// Serialize `result` to `path`, creating parent directories and
    /// replacing any previous file.
    pub fn save(result: &FullExperimentResult, path: &Path) -> Result<(), ResultWriteError> {
        let json = serde_json::to_string_pretty(result)?;

        let io_error = |source| ResultWriteError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, json).map_err(io_error)?;

        info!(
            "Saved {} experiment results to {}",
            result.cases.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::ExperimentResult;
    use tempfile::tempdir;

    fn sample() -> FullExperimentResult {
        let case = ExperimentResult {
            case_name: "case_1_short".to_string(),
            steps: Vec::new(),
            conversation_log: Vec::new(),
            total_messages: 0,
            peak_tokens: 4321,
            total_steps: 0,
            failed_steps: 0,
            started_at: 1,
            finished_at: 2,
        };
        FullExperimentResult::new(vec![case], 1_700_000_000_000)
    }

    #[test]
    fn test_save_creates_directories_and_pretty_prints() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results").join("experiment_results.json");

        JsonResultWriter::save(&sample(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  "));
        let parsed: FullExperimentResult = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, sample());
        assert!(written.contains("\"peakTokens\": 4321"));
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "stale").unwrap();

        JsonResultWriter::save(&sample(), &path).unwrap();
        assert!(!fs::read_to_string(&path).unwrap().contains("stale"));
    }

    #[test]
    fn test_save_reports_io_errors() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = JsonResultWriter::save(&sample(), &blocker.join("out.json")).unwrap_err();
        assert!(matches!(err, ResultWriteError::Io { .. }));
    }
}
