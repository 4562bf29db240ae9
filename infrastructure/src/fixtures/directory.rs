//! Fixture source backed by a directory of `<case>.txt` files.

use relay_application::{FixtureError, FixtureSource};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of fixture files.
pub const FIXTURE_EXTENSION: &str = "txt";

/// Reads fixtures from `<dir>/<name>.txt`.
#[derive(Debug, Clone)]
pub struct DirectoryFixtureSource {
    dir: PathBuf,
}

impl DirectoryFixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a fixture named `name` is read from.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name).with_extension(FIXTURE_EXTENSION)
    }
}

impl FixtureSource for DirectoryFixtureSource {
    fn load(&self, name: &str) -> Result<String, FixtureError> {
        let path = self.path_for(name);
        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Loaded fixture {} ({} bytes)", path.display(), content.len());
                Ok(content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(FixtureError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(FixtureError::Io {
                name: name.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
