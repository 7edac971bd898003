//! Loading scenario definitions from a JSON file at startup.

use medtrain_conversation::Scenario;
use std::fmt;
use std::path::{Path, PathBuf};

/// Failure to load a scenarios file.
#[derive(Debug)]
pub enum SeedError {
    Read { path: PathBuf, details: String },
    Parse { path: PathBuf, details: String },
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, details } => {
                write!(f, "failed to read scenarios file '{}': {}", path.display(), details)
            }
            Self::Parse { path, details } => {
                write!(f, "invalid scenarios file '{}': {}", path.display(), details)
            }
        }
    }
}

impl std::error::Error for SeedError {}

/// Reads a JSON array of scenarios. Every entry is validated.
pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|e| SeedError::Read {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| SeedError::Parse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}
