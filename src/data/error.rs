use std::path::PathBuf;

use thiserror::Error;

pub type GridResult<T> = Result<T, GridError>;

/// Failures while loading a saved sweep or preparing it for display.
///
/// None of these are retried: the inputs are static files, so the caller
/// reports the error and gives up on the run.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("could not find {name} (searched: {})", display_paths(.searched))]
    DirectoryNotFound { name: String, searched: Vec<PathBuf> },

    #[error("{}: {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },

    #[error(
        "{}: expected a {}x{} table, found {}x{}",
        .path.display(), .expected.0, .expected.1, .found.0, .found.1
    )]
    ShapeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{requested} peaks requested but only {available} were computed")]
    PeakCountMismatch { requested: usize, available: usize },
}

impl GridError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        GridError::MalformedInput {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
