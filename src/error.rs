//! Error types for map loading and level lifecycle

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading or parsing a level map
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Map file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read map file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed map header field `{field}`: {reason}")]
    MalformedHeader { field: &'static str, reason: String },

    #[error("Malformed grid at row {row}, col {col}: {reason}")]
    MalformedGrid {
        row: usize,
        col: usize,
        reason: String,
    },

    #[error("Unknown cell code {code} at row {row}, col {col}")]
    UnknownCellCode { row: usize, col: usize, code: i32 },

    #[error("Invalid keyed map: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapError {
    /// Classify an I/O failure for `path`
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            MapError::FileNotFound { path }
        } else {
            MapError::Io { path, source }
        }
    }
}

/// Failure driving a level through its lifecycle
#[derive(Debug, Error)]
pub enum LevelError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("Cannot {action} a level in phase {from:?}")]
    InvalidTransition {
        from: crate::level::LevelPhase,
        action: &'static str,
    },
}
