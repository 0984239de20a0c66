use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing library state on disk.
///
/// None of these are fatal: callers log them and carry on with an empty list.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid playlist file: {0}")]
    Json(#[from] serde_json::Error),
}
