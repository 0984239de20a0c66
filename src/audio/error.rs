use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    /// The file could not be probed for a duration or opened for playback.
    #[error("cannot play {}: {reason}", path.display())]
    UnreadableMedia { path: PathBuf, reason: String },

    #[error("no track loaded")]
    NothingLoaded,

    #[error("no audio output device: {0}")]
    NoOutput(String),
}

impl TransportError {
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::UnreadableMedia {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
