use std::path::PathBuf;
use std::time::Duration;

/// A playable file discovered by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Duration hint from the tag probe; the transport resolves the
    /// authoritative value when the track is loaded.
    pub duration: Option<Duration>,
    pub display: String,
}

impl Track {
    /// A track known only by its path: title and display fall back to the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self {
            display: title.clone(),
            title,
            artist: None,
            album: None,
            duration: None,
            path,
        }
    }
}
