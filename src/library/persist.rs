use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::LibraryError;
use super::model::Track;

/// The playlist order on disk: a JSON array of path strings.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    path: PathBuf,
}

impl PlaylistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with `paths`.
    pub fn save(&self, paths: &[PathBuf]) -> Result<(), LibraryError> {
        let json = serde_json::to_string_pretty(paths)?;
        fs::write(&self.path, json).map_err(|source| LibraryError::Filesystem {
            path: self.path.clone(),
            source,
        })?;
        debug!(file = %self.path.display(), count = paths.len(), "playlist saved");
        Ok(())
    }

    /// The stored list, or empty when the file is absent or unparsable.
    pub fn load(&self) -> Vec<PathBuf> {
        match self.try_load() {
            Ok(paths) => paths,
            Err(LibraryError::Filesystem { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "ignoring saved playlist");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<PathBuf>, LibraryError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| LibraryError::Filesystem {
            path: self.path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Reorder freshly scanned tracks to follow a previously saved order.
///
/// Saved paths keep their saved positions, new tracks follow in scan order,
/// and saved paths that were not found by the scan are dropped.
pub fn apply_saved_order(scanned: Vec<Track>, saved: &[PathBuf]) -> Vec<Track> {
    if saved.is_empty() {
        return scanned;
    }

    let rank: HashMap<&Path, usize> = saved
        .iter()
        .enumerate()
        .rev()
        .map(|(i, p)| (p.as_path(), i))
        .collect();

    let (mut known, fresh): (Vec<Track>, Vec<Track>) = scanned
        .into_iter()
        .partition(|t| rank.contains_key(t.path.as_path()));
    known.sort_by_key(|t| rank[t.path.as_path()]);
    known.extend(fresh);
    known
}
