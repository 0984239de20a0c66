use super::model::Track;

/// Ordered track list plus a cursor.
///
/// The cursor is always a valid index while the catalog is non-empty and is
/// moved only by `advance`, `retreat` and `select`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    index: usize,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks, index: 0 }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.index)
    }

    /// Step forward one track, wrapping past the end back to the first.
    pub fn advance(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.tracks.len();
        self.current()
    }

    /// Step back one track, wrapping before the first to the last.
    pub fn retreat(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.index = (self.index + self.tracks.len() - 1) % self.tracks.len();
        self.current()
    }

    /// Move the cursor to `index`; out-of-range indices leave it untouched.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.index = index;
        self.current()
    }
}
