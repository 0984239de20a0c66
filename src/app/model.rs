//! The `App` view model.

use crate::config::ThemeName;

/// Shell state that is not playback state.
pub struct App {
    /// Catalog index under the cursor.
    pub selected: usize,
    track_count: usize,
    pub theme: ThemeName,
    pub metadata_window: bool,
    pub current_dir: Option<String>,
}

impl App {
    pub fn new(track_count: usize, theme: ThemeName) -> Self {
        Self {
            selected: 0,
            track_count,
            theme,
            metadata_window: false,
            current_dir: None,
        }
    }

    pub fn has_tracks(&self) -> bool {
        self.track_count > 0
    }

    /// Record the music directory in the app state.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Move the cursor down, wrapping to the first track.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.track_count;
        }
    }

    /// Move the cursor up, wrapping to the last track.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + self.track_count - 1) % self.track_count;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.track_count.saturating_sub(1);
    }

    /// Move the cursor to `idx` if it names a track.
    pub fn set_selected(&mut self, idx: usize) {
        if idx < self.track_count {
            self.selected = idx;
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        };
    }
}
