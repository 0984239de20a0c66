//! Presentation model: cursor position and view toggles for the TUI.
//!
//! Playback state lives in the `player::Coordinator`; `App` only tracks what
//! the shell itself needs to draw and forward intents.

mod model;

pub use model::*;
