//! Playback coordinator: decides what plays next, applies user intents,
//! polls progress and enforces the sleep timer.

mod coordinator;
mod error;
mod intent;
mod shuffle;

pub use coordinator::{Coordinator, Tick};
pub use error::PlayerError;
pub use intent::Intent;
pub use shuffle::{IndexPicker, RandomPicker};

#[cfg(test)]
mod tests;
