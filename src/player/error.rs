use thiserror::Error;

use crate::audio::TransportError;

/// Everything the coordinator can fail with. All of it ends up as status text.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("No tracks available")]
    EmptyCatalog,

    #[error("No track at position {0}")]
    NoSuchTrack(usize),

    #[error("Sleep timer of {0}s is out of range")]
    SleepTimerOutOfRange(u64),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
