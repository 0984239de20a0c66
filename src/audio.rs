//! Audio transport: one loaded track at a time, with elapsed-time accounting
//! on top of an `AudioEngine` (rodio) and a `MediaProbe` (lofty).

mod clock;
mod engine;
mod error;
mod probe;
mod transport;
mod types;

pub use clock::{Clock, SystemClock};
pub use engine::{AudioEngine, RodioEngine};
pub use error::TransportError;
pub use probe::{LoftyProbe, MediaProbe};
pub use transport::Transport;
pub use types::{PlaybackState, clamp_unit};

#[cfg(test)]
pub(crate) mod fakes;
