//! The audio output behind the transport.
//!
//! `RodioEngine` owns the output stream and at most one `Sink`. Seeking is a
//! restart: the file is decoded again and `skip_duration` jumps to the target.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use super::error::TransportError;

/// Primitive audio operations. Implementations must not block.
pub trait AudioEngine {
    /// Check that `path` can be decoded and remember it; output stays silent.
    fn load(&mut self, path: &Path) -> Result<(), TransportError>;
    /// Start output of the loaded file at `start`, replacing any running output.
    fn play_from(&mut self, start: Duration) -> Result<(), TransportError>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    /// Whether output is still producing samples.
    fn is_busy(&self) -> bool;
}

pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
    source: Option<PathBuf>,
    volume: f32,
}

impl RodioEngine {
    /// Open the default output device.
    pub fn open() -> Result<Self, TransportError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| TransportError::NoOutput(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped, which garbles the TUI.
        stream.log_on_drop(false);
        Ok(Self {
            stream,
            sink: None,
            source: None,
            volume: 1.0,
        })
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, TransportError> {
    let file = File::open(path).map_err(|e| TransportError::unreadable(path, e))?;
    Decoder::new(BufReader::new(file)).map_err(|e| TransportError::unreadable(path, e))
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<(), TransportError> {
        self.stop();
        self.source = None;
        decode(path)?;
        self.source = Some(path.to_path_buf());
        Ok(())
    }

    fn play_from(&mut self, start: Duration) -> Result<(), TransportError> {
        let path = self.source.as_deref().ok_or(TransportError::NothingLoaded)?;
        let source = decode(path)?.skip_duration(start);

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        sink.append(source);
        sink.play();
        self.sink = Some(sink);
        debug!(start_ms = start.as_millis() as u64, "output started");
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
    }

    fn resume(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }
}
