//! In-memory stand-ins for the clock, engine and probe.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use super::clock::Clock;
use super::engine::AudioEngine;
use super::error::TransportError;
use super::probe::MediaProbe;

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance_secs(&self, secs: u64) {
        self.offset.set(self.offset.get() + Duration::from_secs(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(PathBuf),
    PlayFrom(Duration),
    Pause,
    Resume,
    Stop,
    Volume(f32),
}

#[derive(Debug, Default)]
pub struct EngineLog {
    pub calls: Vec<EngineCall>,
    /// Reported by `is_busy` while something is playing.
    pub drained: bool,
}

/// Records every call; `load` fails for paths containing "corrupt".
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    pub log: Rc<RefCell<EngineLog>>,
    playing: Rc<Cell<bool>>,
}

impl RecordingEngine {
    pub fn calls(&self) -> Vec<EngineCall> {
        self.log.borrow().calls.clone()
    }

    pub fn set_drained(&self, drained: bool) {
        self.log.borrow_mut().drained = drained;
    }

    fn record(&self, call: EngineCall) {
        self.log.borrow_mut().calls.push(call);
    }
}

impl AudioEngine for RecordingEngine {
    fn load(&mut self, path: &Path) -> Result<(), TransportError> {
        if path.to_string_lossy().contains("corrupt") {
            return Err(TransportError::unreadable(path, "decoder rejected file"));
        }
        self.record(EngineCall::Load(path.to_path_buf()));
        Ok(())
    }

    fn play_from(&mut self, start: Duration) -> Result<(), TransportError> {
        self.record(EngineCall::PlayFrom(start));
        self.playing.set(true);
        Ok(())
    }

    fn pause(&mut self) {
        self.record(EngineCall::Pause);
    }

    fn resume(&mut self) {
        self.record(EngineCall::Resume);
    }

    fn stop(&mut self) {
        self.record(EngineCall::Stop);
        self.playing.set(false);
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(EngineCall::Volume(volume));
    }

    fn is_busy(&self) -> bool {
        self.playing.get() && !self.log.borrow().drained
    }
}

/// Durations by path; unknown paths are unreadable.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    durations: HashMap<PathBuf, Duration>,
}

impl FixedProbe {
    pub fn with(mut self, path: impl Into<PathBuf>, secs: u64) -> Self {
        self.durations.insert(path.into(), Duration::from_secs(secs));
        self
    }
}

impl MediaProbe for FixedProbe {
    fn duration(&self, path: &Path) -> Result<Duration, TransportError> {
        self.durations
            .get(path)
            .copied()
            .ok_or_else(|| TransportError::unreadable(path, "not an audio file"))
    }
}
