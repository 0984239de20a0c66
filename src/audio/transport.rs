use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::library::Track;

use super::clock::Clock;
use super::engine::AudioEngine;
use super::error::TransportError;
use super::probe::MediaProbe;
use super::types::{PlaybackState, clamp_unit};

/// The loaded track and the bookkeeping needed to derive elapsed time.
///
/// While playing, elapsed = `offset` + (now - `started_at`); while paused
/// `offset` alone holds the frozen position.
#[derive(Debug)]
struct Session {
    track: Track,
    duration: Duration,
    started_at: Option<Instant>,
    offset: Duration,
}

/// Play/pause/seek/volume over a single loaded track.
///
/// `pause`, `resume`, `stop` and `set_volume` are no-ops when called in a
/// state where they do not apply.
pub struct Transport {
    engine: Box<dyn AudioEngine>,
    probe: Box<dyn MediaProbe>,
    clock: Rc<dyn Clock>,
    session: Option<Session>,
    state: PlaybackState,
    volume: f32,
}

impl Transport {
    pub fn new(
        engine: Box<dyn AudioEngine>,
        probe: Box<dyn MediaProbe>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            engine,
            probe,
            clock,
            session: None,
            state: PlaybackState::Stopped,
            volume: 1.0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn track(&self) -> Option<&Track> {
        self.session.as_ref().map(|s| &s.track)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.session.as_ref().map(|s| s.duration)
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Bind `track`, discarding whatever was loaded before.
    ///
    /// On failure nothing is loaded. On success the transport is Stopped at 0.
    pub fn load(&mut self, track: &Track) -> Result<(), TransportError> {
        self.engine.stop();
        self.session = None;
        self.state = PlaybackState::Stopped;

        let duration = self.probe.duration(&track.path)?;
        self.engine.load(&track.path)?;

        debug!(path = %track.path.display(), secs = duration.as_secs(), "track loaded");
        self.session = Some(Session {
            track: track.clone(),
            duration,
            started_at: None,
            offset: Duration::ZERO,
        });
        Ok(())
    }

    /// Start the loaded track from the beginning. Without a track this does nothing.
    pub fn play(&mut self) -> Result<(), TransportError> {
        if self.session.is_none() {
            return Ok(());
        }
        self.start_at(Duration::ZERO)?;
        if let Some(track) = self.track() {
            info!(track = %track.display, "playing");
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let frozen = self.elapsed();
        if let Some(s) = self.session.as_mut() {
            s.offset = frozen;
            s.started_at = None;
        }
        self.engine.pause();
        self.state = PlaybackState::Paused;
    }

    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        let now = self.clock.now();
        if let Some(s) = self.session.as_mut() {
            s.started_at = Some(now);
        }
        self.engine.resume();
        self.state = PlaybackState::Playing;
    }

    /// Stop output and rewind to 0. The track stays loaded.
    pub fn stop(&mut self) {
        self.engine.stop();
        if let Some(s) = self.session.as_mut() {
            s.offset = Duration::ZERO;
            s.started_at = None;
        }
        self.state = PlaybackState::Stopped;
    }

    /// Restart playback at `target_secs`, clamped to `[0, duration]`.
    ///
    /// Ends up Playing whether it started Playing, Paused or Stopped.
    pub fn seek(&mut self, target_secs: f64) -> Result<Duration, TransportError> {
        let duration = self.duration().ok_or(TransportError::NothingLoaded)?;
        let target = if target_secs.is_finite() && target_secs > 0.0 {
            Duration::from_secs_f64(target_secs.min(duration.as_secs_f64()))
        } else {
            Duration::ZERO
        };
        self.start_at(target)?;
        debug!(target_ms = target.as_millis() as u64, "seek");
        Ok(target)
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_unit(volume);
        self.engine.set_volume(self.volume);
    }

    /// 0 when Stopped, running while Playing, frozen while Paused.
    pub fn elapsed(&self) -> Duration {
        let Some(s) = self.session.as_ref() else {
            return Duration::ZERO;
        };
        match (self.state, s.started_at) {
            (PlaybackState::Playing, Some(started)) => {
                s.offset + self.clock.now().saturating_duration_since(started)
            }
            (PlaybackState::Paused, _) => s.offset,
            _ => Duration::ZERO,
        }
    }

    /// True once a playing track has run its full duration or the engine
    /// has drained.
    pub fn is_finished(&self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        let Some(duration) = self.duration() else {
            return false;
        };
        self.elapsed() >= duration || !self.engine.is_busy()
    }

    fn start_at(&mut self, position: Duration) -> Result<(), TransportError> {
        if let Err(e) = self.engine.play_from(position) {
            self.stop();
            return Err(e);
        }
        let now = self.clock.now();
        if let Some(s) = self.session.as_mut() {
            s.offset = position;
            s.started_at = Some(now);
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }
}
