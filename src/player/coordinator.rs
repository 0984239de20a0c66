use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::{Clock, PlaybackState, Transport, TransportError};
use crate::library::{Catalog, Track};

use super::error::PlayerError;
use super::intent::Intent;
use super::shuffle::{IndexPicker, RandomPicker};

/// What a call to [`Coordinator::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing is playing.
    Idle,
    /// Still playing; position for the progress display.
    Progress { elapsed: Duration, duration: Duration },
    /// The current track ended and the next one was started.
    Advanced,
    /// The sleep timer expired and playback was stopped.
    StoppedByTimer,
}

/// Owns the catalog, transport and queue and reconciles user intents with
/// what the transport is doing.
///
/// Errors never escape: every failure is logged and becomes the status line.
pub struct Coordinator {
    catalog: Catalog,
    transport: Transport,
    queue: VecDeque<Track>,
    shuffle: bool,
    repeat: bool,
    sleep_deadline: Option<Instant>,
    status: String,
    picker: Box<dyn IndexPicker>,
    clock: Rc<dyn Clock>,
}

impl Coordinator {
    pub fn new(catalog: Catalog, transport: Transport, clock: Rc<dyn Clock>) -> Self {
        let status = if catalog.is_empty() {
            PlayerError::EmptyCatalog.to_string()
        } else {
            "Ready".to_string()
        };
        Self {
            catalog,
            transport,
            queue: VecDeque::new(),
            shuffle: false,
            repeat: false,
            sleep_deadline: None,
            status,
            picker: Box::new(RandomPicker),
            clock,
        }
    }

    /// Replace the shuffle sampler.
    pub fn with_picker(mut self, picker: Box<dyn IndexPicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn set_modes(&mut self, shuffle: bool, repeat: bool) {
        self.shuffle = shuffle;
        self.repeat = repeat;
    }

    pub fn apply(&mut self, intent: Intent) {
        debug!(?intent, "intent");
        match intent {
            Intent::Play(selected) => self.play(selected),
            Intent::TogglePause => self.toggle_pause(),
            Intent::Pause => self.pause(),
            Intent::Resume => self.resume(),
            Intent::Stop => self.stop(),
            Intent::Next => self.next(),
            Intent::Previous => self.previous(),
            Intent::Seek(percent) => self.seek_percent(percent),
            Intent::SeekBy(secs) => self.seek_by(secs),
            Intent::SetVolume(percent) => self.set_volume_percent(percent),
            Intent::ToggleShuffle => self.toggle_shuffle(),
            Intent::ToggleRepeat => self.toggle_repeat(),
            Intent::Enqueue(index) => self.enqueue_index(index),
            Intent::ClearQueue => self.clear_queue(),
            Intent::ArmSleepTimer(minutes) => {
                self.arm_sleep_timer(Duration::from_secs(minutes.saturating_mul(60)))
            }
            Intent::CancelSleepTimer => self.cancel_sleep_timer(),
        }
    }

    /// Play the catalog track at `selected`, or the one under the cursor.
    pub fn play(&mut self, selected: Option<usize>) {
        if let Some(index) = selected {
            if self.catalog.select(index).is_none() {
                return self.report(PlayerError::NoSuchTrack(index));
            }
        }
        match self.catalog.current().cloned() {
            Some(track) => self.start(track),
            None => self.report(PlayerError::EmptyCatalog),
        }
    }

    /// Pause when playing, resume when paused, start the cursor track when stopped.
    pub fn toggle_pause(&mut self) {
        match self.transport.state() {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Stopped => self.play(None),
        }
    }

    pub fn pause(&mut self) {
        if self.transport.state() == PlaybackState::Playing {
            self.transport.pause();
            self.status = "Paused".to_string();
        }
    }

    pub fn resume(&mut self) {
        if self.transport.state() == PlaybackState::Paused {
            self.transport.resume();
            self.status = "Playing".to_string();
        }
    }

    pub fn stop(&mut self) {
        self.transport.stop();
        self.status = "Stopped".to_string();
    }

    /// Pick the track that a "next" event should play.
    ///
    /// The queue always wins; then repeat replays the loaded track; then
    /// shuffle samples the catalog; otherwise the catalog cursor advances.
    pub fn determine_next(&mut self) -> Result<Track, PlayerError> {
        if let Some(track) = self.queue.pop_front() {
            return Ok(track);
        }
        if self.catalog.is_empty() {
            return Err(PlayerError::EmptyCatalog);
        }
        if self.repeat {
            if let Some(track) = self.transport.track() {
                return Ok(track.clone());
            }
            return self.catalog.current().cloned().ok_or(PlayerError::EmptyCatalog);
        }

        let next = if self.shuffle {
            let index = self.picker.pick(self.catalog.len());
            self.catalog.select(index)
        } else {
            self.catalog.advance()
        };
        next.cloned().ok_or(PlayerError::EmptyCatalog)
    }

    pub fn next(&mut self) {
        match self.determine_next() {
            Ok(track) => self.start(track),
            Err(e) => self.report(e),
        }
    }

    /// Step back through the catalog, ignoring queue and modes.
    pub fn previous(&mut self) {
        match self.catalog.retreat().cloned() {
            Some(track) => self.start(track),
            None => self.report(PlayerError::EmptyCatalog),
        }
    }

    /// Jump to `percent` of the loaded track.
    pub fn seek_percent(&mut self, percent: f64) {
        let Some(duration) = self.transport.duration() else {
            return self.report(TransportError::NothingLoaded.into());
        };
        let fraction = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) / 100.0 };
        self.seek_to(duration.as_secs_f64() * fraction);
    }

    pub fn seek_by(&mut self, secs: i64) {
        let target = self.transport.elapsed().as_secs_f64() + secs as f64;
        self.seek_to(target);
    }

    fn seek_to(&mut self, target_secs: f64) {
        match self.transport.seek(target_secs) {
            Ok(_) => self.status = "Playing".to_string(),
            Err(e) => self.report(e.into()),
        }
    }

    pub fn set_volume_percent(&mut self, percent: f32) {
        self.transport.set_volume(percent / 100.0);
        self.status = format!("Volume {}%", self.volume_percent());
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        self.status = format!("Shuffle {}", on_off(self.shuffle));
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
        self.status = format!("Repeat {}", on_off(self.repeat));
    }

    /// Append to the queue. Duplicates are allowed.
    pub fn enqueue(&mut self, track: Track) {
        self.status = format!("Queued: {}", track.display);
        self.queue.push_back(track);
    }

    pub fn enqueue_index(&mut self, index: usize) {
        match self.catalog.get(index).cloned() {
            Some(track) => self.enqueue(track),
            None => self.report(PlayerError::NoSuchTrack(index)),
        }
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.status = "Queue cleared".to_string();
    }

    /// Stop playback once `after` has passed, replacing any earlier timer.
    pub fn arm_sleep_timer(&mut self, after: Duration) {
        let Some(deadline) = self.clock.now().checked_add(after) else {
            return self.report(PlayerError::SleepTimerOutOfRange(after.as_secs()));
        };
        self.sleep_deadline = Some(deadline);
        self.status = if after < Duration::from_secs(60) {
            format!("Sleep timer: {}s", after.as_secs())
        } else {
            format!("Sleep timer: {} min", after.as_secs() / 60)
        };
        info!(secs = after.as_secs(), "sleep timer armed");
    }

    pub fn cancel_sleep_timer(&mut self) {
        if self.sleep_deadline.take().is_some() {
            self.status = "Sleep timer cancelled".to_string();
        }
    }

    /// Periodic poll from the presentation loop.
    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.sleep_deadline.is_some_and(|deadline| now >= deadline) {
            self.sleep_deadline = None;
            self.transport.stop();
            self.status = "Stopped (sleep timer)".to_string();
            info!("sleep timer expired");
            return Tick::StoppedByTimer;
        }

        if self.transport.state() != PlaybackState::Playing {
            return Tick::Idle;
        }
        if self.transport.is_finished() {
            self.next();
            // A failed advance leaves nothing playing; the status says why.
            return if self.transport.state() == PlaybackState::Playing {
                Tick::Advanced
            } else {
                Tick::Idle
            };
        }
        Tick::Progress {
            elapsed: self.transport.elapsed(),
            duration: self.transport.duration().unwrap_or_default(),
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.transport.track()
    }

    pub fn state(&self) -> PlaybackState {
        self.transport.state()
    }

    pub fn elapsed(&self) -> Duration {
        self.transport.elapsed()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.transport.duration()
    }

    pub fn volume_percent(&self) -> u8 {
        (self.transport.volume() * 100.0).round() as u8
    }

    pub fn queue(&self) -> impl Iterator<Item = &Track> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn sleep_remaining(&self, now: Instant) -> Option<Duration> {
        self.sleep_deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    fn start(&mut self, track: Track) {
        let started = self
            .transport
            .load(&track)
            .and_then(|()| self.transport.play());
        match started {
            Ok(()) => self.status = "Playing".to_string(),
            Err(e) => self.report(e.into()),
        }
    }

    fn report(&mut self, err: PlayerError) {
        warn!(error = %err, "playback request failed");
        self.status = err.to_string();
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "On" } else { "Off" }
}
