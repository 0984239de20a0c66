use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use super::{Coordinator, IndexPicker, Intent, PlayerError, Tick};
use crate::audio::fakes::{FixedProbe, ManualClock, RecordingEngine};
use crate::audio::{Clock, PlaybackState, Transport};
use crate::library::{Catalog, Track};

struct Scripted(VecDeque<usize>);

impl IndexPicker for Scripted {
    fn pick(&mut self, len: usize) -> usize {
        self.0.pop_front().unwrap_or(0) % len
    }
}

fn path(name: &str) -> String {
    format!("music/{name}.mp3")
}

fn track(name: &str) -> Track {
    Track::from_path(path(name))
}

fn coordinator(names: &[&str]) -> (Coordinator, ManualClock, RecordingEngine) {
    let clock = ManualClock::new();
    let engine = RecordingEngine::default();
    let probe = ["A", "B", "C", "X", "corrupt"]
        .iter()
        .fold(FixedProbe::default(), |p, n| p.with(path(n), 100));
    let transport = Transport::new(
        Box::new(engine.clone()),
        Box::new(probe),
        Rc::new(clock.clone()),
    );
    let catalog = Catalog::new(names.iter().map(|n| track(n)).collect());
    let c = Coordinator::new(catalog, transport, Rc::new(clock.clone()));
    (c, clock, engine)
}

fn playing(c: &Coordinator) -> Option<&str> {
    c.current_track().map(|t| t.display.as_str())
}

fn next_name(c: &mut Coordinator) -> String {
    c.determine_next().unwrap().display
}

#[test]
fn sequential_next_wraps_around() {
    let (mut c, _clock, _engine) = coordinator(&["A", "B", "C"]);
    c.play(None);
    assert_eq!(playing(&c), Some("A"));

    let mut seen = Vec::new();
    for _ in 0..4 {
        c.next();
        seen.push(playing(&c).unwrap().to_string());
    }
    assert_eq!(seen, vec!["B", "C", "A", "B"]);
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.status(), "Playing");
}

#[test]
fn queue_is_consumed_before_sequential_logic() {
    let (mut c, _clock, _engine) = coordinator(&["A", "B"]);
    c.enqueue(track("X"));

    assert_eq!(next_name(&mut c), "X");
    assert_eq!(next_name(&mut c), "B");
}

#[test]
fn queue_head_wins_regardless_of_modes() {
    for (shuffle, repeat) in [(false, false), (true, false), (false, true), (true, true)] {
        let (mut c, _clock, _engine) = coordinator(&["A", "B", "C"]);
        c.set_modes(shuffle, repeat);
        c.play(None);
        c.enqueue(track("X"));
        c.enqueue(track("X"));
        assert_eq!(next_name(&mut c), "X");
        assert_eq!(next_name(&mut c), "X");
        assert_eq!(c.queue_len(), 0);
    }
}

#[test]
fn repeat_returns_loaded_track_every_time() {
    let (mut c, _clock, _engine) = coordinator(&["A", "B", "C"]);
    c.play(Some(1));
    c.toggle_repeat();
    c.toggle_shuffle();
    assert!(c.repeat() && c.shuffle());

    for _ in 0..5 {
        assert_eq!(next_name(&mut c), "B");
    }
    c.next();
    assert_eq!(playing(&c), Some("B"));
    assert_eq!(c.catalog().index(), 1);
}

#[test]
fn repeat_without_loaded_track_uses_cursor() {
    let (mut c, _clock, _engine) = coordinator(&["A", "B"]);
    c.toggle_repeat();
    assert_eq!(next_name(&mut c), "A");
}

#[test]
fn shuffle_samples_catalog_and_allows_repeats() {
    let (c, _clock, _engine) = coordinator(&["A", "B", "C"]);
    let mut c = c.with_picker(Box::new(Scripted(VecDeque::from([2, 2, 0]))));
    c.toggle_shuffle();

    assert_eq!(next_name(&mut c), "C");
    assert_eq!(next_name(&mut c), "C");
    assert_eq!(next_name(&mut c), "A");
    assert_eq!(c.catalog().index(), 0);
}

#[test]
fn random_picker_stays_in_range() {
    let mut picker = super::RandomPicker;
    for len in 1..10 {
        for _ in 0..50 {
            assert!(picker.pick(len) < len);
        }
    }
}

#[test]
fn previous_ignores_queue_and_modes() {
    let (mut c, _clock, _engine) = coordinator(&["A", "B", "C"]);
    c.play(Some(1));
    c.enqueue(track("X"));
    c.set_modes(true, true);

    c.previous();
    assert_eq!(playing(&c), Some("A"));
    c.previous();
    assert_eq!(playing(&c), Some("C"));
    assert_eq!(c.queue_len(), 1);
}

#[test]
fn empty_catalog_reports_instead_of_failing() {
    let (mut c, _clock, engine) = coordinator(&[]);
    assert!(matches!(c.determine_next(), Err(PlayerError::EmptyCatalog)));

    for intent in [Intent::Play(None), Intent::Next, Intent::Previous, Intent::TogglePause] {
        c.apply(intent);
        assert_eq!(c.status(), "No tracks available");
    }
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert!(engine.calls().iter().all(|call| !matches!(
        call,
        crate::audio::fakes::EngineCall::PlayFrom(_)
    )));
}

#[test]
fn unreadable_track_becomes_status_and_nothing_plays() {
    let (mut c, _clock, _engine) = coordinator(&["A", "corrupt"]);
    c.play(Some(1));
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert!(c.current_track().is_none());
    assert!(c.status().starts_with("cannot play"), "{}", c.status());

    c.play(Some(7));
    assert_eq!(c.status(), "No track at position 7");
}

#[test]
fn toggle_pause_cycles_through_states() {
    let (mut c, _clock, _engine) = coordinator(&["A"]);
    c.apply(Intent::TogglePause);
    assert_eq!(c.state(), PlaybackState::Playing);
    c.apply(Intent::TogglePause);
    assert_eq!(c.state(), PlaybackState::Paused);
    assert_eq!(c.status(), "Paused");
    c.apply(Intent::TogglePause);
    assert_eq!(c.state(), PlaybackState::Playing);
    c.apply(Intent::Stop);
    assert_eq!(c.state(), PlaybackState::Stopped);
}

#[test]
fn seek_percent_maps_onto_duration() {
    let (mut c, _clock, _engine) = coordinator(&["A"]);
    c.apply(Intent::Seek(50.0));
    assert_eq!(c.status(), "no track loaded");

    c.play(None);
    c.apply(Intent::Seek(25.0));
    assert_eq!(c.elapsed(), Duration::from_secs(25));
    c.apply(Intent::Seek(250.0));
    assert_eq!(c.elapsed(), Duration::from_secs(100));
    c.apply(Intent::SeekBy(-30));
    assert_eq!(c.elapsed(), Duration::from_secs(70));
    c.apply(Intent::SeekBy(-300));
    assert_eq!(c.elapsed(), Duration::ZERO);
}

#[test]
fn volume_is_clamped_percent() {
    let (mut c, _clock, _engine) = coordinator(&["A"]);
    c.apply(Intent::SetVolume(70.0));
    assert_eq!(c.volume_percent(), 70);
    assert_eq!(c.status(), "Volume 70%");
    c.apply(Intent::SetVolume(140.0));
    assert_eq!(c.volume_percent(), 100);
    assert_eq!(c.state(), PlaybackState::Stopped);
}

#[test]
fn enqueue_by_index_and_clear() {
    let (mut c, _clock, _engine) = coordinator(&["A", "B"]);
    c.apply(Intent::Enqueue(1));
    c.apply(Intent::Enqueue(1));
    assert_eq!(c.status(), "Queued: B");
    let names: Vec<&str> = c.queue().map(|t| t.display.as_str()).collect();
    assert_eq!(names, vec!["B", "B"]);

    c.apply(Intent::Enqueue(5));
    assert_eq!(c.queue_len(), 2);

    c.apply(Intent::ClearQueue);
    assert_eq!(c.queue_len(), 0);
}

#[test]
fn sleep_timer_of_zero_stops_on_next_tick_once() {
    let (mut c, clock, _engine) = coordinator(&["A"]);
    c.play(None);
    c.arm_sleep_timer(Duration::ZERO);
    assert_eq!(c.status(), "Sleep timer: 0s");

    assert_eq!(c.tick(clock.now()), Tick::StoppedByTimer);
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert_eq!(c.status(), "Stopped (sleep timer)");
    assert_eq!(c.sleep_remaining(clock.now()), None);

    assert_eq!(c.tick(clock.now()), Tick::Idle);
}

#[test]
fn rearming_sleep_timer_replaces_deadline() {
    let (mut c, clock, _engine) = coordinator(&["A"]);
    c.play(None);
    c.apply(Intent::ArmSleepTimer(1));
    c.apply(Intent::ArmSleepTimer(5));
    assert_eq!(c.status(), "Sleep timer: 5 min");

    clock.advance_secs(90);
    assert!(matches!(c.tick(clock.now()), Tick::Progress { .. } | Tick::Advanced));
    assert_eq!(c.sleep_remaining(clock.now()), Some(Duration::from_secs(210)));

    c.apply(Intent::CancelSleepTimer);
    clock.advance_secs(600);
    assert_ne!(c.tick(clock.now()), Tick::StoppedByTimer);
}

#[test]
fn tick_reports_progress_while_playing() {
    let (mut c, clock, _engine) = coordinator(&["A", "B"]);
    assert_eq!(c.tick(clock.now()), Tick::Idle);

    c.play(None);
    clock.advance_secs(12);
    assert_eq!(
        c.tick(clock.now()),
        Tick::Progress {
            elapsed: Duration::from_secs(12),
            duration: Duration::from_secs(100),
        }
    );

    c.pause();
    assert_eq!(c.tick(clock.now()), Tick::Idle);
}

#[test]
fn tick_advances_when_track_ends() {
    let (mut c, clock, engine) = coordinator(&["A", "B"]);
    c.play(None);
    clock.advance_secs(100);
    assert_eq!(c.tick(clock.now()), Tick::Advanced);
    assert_eq!(playing(&c), Some("B"));
    assert_eq!(c.elapsed(), Duration::ZERO);

    engine.set_drained(true);
    assert_eq!(c.tick(clock.now()), Tick::Advanced);
    assert_eq!(playing(&c), Some("A"));
}

#[test]
fn toggles_report_state_in_status() {
    let (mut c, _clock, _engine) = coordinator(&["A"]);
    c.apply(Intent::ToggleShuffle);
    assert_eq!(c.status(), "Shuffle On");
    c.apply(Intent::ToggleShuffle);
    assert_eq!(c.status(), "Shuffle Off");
    c.apply(Intent::ToggleRepeat);
    assert_eq!(c.status(), "Repeat On");
}

#[test]
fn sleep_timer_status_shows_seconds_under_a_minute() {
    let (mut c, _clock, _engine) = coordinator(&["A"]);
    c.arm_sleep_timer(Duration::from_secs(45));
    assert_eq!(c.status(), "Sleep timer: 45s");
    c.arm_sleep_timer(Duration::from_secs(90));
    assert_eq!(c.status(), "Sleep timer: 1 min");
}

#[test]
fn oversized_sleep_timer_is_reported_and_not_armed() {
    let (mut c, clock, _engine) = coordinator(&["A"]);
    c.play(None);
    c.apply(Intent::ArmSleepTimer(u64::MAX));

    assert!(c.status().starts_with("Sleep timer of"), "{}", c.status());
    assert_eq!(c.sleep_remaining(clock.now()), None);
    clock.advance_secs(5);
    assert!(matches!(c.tick(clock.now()), Tick::Progress { .. }));
    assert_eq!(c.state(), PlaybackState::Playing);
}

#[test]
fn failed_auto_advance_reports_idle() {
    let (mut c, clock, _engine) = coordinator(&["A", "corrupt"]);
    c.play(None);
    clock.advance_secs(100);

    assert_eq!(c.tick(clock.now()), Tick::Idle);
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert!(c.current_track().is_none());
    assert!(c.status().starts_with("cannot play"), "{}", c.status());
}
