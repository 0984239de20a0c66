use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::PlaybackState;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Coordinator, Intent, Tick};
use crate::ui::{self, Theme};

/// Upper bound on how long input polling may block, so MPRIS commands and
/// redraws are not held back by a long tick interval.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Intent(Intent),
    Down,
    Up,
    Top,
    Bottom,
    ToggleMetadata,
    ToggleTheme,
    None,
}

/// State carried across loop iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// First `g` of a `gg` was pressed.
    pub pending_gg: bool,
    /// Last playback state and track pushed to MPRIS.
    published: Option<(PlaybackState, Option<PathBuf>)>,
}

/// Main terminal loop: draws, drains MPRIS commands, reads keys and ticks
/// the coordinator every `audio.tick_ms`. Returns when a quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Coordinator,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_every = Duration::from_millis(settings.audio.tick_ms);
    let mut next_tick = Instant::now() + tick_every;
    let mut state = EventLoopState::default();

    loop {
        publish_to_mpris(mpris, player, &mut state);

        let theme = Theme::named(app.theme);
        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                player,
                &theme,
                &settings.ui,
                &settings.controls,
                Instant::now(),
            )
        })?;

        while let Ok(cmd) = control_rx.try_recv() {
            match cmd {
                ControlCmd::Quit => return Ok(()),
                ControlCmd::Intent(intent) => player.apply(intent),
            }
        }

        let timeout = next_tick.saturating_duration_since(Instant::now()).min(INPUT_POLL);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = key_action(key, settings, app, player, &mut state);
                    if perform(action, app, player) {
                        return Ok(());
                    }
                }
            }
        }

        let now = Instant::now();
        if now >= next_tick {
            if player.tick(now) == Tick::Advanced {
                follow_catalog_cursor(app, player);
            }
            next_tick = now + tick_every;
        }
    }
}

/// Map a key press to an action. Only `gg` needs state between presses.
pub fn key_action(
    key: KeyEvent,
    settings: &config::Settings,
    app: &App,
    player: &Coordinator,
    state: &mut EventLoopState,
) -> Action {
    let was_pending_gg = std::mem::take(&mut state.pending_gg);
    let controls = &settings.controls;
    let volume = f32::from(player.volume_percent());
    let step = f32::from(controls.volume_step);
    let scrub = i64::try_from(controls.scrub_seconds).unwrap_or(i64::MAX);

    let intent = match key.code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => return Action::Down,
        KeyCode::Char('k') | KeyCode::Up => return Action::Up,
        KeyCode::Char('g') if was_pending_gg => return Action::Top,
        KeyCode::Char('g') => {
            state.pending_gg = true;
            return Action::None;
        }
        KeyCode::Char('G') => return Action::Bottom,
        KeyCode::Char('K') => return Action::ToggleMetadata,
        KeyCode::Char('m') => return Action::ToggleTheme,

        KeyCode::Enter if app.has_tracks() => Intent::Play(Some(app.selected)),
        KeyCode::Char(' ') | KeyCode::Char('p') => Intent::TogglePause,
        KeyCode::Char('x') => Intent::Stop,
        KeyCode::Char('l') | KeyCode::Right => Intent::Next,
        KeyCode::Char('h') | KeyCode::Left => Intent::Previous,
        KeyCode::Char('L') => Intent::SeekBy(scrub),
        KeyCode::Char('H') => Intent::SeekBy(-scrub),
        KeyCode::Char(d @ '0'..='9') => Intent::Seek(f64::from(d as u8 - b'0') * 10.0),
        KeyCode::Char('+') | KeyCode::Char('=') => Intent::SetVolume(volume + step),
        KeyCode::Char('-') => Intent::SetVolume(volume - step),
        KeyCode::Char('s') => Intent::ToggleShuffle,
        KeyCode::Char('r') => Intent::ToggleRepeat,
        KeyCode::Char('a') if app.has_tracks() => Intent::Enqueue(app.selected),
        KeyCode::Char('c') => Intent::ClearQueue,
        KeyCode::Char('t') => Intent::ArmSleepTimer(controls.sleep_minutes),
        KeyCode::Char('T') => Intent::CancelSleepTimer,
        _ => return Action::None,
    };
    Action::Intent(intent)
}

/// Apply `action`; returns true when the loop should exit.
fn perform(action: Action, app: &mut App, player: &mut Coordinator) -> bool {
    match action {
        Action::Quit => return true,
        Action::Intent(intent @ (Intent::Next | Intent::Previous)) => {
            player.apply(intent);
            follow_catalog_cursor(app, player);
        }
        Action::Intent(intent) => player.apply(intent),
        Action::Down => app.next(),
        Action::Up => app.prev(),
        Action::Top => app.first(),
        Action::Bottom => app.last(),
        Action::ToggleMetadata => app.toggle_metadata_window(),
        Action::ToggleTheme => app.toggle_theme(),
        Action::None => {}
    }
    false
}

/// Put the list cursor on the playing track when it came from the catalog
/// (queued tracks leave the cursor alone).
fn follow_catalog_cursor(app: &mut App, player: &Coordinator) {
    let catalog = player.catalog();
    let playing = player.current_track().map(|t| &t.path);
    if playing.is_some() && playing == catalog.current().map(|t| &t.path) {
        app.set_selected(catalog.index());
    }
}

/// Push state to MPRIS only when the playback state or track changed.
fn publish_to_mpris(mpris: &MprisHandle, player: &Coordinator, state: &mut EventLoopState) {
    let snapshot = (player.state(), player.current_track().map(|t| t.path.clone()));
    if state.published.as_ref() == Some(&snapshot) {
        return;
    }
    mpris.set_playback(snapshot.0);
    mpris.set_track(player.current_track(), player.duration());
    state.published = Some(snapshot);
}
