//! MPRIS D-Bus surface so desktop media keys and `playerctl` can drive the player.
//!
//! The service runs on its own thread and never touches playback directly:
//! method calls become [`ControlCmd`]s on a channel drained by the event loop,
//! and properties are read from a snapshot the event loop keeps current.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::audio::PlaybackState;
use crate::library::Track;
use crate::player::Intent;

pub const BUS_NAME: &str = "org.mpris.MediaPlayer2.cadenza";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Requests arriving from outside the terminal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlCmd {
    Quit,
    Intent(Intent),
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    length_micros: Option<i64>,
}

impl SharedState {
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };
        if let Some(title) = &self.title {
            put("xesam:title", Value::from(title.as_str()));
        }
        if let Some(artist) = &self.artist {
            put("xesam:artist", Value::from(vec![artist.clone()]));
        }
        if let Some(album) = &self.album {
            put("xesam:album", Value::from(album.as_str()));
        }
        if let Some(length) = self.length_micros {
            put("mpris:length", Value::from(length));
        }
        map
    }
}

/// Event-loop side of the service: publishes what the player is doing.
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    /// Replace the advertised metadata; `None` clears it.
    pub fn set_track(&self, track: Option<&Track>, length: Option<std::time::Duration>) {
        let Ok(mut s) = self.state.lock() else {
            return;
        };
        s.title = track.map(|t| t.title.clone());
        s.artist = track.and_then(|t| t.artist.clone());
        s.album = track.and_then(|t| t.album.clone());
        s.length_micros = length
            .or_else(|| track.and_then(|t| t.duration))
            .and_then(|d| i64::try_from(d.as_micros()).ok());
    }
}

/// What the `Play` method should ask for given the current state.
fn play_intent(playback: PlaybackState) -> Option<Intent> {
    match playback {
        PlaybackState::Stopped => Some(Intent::Play(None)),
        PlaybackState::Paused => Some(Intent::Resume),
        PlaybackState::Playing => None,
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "cadenza"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn send(&self, intent: Intent) {
        let _ = self.tx.send(ControlCmd::Intent(intent));
    }

    fn current(&self) -> PlaybackState {
        self.state
            .lock()
            .map(|s| s.playback)
            .unwrap_or_default()
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.send(Intent::Next);
    }

    fn previous(&self) {
        self.send(Intent::Previous);
    }

    fn play(&self) {
        if let Some(intent) = play_intent(self.current()) {
            self.send(intent);
        }
    }

    fn pause(&self) {
        self.send(Intent::Pause);
    }

    fn play_pause(&self) {
        self.send(Intent::TogglePause);
    }

    fn stop(&self) {
        self.send(Intent::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        self.current().label()
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        self.state
            .lock()
            .map(|s| s.metadata())
            .unwrap_or_default()
    }
}

/// Start the service on a background thread. Bus failures are logged and the
/// player keeps running without MPRIS.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    let spawned = std::thread::Builder::new()
        .name("mpris".to_string())
        .spawn(move || {
            block_on(async move {
                let connection = match Connection::session().await {
                    Ok(c) => c,
                    Err(e) => {
                        warn!(error = %e, "mpris: no session bus");
                        return;
                    }
                };

                if let Err(e) = connection.request_name(BUS_NAME).await {
                    warn!(error = %e, name = BUS_NAME, "mpris: failed to acquire name");
                    return;
                }

                let object_server = connection.object_server();

                if let Err(e) = object_server
                    .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                    .await
                {
                    warn!(error = %e, "mpris: failed to register root interface");
                    return;
                }

                let player = PlayerIface {
                    tx,
                    state: state_for_thread,
                };
                if let Err(e) = object_server.at(OBJECT_PATH, player).await {
                    warn!(error = %e, "mpris: failed to register player interface");
                    return;
                }
                info!(name = BUS_NAME, "mpris service registered");

                loop {
                    Timer::after(std::time::Duration::from_secs(3600)).await;
                }
            });
        });
    if let Err(e) = spawned {
        warn!(error = %e, "mpris: failed to spawn service thread");
    }

    MprisHandle { state }
}
