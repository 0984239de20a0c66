use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{info, warn};

use crate::audio::{LoftyProbe, RodioEngine, SystemClock, Transport, TransportError};
use crate::config::{LibrarySettings, Settings};
use crate::library::{Catalog, PlaylistStore, apply_saved_order, scan};
use crate::player::Coordinator;

/// Scan `dir`, restore the saved order and write the merged order back.
pub fn build_catalog(dir: &Path, library: &LibrarySettings) -> Catalog {
    let scanned = scan(dir, library);
    if library.playlist_file.as_os_str().is_empty() {
        return Catalog::new(scanned);
    }

    let store = PlaylistStore::new(&library.playlist_file);
    let tracks = apply_saved_order(scanned, &store.load());
    let paths: Vec<PathBuf> = tracks.iter().map(|t| t.path.clone()).collect();
    if let Err(e) = store.save(&paths) {
        warn!(error = %e, "could not save playlist order");
    }
    info!(count = tracks.len(), dir = %dir.display(), "catalog ready");
    Catalog::new(tracks)
}

/// Open the audio device and wire the coordinator with the configured modes and volume.
pub fn build_player(catalog: Catalog, settings: &Settings) -> Result<Coordinator, TransportError> {
    let clock = Rc::new(SystemClock);
    let engine = RodioEngine::open()?;
    let mut transport = Transport::new(Box::new(engine), Box::new(LoftyProbe), clock.clone());
    transport.set_volume(settings.audio.initial_volume);

    let mut player = Coordinator::new(catalog, transport, clock);
    player.set_modes(settings.playback.shuffle, settings.playback.repeat);
    Ok(player)
}
