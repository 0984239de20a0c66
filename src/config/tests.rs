use super::load::{default_config_path, default_state_dir, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cadenza_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", "/tmp/cadenza-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/cadenza-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn default_paths_fall_back_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::remove("XDG_STATE_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.config/cadenza/config.toml")
    );
    assert_eq!(
        default_state_dir().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/state/cadenza")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
shuffle = true
repeat = true

[audio]
initial_volume = 0.25
tick_ms = 250

[controls]
scrub_seconds = 9
sleep_minutes = 30

[ui]
theme = "light"
header_text = "hello"
now_playing_track_fields = ["artist", "title"]
now_playing_time_fields = ["elapsed", "remaining"]
now_playing_time_separator = " | "

[library]
extensions = [".mp3", "flac"]
recursive = true
include_hidden = true
display_fields = ["title"]
sort = "display"
playlist_file = ""
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CADENZA__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert!(s.playback.shuffle);
    assert!(s.playback.repeat);
    assert_eq!(s.audio.initial_volume, 0.25);
    assert_eq!(s.audio.tick_ms, 250);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.sleep_minutes, 30);
    assert_eq!(s.controls.volume_step, 5);
    assert_eq!(s.ui.theme, ThemeName::Light);
    assert_eq!(s.ui.header_text, "hello");
    assert!(matches!(s.ui.now_playing_track_fields[0], TrackDisplayField::Artist));
    assert!(matches!(s.ui.now_playing_time_fields[1], TimeField::Remaining));
    assert_eq!(s.ui.now_playing_time_separator, " | ");
    assert_eq!(s.library.extensions, vec![".mp3".to_string(), "flac".to_string()]);
    assert!(s.library.recursive);
    assert!(s.library.include_hidden);
    assert_eq!(s.library.sort, TrackSort::Display);
    assert_eq!(s.library.playlist_file, PathBuf::new());
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[audio]\ntick_ms = 250\n").unwrap();

    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CADENZA__AUDIO__TICK_MS", "1000");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 1000);
}

#[test]
fn schema_deserializes_partial_toml_with_defaults() {
    let s: Settings = toml::from_str("[controls]\nvolume_step = 10\n").unwrap();
    assert_eq!(s.controls.volume_step, 10);
    assert_eq!(s.controls.sleep_minutes, 5);
    assert_eq!(s.audio.tick_ms, 500);
    assert_eq!(s.library.extensions, vec!["mp3".to_string(), "wav".to_string()]);
    assert_eq!(s.library.playlist_file, PathBuf::from("playlist.json"));
    assert!(!s.playback.shuffle);
}

#[test]
fn validate_rejects_unusable_values() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec!["  ".to_string()];
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.sleep_minutes = 24 * 60;
    assert!(s.validate().is_ok());
    s.controls.sleep_minutes = i64::MAX as u64;
    assert!(s.validate().is_err());
}
