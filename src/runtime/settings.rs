use crate::config::Settings;

/// Load and validate settings. A bad or unreadable config never stops the
/// player: defaults are used and the reason is handed back for logging once
/// the subscriber is up.
pub fn load_settings() -> (Settings, Option<String>) {
    match Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (Settings::default(), Some(format!("invalid config: {msg}"))),
        },
        Err(e) => (
            Settings::default(),
            Some(format!("failed to load config: {e}")),
        ),
    }
}
