//! File logging. The terminal belongs to the UI, so everything goes to a
//! daily rolling file under the state directory.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LoggingSettings};

const LOG_FILE: &str = "cadenza.log";

/// Where log files go: the configured directory, else the XDG state dir.
pub fn log_dir(settings: &LoggingSettings) -> Option<PathBuf> {
    settings
        .directory
        .clone()
        .or_else(config::default_state_dir)
}

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
///
/// The returned guard flushes the writer when dropped, so keep it alive for
/// the whole run. Returns `None` (and logs nothing) if setup fails.
pub fn init_logging(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let Some(dir) = log_dir(settings) else {
        eprintln!("cadenza: no log directory (set HOME or logging.directory)");
        return None;
    };
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("cadenza: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let installed = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init();
    if let Err(e) = installed {
        eprintln!("cadenza: logging disabled: {e}");
        return None;
    }
    Some(guard)
}
