use std::env;
use std::path::Path;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::logging;
use crate::mpris::{self, ControlCmd};

mod event_loop;
mod settings;
mod startup;

/// Music directory used when none is given on the command line.
const DEFAULT_DIR: &str = "music";

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, problem) = settings::load_settings();
    let _log_guard = logging::init_logging(&settings.logging);
    if let Some(problem) = problem {
        warn!(%problem, "using default settings");
    }

    let dir = env::args().nth(1).unwrap_or_else(|| DEFAULT_DIR.to_string());
    info!(%dir, "cadenza starting");

    let catalog = startup::build_catalog(Path::new(&dir), &settings.library);
    let mut player = startup::build_player(catalog, &settings)?;

    let mut app = App::new(player.catalog().len(), settings.ui.theme);
    app.set_current_dir(dir);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut player,
        &mpris,
        &control_rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    player.stop();
    info!("cadenza exiting");
    run_result
}
