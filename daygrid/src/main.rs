//! daygrid - training session day grid
//!
//! Terminal UI that lays out a day's training sessions in side-by-side
//! columns and opens group pickers and details on demand.

mod app;
mod input;
mod ui;

use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;
use crate::input::InputArgs;

#[derive(Parser)]
#[command(name = "daygrid")]
#[command(about = "Browse training sessions on a day grid")]
#[command(version)]
struct Args {
    #[command(flatten)]
    input: InputArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = args.input.load_config()?;

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        daygrid_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("daygrid TUI starting up");

    let loaded = args.input.load(config)?;
    let mut app = App::new(&loaded.config, loaded.sessions, loaded.date)
        .context("invalid layout configuration")?;

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("daygrid TUI shutting down");

    result
}

/// Run the main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Fire scheduled selection transitions
        app.tick(Instant::now());

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
