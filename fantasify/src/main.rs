//! Fantasify journal TUI application.
//!
//! Write a diary entry, get back the next chapter of your hero's fantasy
//! saga, illustrated.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripting:
//!
//! ```bash
//! cargo run -p fantasify -- --headless --name "Kaelen" --realm 2
//! ```

mod app;
mod cli;
mod events;
mod headless;
mod logging;
mod setup;
mod ui;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fantasify_core::session::{LOAD_WARNING, SAVE_WARNING};
use fantasify_core::{JournalConfig, JournalSession, Realm};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;

use app::App;
use cli::Cli;
use events::{handle_event, EventResult};
use setup::SetupScreen;
use ui::render::render;

/// Why the journal screen closed
enum AppExit {
    Quit,
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before clap reads env-backed flags
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = JournalConfig::from_env();
    if let Some(dir) = cli.data_dir.clone() {
        config = config.with_data_dir(dir);
    }
    if let Some(model) = cli.model.clone() {
        config = config.with_model(model);
    }

    if cli.headless {
        logging::init_headless();
        let realm = cli
            .realm
            .as_deref()
            .map(|r| headless::parse_realm(r).ok_or_else(|| format!("Unknown realm: {r}")))
            .transpose()?;
        let session = JournalSession::from_config(&config);
        headless::run_headless(session, cli.name, realm).await?;
        return Ok(());
    }

    let _log_guard = logging::init_tui(&config.resolved_data_dir());
    let mut session = JournalSession::from_config(&config);
    let load_failed = session.restore().await.is_some();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, session, load_failed).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "terminal error");
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Alternate between setup and the journal until the user quits.
async fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut session: JournalSession,
    load_failed: bool,
) -> io::Result<()> {
    let mut pending_warning = load_failed.then_some(LOAD_WARNING);

    loop {
        if session.profile().is_none() {
            let Some((name, realm)) = run_setup(terminal)? else {
                return Ok(());
            };
            match session.begin(&name, realm).await {
                Ok(Some(_)) => pending_warning = Some(SAVE_WARNING),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "setup rejected");
                    continue;
                }
            }
        }

        let mut app = App::new(session);
        if let Some(warning) = pending_warning.take() {
            app.add_error(warning);
        }

        let exit = run_app(terminal, &mut app).await?;
        session = app.session;

        match exit {
            AppExit::Quit => return Ok(()),
            AppExit::Reset => {
                if session.reset().await.is_some() {
                    pending_warning = Some(SAVE_WARNING);
                }
            }
        }
    }
}

/// Run the hero setup form.
fn run_setup<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
) -> io::Result<Option<(String, Realm)>> {
    let mut setup = SetupScreen::new();

    loop {
        terminal.draw(|f| {
            let area = f.area();
            setup.render(f, area);
        })?;

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            setup.handle_event(ev);
        }

        if setup.cancelled {
            return Ok(None);
        }

        if setup.finished {
            return Ok(Some((setup.name.trim().to_string(), setup.realm())));
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<AppExit> {
    let mut pending_entry: Option<String> = None;

    loop {
        terminal.draw(|f| render(f, app))?;

        if let Some(entry) = pending_entry.take() {
            // Show the busy indicator before blocking on generation
            app.generating = true;
            terminal.draw(|f| render(f, app))?;

            app.write_chapter(&entry).await;

            // Input is disabled while a chapter is written
            while event::poll(Duration::ZERO)? {
                event::read()?;
            }
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(app, ev) {
                EventResult::Quit => return Ok(AppExit::Quit),
                EventResult::Reset => return Ok(AppExit::Reset),
                EventResult::Submit(entry) => pending_entry = Some(entry),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }
    }
}
