use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

mod api;
mod config;
mod controller;
mod logging;
mod tui;

use api::HttpNotesApi;
use config::{Cli, Config};
use controller::Event;
use tui::app::App;

/// How long to wait for a key before checking for finished requests
const TICK: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let config = Config::from(Cli::parse());
    logging::init(&config.log_file)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let api = HttpNotesApi::new(&config.base_url)?;
    tracing::info!(endpoint = %api.endpoint(), "starting");

    // Setup terminal
    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!("Failed to enable raw mode: {}. Make sure you're running in a terminal.", e)
    })?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        anyhow::anyhow!(
            "Failed to enter alternate screen: {}. Make sure you're running in a terminal.",
            e
        )
    })?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| {
        anyhow::anyhow!("Failed to create terminal: {}. Make sure you're running in a terminal.", e)
    })?;

    let mut app = App::new(Arc::new(api), runtime.handle().clone());
    app.dispatch(Event::Load);

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "exiting on error");
    }
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.drain_outcomes();
        terminal.draw(|f| app.render(f))?;

        if event::poll(TICK)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code, key.modifiers);
                }
            }
        }
    }
    Ok(())
}
