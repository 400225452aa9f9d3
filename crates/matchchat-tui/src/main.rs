//! matchchat-tui — Terminal chat panel for one match.
//! Uses Ratatui + Crossterm for rendering.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{info, warn};

use matchchat_core::{ChatPanel, Config, HttpChatApi};

use app::App;

/// matchchat.yaml in the working directory, or env vars alone.
fn load_config() -> anyhow::Result<Config> {
    let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if dir.join("matchchat.yaml").is_file() {
        Config::load_from_dir(&dir)
    } else {
        Config::from_env().context("No matchchat.yaml found and env config is incomplete")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing to a file (not stdout, since we own the terminal)
    let _guard = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(|| -> Box<dyn io::Write> {
            match std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open("matchchat-tui.log")
            {
                Ok(file) => Box::new(file),
                Err(_) => Box::new(io::sink()),
            }
        })
        .try_init();

    let config = load_config()?;
    let api = Arc::new(HttpChatApi::new(&config)?);
    let panel = Arc::new(ChatPanel::from_config(&config, api));
    let mut events = panel.subscribe();

    info!("Opening match {} on {}", config.match_id(), config.base_url);

    let mut app = App::new(Arc::clone(&panel));
    let mut poller = panel.mount(config.poll_interval());
    info!("Polling every {:?}", poller.period());

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Handle panel events (non-blocking)
        loop {
            match events.try_recv() {
                Ok(event) => app.handle_event(event),
                Err(TryRecvError::Lagged(n)) => {
                    warn!("UI lagged {} panel events, resyncing", n);
                    app.messages = panel.messages();
                    app.input = panel.input();
                }
                Err(_) => break,
            }
        }

        // Handle terminal events
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                match (key.code, key.modifiers) {
                    // Quit
                    (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    // Input handling
                    (KeyCode::Enter, _) => app.send_message(),
                    (KeyCode::Char(c), _) => app.type_char(c),
                    (KeyCode::Backspace, _) => app.backspace(),
                    // Scroll
                    (KeyCode::Up, _) | (KeyCode::PageUp, _) => app.scroll_up(),
                    (KeyCode::Down, _) | (KeyCode::PageDown, _) => app.scroll_down(),
                    _ => {}
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Cleanup
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    poller.stop();
    info!("Closed match {}", config.match_id());

    Ok(())
}
