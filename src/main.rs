//! jobscroll — a terminal job board with infinite scroll.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  FetchMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread) │ ◄───────── │ (state)  │          │ (render) │
//! └──────────┘ FetchRequest└──────────┘          └──────────┘
//!                              ▲
//!                              │ handle_key_event()
//!                         ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`api/`** — the `JobsApi` trait, wire types and the HTTP backend.
//! * **`feed`** — the job list, pagination cursor and the one-request-at-a-time
//!   loading rules.
//! * **`fetch`** — a background thread that performs API calls.
//! * **`markdown`** — plain-text previews and styled detail rendering.
//! * **`format`** — dates, salaries, capitalization, tag colors.
//! * **`app`** — owns all application state (feed, selection, view).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`config`** — command line and environment.
//! * **`main`** — wires everything together: config, logging, the first
//!   page, the terminal and the event loop.

mod api;
mod app;
mod config;
mod feed;
mod fetch;
mod format;
mod input;
mod markdown;
mod ui;

use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use api::{HttpJobsApi, JobsApi};
use app::App;
use config::Config;
use feed::FeedLoader;

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Send logs to a file; the alternate screen owns stdout and stderr.
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("Failed to create log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobscroll=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::load();
    init_logging(&config)?;
    tracing::info!(api_url = %config.api_url, limit = ?config.limit, "starting jobscroll");

    // -- first page, before the terminal is taken over ------------------------
    let api = HttpJobsApi::new(&config.api_url, config.limit, config.timeout())
        .context("Failed to build HTTP client")?;
    let seed = api
        .fetch_page(1)
        .with_context(|| format!("Failed to load the first page of jobs from {}", api.base_url()))?;

    // -- background fetching -------------------------------------------------
    let worker = fetch::spawn(Box::new(api));
    let loader = FeedLoader::new(seed, worker.requests());
    let mut app = App::new(loader, worker.requests(), config.prefetch);

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Apply any finished fetches.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Some(msg) = worker.try_recv() {
            app.handle(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!(jobs = app.jobs().len(), "exiting");
    Ok(())
}
