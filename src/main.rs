//! petshop-manager binary entry point.
//!
//! Initializes the terminal in raw mode, runs the TUI event loop,
//! and restores the terminal state on exit.
//!
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use petshop_manager::api::{ApiClient, ApiConfig};
use petshop_manager::app;

/// TUI for the pet shop customer registry.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Base URL of the customer registry API.
    #[arg(long, env = "PETSHOP_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let args = Args::parse();

    // Stdout belongs to the TUI; logs go to stderr, and only when asked for.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let api = ApiClient::new(ApiConfig {
        base_url: args.api_url,
        timeout: Duration::from_secs(args.timeout),
    });

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &api);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
