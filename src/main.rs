//! userlist-manager binary entry point.
//!
//! Parses the command line, sets up file logging, initializes the terminal
//! in raw mode, runs the TUI event loop, and restores the terminal on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use userlist_manager::api::{DEFAULT_API_URL, HttpUserBackend};
use userlist_manager::app::{self, AppState, Theme, keymap::Keymap, resolve_config_path};

/// Browse and edit the users of a remote REST collection.
#[derive(Parser, Debug)]
#[command(name = "userlist-manager", version, about)]
struct Cli {
    /// Base URL of the API serving `/users`.
    #[arg(long, env = "USERLIST_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "USERLIST_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Theme file (default: theme.conf in the config directory).
    #[arg(long, env = "USERLIST_THEME")]
    theme: Option<String>,

    /// Keybindings file (default: keybinds.conf in the config directory).
    #[arg(long, env = "USERLIST_KEYBINDS")]
    keybinds: Option<String>,

    /// Log file; the terminal is taken over by the UI.
    #[arg(long, env = "USERLIST_LOG_FILE", default_value = "userlist-manager.log")]
    log_file: String,
}

/// Send `tracing` output to `path`, filtered by `RUST_LOG` (default `info`).
fn init_logging(path: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {path}"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
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
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;
    tracing::info!(api_url = %cli.api_url, "starting userlist-manager");

    let api = HttpUserBackend::new(&cli.api_url, Duration::from_secs(cli.timeout_secs))
        .map_err(|e| anyhow::anyhow!("create API client: {e}"))?;
    let theme = Theme::load_or_init(&resolve_config_path(cli.theme.as_deref(), "theme.conf"));
    let keymap =
        Keymap::load_or_init(&resolve_config_path(cli.keybinds.as_deref(), "keybinds.conf"));
    let mut state = AppState::new(api.base_url(), theme, keymap);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, &mut state, &api);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
