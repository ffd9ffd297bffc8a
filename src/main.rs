mod app;
mod config;
mod github;
mod search;
mod ui;

use crate::app::App;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ghprofile",
    version,
    about = "Terminal GitHub profile finder: type a username, watch the profile card update"
)]
struct Args {
    /// Username to look up on startup
    username: Option<String>,

    /// Path to a config file (default: {config_dir}/ghprofile/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let mut app = App::new(&config, runtime.handle().clone())?;
    if let Some(username) = args.username.as_deref() {
        app.seed(username);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// The TUI owns the terminal, so diagnostics go to a file under the cache
/// dir, and only when RUST_LOG asks for them.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let Some(dir) = dirs::cache_dir() else { return };
    let dir = dir.join("ghprofile");
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    if let Ok(file) = std::fs::File::create(dir.join("ghprofile.log")) {
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
}
