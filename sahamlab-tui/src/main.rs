//! SahamLab dashboard — browse backtest results of technical indicators on
//! IDX stocks.
//!
//! Tabs:
//! 1. Backtest — filter form (indicators, preset, eight range sliders) and
//!    the sortable results table
//! 2. Report — the study write-up and per-indicator statistics
//! 3. Help — keyboard shortcuts

mod app;
mod input;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use sahamlab_core::{logging, DashboardConfig, Preset, ResultStore};

use crate::app::AppState;

#[derive(Parser)]
#[command(
    name = "sahamlab-tui",
    about = "SahamLab dashboard — filter IDX indicator backtests in the terminal"
)]
struct Args {
    /// Path to a TOML config file. Defaults to ./sahamlab.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset CSV. Overrides `[data] path`.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Preset loaded into the form at startup: "No Filter", "Short Term", "Long Term".
    #[arg(long)]
    preset: Option<Preset>,

    /// Skip the welcome overlay.
    #[arg(long, default_value_t = false)]
    no_welcome: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = DashboardConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    let _log_guard = logging::init_file(&config.logging.directory, &config.logging.level)
        .context("failed to set up logging")?;

    let data_path = args.data.unwrap_or(config.data.path);
    let store = ResultStore::load(&data_path)
        .with_context(|| format!("failed to load results from {}", data_path.display()))?;

    let preset = args.preset.unwrap_or(config.ui.default_preset);
    let show_welcome = config.ui.show_welcome && !args.no_welcome;
    let mut app = AppState::new(store, preset, show_welcome);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("dashboard closed");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms poll keeps the loop responsive without spinning.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
