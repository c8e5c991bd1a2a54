//! Stockchart TUI - interactive candlestick chart in the terminal.
//!
//! Config is read from `$STOCKCHART_CONFIG`, else `<config dir>/stockchart/config.toml`
//! when present. Logs go to a file only; the terminal belongs to the UI.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use stockchart_core::config::ChartConfig;
use stockchart_core::data::HttpPriceSource;
use stockchart_core::logging::init_logging;
use stockchart_tui::{handle_key, ui, AppState};

fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("STOCKCHART_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|d| d.join("stockchart").join("config.toml"))
        .filter(|p| p.exists())
}

fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockchart")
        .join("tui.log")
}

fn main() -> Result<()> {
    let mut config = ChartConfig::load(config_path().as_deref())?;
    config.log.console = false;
    if config.log.file.is_none() {
        config.log.file = Some(default_log_file());
    }
    init_logging(&config.log)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let source = HttpPriceSource::new(&config)?;
    info!(api = source.base_url(), "starting terminal UI");
    let mut app = AppState::new(&config, Arc::new(source), runtime.handle().clone());

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

    app.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Apply finished loads (non-blocking)
        app.drain_results();

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
