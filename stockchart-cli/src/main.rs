//! Stockchart CLI: render charts from the stock API.
//!
//! Commands:
//! - `render`: fetch a symbol and write a standalone Plotly.js HTML page
//! - `figure`: fetch a symbol and print the figure as JSON
//! - `health`: probe the API's health endpoint

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stockchart_core::config::ChartConfig;
use stockchart_core::data::HttpPriceSource;
use stockchart_core::logging::init_logging;
use stockchart_core::render::{ChartPort, ContainerContent, FigurePort, HtmlPage, PlotlyPort};
use stockchart_core::{ChartUpdater, RenderOutcome};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "stockchart",
    version,
    about = "Stockchart CLI: candlestick charts from the stock API"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL (e.g., http://localhost:8000/api). Overrides config and env.
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Request timeout in seconds; 0 disables it.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch chart data and write a standalone HTML chart.
    Render {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Period: 1mo, 3mo, 1y, 5y, max. Defaults to the configured period.
        #[arg(long)]
        period: Option<String>,

        /// Output HTML file.
        #[arg(long, default_value = "chart.html")]
        out: PathBuf,
    },
    /// Fetch chart data and print the figure JSON to stdout.
    Figure {
        /// Ticker symbol (e.g., AAPL).
        symbol: String,

        /// Period: 1mo, 3mo, 1y, 5y, max. Defaults to the configured period.
        #[arg(long)]
        period: Option<String>,
    },
    /// Probe the API health endpoint.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.common)?;
    init_logging(&config.log)?;

    let ok = match cli.command {
        Commands::Render {
            symbol,
            period,
            out,
        } => run_render(&config, &symbol, period.as_deref(), &out).await?,
        Commands::Figure { symbol, period } => {
            run_figure(&config, &symbol, period.as_deref()).await?
        }
        Commands::Health => run_health(&config).await?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(args: &CommonArgs) -> Result<ChartConfig> {
    let mut config = ChartConfig::load(args.config.as_deref())?;
    if let Some(url) = &args.api_base_url {
        config.api_base_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

/// Page with the configured chart container and, when given, a period control.
fn build_page(config: &ChartConfig, period: Option<&str>) -> Arc<HtmlPage> {
    let page = HtmlPage::new().with_container(&config.container_id);
    let page = match period {
        Some(p) => page.with_period(&config.period_select_id, p),
        None => page,
    };
    Arc::new(page)
}

async fn update(
    config: &ChartConfig,
    page: Arc<HtmlPage>,
    port: Arc<dyn ChartPort>,
    symbol: &str,
) -> Result<RenderOutcome> {
    let source = HttpPriceSource::new(config)?;
    let updater = ChartUpdater::new(config, Arc::new(source), port, page);
    Ok(updater.update_chart(symbol).await)
}

async fn run_render(
    config: &ChartConfig,
    symbol: &str,
    period: Option<&str>,
    out: &Path,
) -> Result<bool> {
    let page = build_page(config, period);
    let outcome = update(config, page.clone(), Arc::new(PlotlyPort), symbol).await?;

    let title = format!("{symbol} Stock Chart");
    std::fs::write(out, page.render_document(&title))
        .with_context(|| format!("failed to write {}", out.display()))?;
    info!(path = %out.display(), "chart page written");

    print_outcome(symbol, &outcome);
    println!("Page written to: {}", out.display());
    Ok(!outcome.is_failure())
}

async fn run_figure(config: &ChartConfig, symbol: &str, period: Option<&str>) -> Result<bool> {
    let page = build_page(config, period);
    let outcome = update(config, page.clone(), Arc::new(FigurePort), symbol).await?;

    let Some(container) = page.html_container(&config.container_id) else {
        bail!("container '{}' missing from page", config.container_id);
    };
    match container.content() {
        ContainerContent::Figure(figure) => {
            println!("{}", serde_json::to_string_pretty(&figure)?);
            Ok(true)
        }
        ContainerContent::Notice(notice) => {
            eprintln!("{notice}");
            Ok(!outcome.is_failure())
        }
        _ => {
            print_outcome(symbol, &outcome);
            Ok(!outcome.is_failure())
        }
    }
}

async fn run_health(config: &ChartConfig) -> Result<bool> {
    let source = HttpPriceSource::new(config)?;
    match source.health().await {
        Ok(health) => {
            println!("API:     {}", source.base_url());
            println!("Status:  {}", health.status);
            if !health.message.is_empty() {
                println!("Message: {}", health.message);
            }
            Ok(health.is_healthy())
        }
        Err(e) => {
            eprintln!("Health check failed for {}: {e}", source.base_url());
            Ok(false)
        }
    }
}

fn print_outcome(symbol: &str, outcome: &RenderOutcome) {
    match outcome {
        RenderOutcome::Rendered { traces } => {
            println!("Rendered {symbol} ({traces} series)");
        }
        RenderOutcome::NoData => println!("No chart data available for {symbol}"),
        RenderOutcome::MissingColumns(missing) => {
            println!("Chart data for {symbol} is missing: {}", missing.join(", "));
        }
        RenderOutcome::Failed(message) => {
            eprintln!("Failed to load chart data for {symbol}: {message}");
        }
        RenderOutcome::NoContainer => eprintln!("No chart container on the page"),
        RenderOutcome::Cancelled => eprintln!("Chart update cancelled"),
    }
}
