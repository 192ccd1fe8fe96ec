//! Command-line arguments for tickplot.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the web form and chart server |
//! | `chart` | Render one chart without the web form |
//! | `symbols` | List the symbols accepted by the form |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--symbols` | `stocks.csv` | Symbol list CSV |
//! | `--static-dir` | `static` | Directory the chart is written to and served from |
//! | `--timeout-ms` | `10000` | Alpha Vantage request timeout in ms |
//! | `--fallback-to-latest` | `false` | Clamp a range end past the data to the latest date |
//! | `--format` | `text` | Output format (text, json) |
//!
//! # Examples
//!
//! ```bash
//! tickplot serve --listen 127.0.0.1:8080
//! tickplot chart IBM --series daily --start 2024-01-01 --end 2024-01-31
//! tickplot symbols --format json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickplot_core::http_client::DEFAULT_TIMEOUT_MS;
use tickplot_core::symbols::DEFAULT_SYMBOLS_FILE;

/// Stock price charts from Alpha Vantage time series.
#[derive(Debug, Parser)]
#[command(name = "tickplot", author, version, about = "Stock price charts from Alpha Vantage")]
pub struct Cli {
    /// CSV file with a `Symbol` column.
    #[arg(long, global = true, default_value = DEFAULT_SYMBOLS_FILE)]
    pub symbols: PathBuf,

    /// Directory the chart is written to.
    #[arg(long, global = true, default_value = "static")]
    pub static_dir: PathBuf,

    /// Alpha Vantage request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Extend a range whose end is past the newest observation to that observation.
    #[arg(long, global = true, default_value_t = false)]
    pub fallback_to_latest: bool,

    /// Output format for command results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 🌐 Serve the chart form over HTTP.
    Serve(ServeArgs),
    /// 📈 Render one chart to an SVG file.
    Chart(ChartArgs),
    /// 📋 List the accepted symbols.
    Symbols,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub listen: String,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Ticker symbol, e.g. IBM.
    pub symbol: String,

    /// Time series: daily, weekly, monthly, intraday or the TIME_SERIES_* name.
    #[arg(long, default_value = "TIME_SERIES_DAILY")]
    pub series: String,

    /// Chart type: line or bar.
    #[arg(long, default_value = "line")]
    pub chart: String,

    /// First date, YYYY-MM-DD.
    #[arg(long)]
    pub start: String,

    /// Last date, YYYY-MM-DD.
    #[arg(long)]
    pub end: String,

    /// Write the SVG here instead of `<static-dir>/stock_price_chart.svg`.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
