//! CLI argument definitions for tickview.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `analyze` | Fetch daily prices, attach a moving average and render the window |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--log-format` | `compact` | Log format on stderr (pretty, compact, json) |
//!
//! # Examples
//!
//! ```bash
//! # Terminal dashboard with the default 20-day average
//! TICKVIEW_ALPHAVANTAGE_API_KEY=demo tickview analyze IBM
//!
//! # Machine-readable output over the last 60 sessions
//! tickview --format json --pretty analyze IBM --sma-period 50 --window 60
//!
//! # Dashboard listing only the last 10 sessions
//! tickview analyze IBM --rows 10
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickview_core::OutputSize;

use crate::logging::LogFormat;
use crate::output::TABLE_ROWS;

pub const API_KEY_ENV: &str = "TICKVIEW_ALPHAVANTAGE_API_KEY";
pub const BASE_URL_ENV: &str = "TICKVIEW_ALPHAVANTAGE_BASE_URL";

/// Daily price dashboard for one stock symbol.
///
/// Pulls the Alpha Vantage daily series, drops unusable rows, attaches a
/// simple moving average of the close and renders the most recent sessions.
#[derive(Debug, Parser)]
#[command(name = "tickview", author, version, about = "Daily price and moving average viewer")]
pub struct Cli {
    /// Output format for results.
    ///
    /// - table: summary, price chart, volume strip and recent rows
    /// - json: single envelope with chart data and summary
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log line format on stderr. Verbosity follows `RUST_LOG`.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Terminal dashboard.
    Table,
    /// Single JSON envelope.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, clean and chart the daily series of one symbol.
    ///
    /// # Examples
    ///
    ///   tickview analyze IBM
    ///   tickview analyze MSFT --sma-period 50 --output-size compact
    Analyze(AnalyzeArgs),
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Ticker symbol (e.g., IBM, BRK-B, TSCO.LON).
    pub symbol: String,

    /// Alpha Vantage API key.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// History requested from the provider: compact (~100 sessions) or full.
    #[arg(long, default_value_t = OutputSize::Full)]
    pub output_size: OutputSize,

    /// Moving average period in sessions (5 to 100).
    #[arg(long, default_value_t = 20)]
    pub sma_period: usize,

    /// Number of trailing sessions to render.
    #[arg(long, default_value_t = 180, value_parser = clap::value_parser!(u32).range(1..))]
    pub window: u32,

    /// Provider request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: u64,

    /// Number of recent sessions listed under the chart (0 hides the table).
    #[arg(long, default_value_t = TABLE_ROWS)]
    pub rows: usize,

    /// Provider base URL, for proxies and local test servers.
    #[arg(long, env = BASE_URL_ENV)]
    pub base_url: Option<String>,
}
