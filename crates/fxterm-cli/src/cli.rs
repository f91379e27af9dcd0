//! CLI argument definitions for fxterm.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `load` | Load historical bars for a currency pair |
//! | `candle` | Load a pair and render a candle chart document |
//! | `currencies` | List currency codes Yahoo Finance quotes |
//! | `check` | Validate one currency code |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! fxterm load EUR/USD --pretty
//! fxterm load gbpjpy --source AlphaVantage --interval 15min --resolution i
//! fxterm candle EUR-USD --ma 20 --ma 50 --output eurusd.json
//! fxterm check chf
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fxterm_core::domain::parse_date;
use fxterm_core::{ForexSource, Resolution, DEFAULT_INTERVAL};
use time::Date;

/// Forex historical data, symbol checks and candle charts.
#[derive(Debug, Parser)]
#[command(name = "fxterm", author, version, about = "Forex historical data CLI")]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log at debug level unless FXTERM_LOG says otherwise.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary for terminals.
    Table,
    /// Single JSON object output.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load historical bars for a currency pair.
    ///
    /// # Examples
    ///
    ///   fxterm load EURUSD
    ///   fxterm load EUR/USD --source Polygon --interval 15min
    Load(LoadArgs),

    /// Load a pair and render a candle chart document.
    ///
    /// # Examples
    ///
    ///   fxterm candle EURUSD --ma 20 --ma 50
    ///   fxterm candle usd-jpy --output chart.json
    Candle(CandleArgs),

    /// List currency codes supported by Yahoo Finance.
    Currencies,

    /// Check that a currency code is supported by Yahoo Finance.
    Check(CheckArgs),
}

#[derive(Debug, Clone, Args)]
pub struct LoadArgs {
    /// Pair such as EURUSD, EUR/USD or eur-usd.
    pub pair: String,

    /// Data source: YahooFinance, AlphaVantage, Oanda or Polygon.
    #[arg(long, default_value_t = String::from(ForexSource::YahooFinance.as_str()))]
    pub source: String,

    /// Generic interval such as 1min, 15min, 1hour or 1day.
    #[arg(long, default_value_t = String::from(DEFAULT_INTERVAL))]
    pub interval: String,

    /// Resolution code: i (intraday), d (daily), w (weekly), m (monthly).
    #[arg(long, default_value = "d", value_parser = parse_resolution)]
    pub resolution: Resolution,

    /// First date to load (YYYY-MM-DD); defaults to one year ago.
    #[arg(long, value_parser = parse_start)]
    pub start: Option<Date>,

    /// Suppress unsupported-interval diagnostics.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CandleArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Moving-average window; repeat for several overlays.
    #[arg(long = "ma", value_name = "WINDOW")]
    pub ma: Vec<u32>,

    /// Write the chart document to this file instead of embedding it in the output.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Three-letter currency code, any case.
    pub code: String,
}

fn parse_resolution(value: &str) -> Result<Resolution, String> {
    value.parse().map_err(|error: fxterm_core::ValidationError| error.to_string())
}

fn parse_start(value: &str) -> Result<Date, String> {
    parse_date(value).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_defaults() {
        let cli = Cli::try_parse_from(["fxterm", "load", "EURUSD"]).expect("must parse");
        let Command::Load(args) = cli.command else {
            panic!("expected load");
        };
        assert_eq!(args.source, "YahooFinance");
        assert_eq!(args.interval, "1day");
        assert_eq!(args.resolution, Resolution::Daily);
        assert!(args.start.is_none());
    }

    #[test]
    fn candle_collects_repeated_windows() {
        let cli = Cli::try_parse_from([
            "fxterm", "candle", "EUR/USD", "--ma", "20", "--ma", "50", "--resolution", "i",
        ])
        .expect("must parse");
        let Command::Candle(args) = cli.command else {
            panic!("expected candle");
        };
        assert_eq!(args.ma, vec![20, 50]);
        assert_eq!(args.load.resolution, Resolution::Intraday);
    }

    #[test]
    fn rejects_unknown_resolution() {
        let result = Cli::try_parse_from(["fxterm", "load", "EURUSD", "--resolution", "x"]);
        assert!(result.is_err());
    }
}
