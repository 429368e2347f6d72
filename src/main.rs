// =============================================================================
// quotelens — Main Entry Point
// =============================================================================
//
// Pipeline: fetch daily history -> attach indicator columns -> log the
// summary findings -> export the enriched series to CSV.  Every stage is a
// deterministic function of its input, so any failure aborts the run before
// the export file is touched.
// =============================================================================

mod error;
mod export;
mod fetch;
mod indicators;
mod report;
mod series;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::fetch::{DateSelection, HistoryPeriod, QuoteClient};
use crate::indicators::{
    DEFAULT_MACD_FAST, DEFAULT_MACD_SIGNAL, DEFAULT_MACD_SLOW, DEFAULT_MA_WINDOW,
    DEFAULT_RSI_PERIOD,
};
use crate::report::FluctuationScan;
use crate::series::EnrichedSeries;

/// Fetch daily stock history, compute SMA / RSI / MACD columns, report the
/// average close and strong fluctuations, and export everything to CSV.
#[derive(Debug, Parser)]
#[command(name = "quotelens", version)]
struct Cli {
    /// Ticker symbol, e.g. AAPL
    #[arg(short, long)]
    ticker: String,

    /// Named look-back period: 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max
    #[arg(long, conflicts_with_all = ["start", "end"])]
    period: Option<HistoryPeriod>,

    /// Explicit range start (YYYY-MM-DD); requires --end
    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,

    /// Explicit range end (YYYY-MM-DD); requires --start
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,

    /// Fluctuation alert threshold, in percent
    #[arg(long, default_value_t = 5.0)]
    threshold: f64,

    /// Moving-average window, in trading periods
    #[arg(long, default_value_t = DEFAULT_MA_WINDOW)]
    ma_window: usize,

    /// RSI look-back period
    #[arg(long, default_value_t = DEFAULT_RSI_PERIOD)]
    rsi_period: usize,

    /// Export file path (default: <TICKER>_<selection>.csv)
    #[arg(long)]
    out: Option<PathBuf>,
}

impl Cli {
    /// Build the date-selection sum type from the mutually exclusive flags.
    fn selection(&self) -> DateSelection {
        match (self.period, self.start, self.end) {
            (_, Some(start), Some(end)) => DateSelection::Range { start, end },
            (Some(period), _, _) => DateSelection::Period(period),
            // No flags at all: default to one month, matching the tool's own
            // usage example.
            _ => DateSelection::Period(HistoryPeriod::OneMonth),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let ticker = cli.ticker.trim().to_ascii_uppercase();
    let selection = cli.selection();

    info!(ticker = %ticker, selection = %selection, "fetching daily history");

    let client = QuoteClient::new();
    let series = client
        .fetch_daily(&ticker, &selection)
        .await
        .context("failed to fetch price history")?;

    let enriched = EnrichedSeries::from(series)
        .with_moving_average(cli.ma_window)
        .context("moving-average computation failed")?
        .with_rsi(cli.rsi_period)
        .context("rsi computation failed")?
        .with_macd(DEFAULT_MACD_FAST, DEFAULT_MACD_SLOW, DEFAULT_MACD_SIGNAL)
        .context("macd computation failed")?;

    let average = report::average_close(enriched.series());
    info!(
        ticker = %ticker,
        average_close = format!("{average:.2}"),
        points = enriched.len(),
        "average closing price"
    );

    match report::detect_fluctuations(enriched.series(), cli.threshold)
        .context("fluctuation scan failed")?
    {
        FluctuationScan::TooShort => {
            warn!("series too short to evaluate fluctuations (need at least 2 points)");
        }
        FluctuationScan::Quiet => {
            info!(threshold_pct = cli.threshold, "no fluctuations above threshold");
        }
        FluctuationScan::Events(events) => {
            for event in &events {
                warn!(
                    date = %event.date,
                    direction = %event.direction,
                    change_pct = format!("{:+.2}", event.change_pct),
                    "strong fluctuation"
                );
            }
            info!(
                count = events.len(),
                threshold_pct = cli.threshold,
                "fluctuation scan complete"
            );
        }
    }

    let out = cli
        .out
        .unwrap_or_else(|| PathBuf::from(format!("{ticker}_{selection}.csv")));
    export::export_csv(&enriched, &out)
        .with_context(|| format!("failed to export series to {}", out.display()))?;

    Ok(())
}
