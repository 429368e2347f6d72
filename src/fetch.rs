// =============================================================================
// Daily-bar data source — Stooq CSV endpoint
// =============================================================================
//
// Stooq serves historical daily bars as plain CSV with no API key:
//   https://stooq.com/q/d/l/?s=<symbol>&d1=<yyyymmdd>&d2=<yyyymmdd>&i=d
//
// The HTTP round-trip lives in `QuoteClient`; everything after the response
// body is the pure `parse_daily_csv`, so the parsing contract (mandatory
// close, ascending dates) is unit-tested without a network.
// =============================================================================

use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Error;
use crate::series::{PricePoint, TimeSeries};

/// Default request timeout for the data source.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Fixed history start used for `HistoryPeriod::Max`.
const MAX_HISTORY_START: (i32, u32, u32) = (1900, 1, 1);

// =============================================================================
// Date selection
// =============================================================================

/// Named look-back periods accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPeriod {
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl HistoryPeriod {
    /// Resolve the period to a start date relative to `today`.
    pub fn start_from(self, today: NaiveDate) -> NaiveDate {
        let fallback = NaiveDate::MIN;
        match self {
            Self::FiveDays => today.checked_sub_days(Days::new(5)).unwrap_or(fallback),
            Self::OneMonth => today.checked_sub_months(Months::new(1)).unwrap_or(fallback),
            Self::ThreeMonths => today.checked_sub_months(Months::new(3)).unwrap_or(fallback),
            Self::SixMonths => today.checked_sub_months(Months::new(6)).unwrap_or(fallback),
            Self::OneYear => today.checked_sub_months(Months::new(12)).unwrap_or(fallback),
            Self::TwoYears => today.checked_sub_months(Months::new(24)).unwrap_or(fallback),
            Self::FiveYears => today.checked_sub_months(Months::new(60)).unwrap_or(fallback),
            Self::TenYears => today.checked_sub_months(Months::new(120)).unwrap_or(fallback),
            Self::YearToDate => {
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(fallback)
            }
            Self::Max => {
                let (y, m, d) = MAX_HISTORY_START;
                NaiveDate::from_ymd_opt(y, m, d).unwrap_or(fallback)
            }
        }
    }
}

impl FromStr for HistoryPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "5d" => Ok(Self::FiveDays),
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            "10y" => Ok(Self::TenYears),
            "ytd" => Ok(Self::YearToDate),
            "max" => Ok(Self::Max),
            other => Err(Error::invalid(format!(
                "unknown period '{other}' (expected one of 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)"
            ))),
        }
    }
}

impl std::fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let token = match self {
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        };
        write!(f, "{token}")
    }
}

/// How the caller picked the date window: a named look-back period or an
/// explicit start/end range.  The two are mutually exclusive by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    Period(HistoryPeriod),
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateSelection {
    /// Resolve to a concrete `(start, end)` window.
    ///
    /// # Errors
    /// `Error::InvalidParameter` when an explicit range has `start > end`.
    pub fn resolve(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), Error> {
        match *self {
            Self::Period(period) => Ok((period.start_from(today), today)),
            Self::Range { start, end } => {
                if start > end {
                    return Err(Error::invalid(format!(
                        "start date {start} is after end date {end}"
                    )));
                }
                Ok((start, end))
            }
        }
    }
}

impl std::fmt::Display for DateSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Period(period) => write!(f, "{period}"),
            Self::Range { start, end } => write!(f, "{start}_to_{end}"),
        }
    }
}

// =============================================================================
// QuoteClient
// =============================================================================

/// HTTP client for the Stooq daily-bar endpoint.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteClient {
    /// Create a client against the public Stooq endpoint.  The base URL can
    /// be overridden via `QUOTELENS_BASE_URL` (fixtures in tests, mirrors).
    pub fn new() -> Self {
        let base_url = std::env::var("QUOTELENS_BASE_URL")
            .unwrap_or_else(|_| "https://stooq.com".to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Fetch the daily history for `ticker` over `selection` and validate it
    /// into a `TimeSeries`.
    ///
    /// # Errors
    /// - `Error::InvalidParameter` — blank ticker or inverted date range.
    /// - `Error::Fetch` — transport failure, non-success status, or a
    ///   response with no usable rows / missing closes.
    pub async fn fetch_daily(
        &self,
        ticker: &str,
        selection: &DateSelection,
    ) -> Result<TimeSeries, Error> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(Error::invalid("ticker symbol must be non-empty"));
        }

        let today = chrono::Utc::now().date_naive();
        let (start, end) = selection.resolve(today)?;

        let url = format!(
            "{}/q/d/l/?s={}&d1={}&d2={}&i=d",
            self.base_url,
            ticker.to_ascii_lowercase(),
            start.format("%Y%m%d"),
            end.format("%Y%m%d"),
        );
        debug!(ticker, %start, %end, "requesting daily history");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("request to data source failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "data source returned HTTP {status} for {ticker}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read response body: {e}")))?;

        let series = parse_daily_csv(&body)?;
        info!(
            ticker,
            points = series.len(),
            from = %series.first_date(),
            to = %series.last_date(),
            "daily history loaded"
        );
        Ok(series)
    }
}

// =============================================================================
// Response parsing
// =============================================================================

/// One raw CSV row as Stooq serves it.
#[derive(Debug, Deserialize)]
struct DailyRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Open", default)]
    open: Option<f64>,
    #[serde(rename = "High", default)]
    high: Option<f64>,
    #[serde(rename = "Low", default)]
    low: Option<f64>,
    #[serde(rename = "Close", default)]
    close: Option<f64>,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
}

/// Parse a daily-bar CSV body into a validated `TimeSeries`.
///
/// # Errors
/// - `Error::Fetch` — unparsable rows, no data rows at all, or a row with a
///   missing close (the source contract makes close mandatory).
/// - `Error::InvalidParameter` — rows present but dates not strictly
///   ascending (surfaced by `TimeSeries::new`).
pub fn parse_daily_csv(body: &str) -> Result<TimeSeries, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut points = Vec::new();
    for (row_index, record) in reader.deserialize::<DailyRow>().enumerate() {
        let row = record.map_err(|e| {
            Error::Fetch(format!("malformed data row {}: {e}", row_index + 1))
        })?;

        let close = row.close.ok_or_else(|| {
            Error::Fetch(format!(
                "row {} ({}) is missing its close price",
                row_index + 1,
                row.date
            ))
        })?;

        points.push(PricePoint {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close,
            volume: row.volume,
        });
    }

    if points.is_empty() {
        return Err(Error::Fetch(
            "data source returned no rows for the requested window".to_string(),
        ));
    }

    TimeSeries::new(points)
}
