// =============================================================================
// Price series data model
// =============================================================================
//
// `TimeSeries` is the shared, immutable input of every downstream stage:
// construction validates once (non-empty, strictly ascending dates) and no
// record can be mutated afterwards, so the windowed math never observes a
// half-updated series.
//
// `EnrichedSeries` carries the base series plus the derived indicator
// columns, each aligned index-for-index with the points.  The columns are
// written exclusively by the transforms in `crate::indicators` — nothing
// else in the crate touches them.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One record per trading day.  `close` is mandatory; the remaining fields
/// depend on what the source granularity provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Ordered, non-empty sequence of price points, strictly increasing by date.
///
/// The closing prices are extracted once at construction so the indicator
/// kernels can work on a plain `&[f64]`.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    points: Vec<PricePoint>,
    closes: Vec<f64>,
}

impl TimeSeries {
    /// Validate and take ownership of `points`.
    ///
    /// # Errors
    /// - `Error::EmptySeries` when `points` is empty.
    /// - `Error::InvalidParameter` when dates are not strictly ascending
    ///   (duplicates included).
    pub fn new(points: Vec<PricePoint>) -> Result<Self, Error> {
        if points.is_empty() {
            return Err(Error::EmptySeries);
        }

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(Error::invalid(format!(
                    "dates must be strictly ascending: {} is followed by {}",
                    pair[0].date, pair[1].date
                )));
            }
        }

        let closes = points.iter().map(|p| p.close).collect();
        Ok(Self { points, closes })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false` — an empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Random access by index.
    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// The close column, aligned with `points()`.
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}

/// A `TimeSeries` plus the derived indicator columns.
///
/// Columns are `None` until the corresponding transform has run.  SMA and RSI
/// columns are per-index nullable (the initial window has no value); the
/// MACD columns are dense because the EMA recurrence self-seeds from the
/// first close.
#[derive(Debug, Clone)]
pub struct EnrichedSeries {
    series: TimeSeries,
    pub(crate) moving_average: Option<Vec<Option<f64>>>,
    pub(crate) rsi: Option<Vec<Option<f64>>>,
    pub(crate) macd: Option<Vec<f64>>,
    pub(crate) macd_signal: Option<Vec<f64>>,
}

impl EnrichedSeries {
    pub fn new(series: TimeSeries) -> Self {
        Self {
            series,
            moving_average: None,
            rsi: None,
            macd: None,
            macd_signal: None,
        }
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn moving_average(&self) -> Option<&[Option<f64>]> {
        self.moving_average.as_deref()
    }

    pub fn rsi(&self) -> Option<&[Option<f64>]> {
        self.rsi.as_deref()
    }

    pub fn macd(&self) -> Option<&[f64]> {
        self.macd.as_deref()
    }

    pub fn macd_signal(&self) -> Option<&[f64]> {
        self.macd_signal.as_deref()
    }
}

impl From<TimeSeries> for EnrichedSeries {
    fn from(series: TimeSeries) -> Self {
        Self::new(series)
    }
}
