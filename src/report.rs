// =============================================================================
// Summary reporting — average close and fluctuation detection
// =============================================================================
//
// A fluctuation event is a period-over-period closing-price change whose
// absolute percentage meets or exceeds a caller-supplied threshold.  Every
// qualifying step is enumerated, not just the first; a series too short to
// form even one adjacent pair is reported distinctly from a quiet series.
// =============================================================================

use chrono::NaiveDate;

use crate::error::Error;
use crate::series::TimeSeries;

/// Direction of a period-over-period price move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// One adjacent-close move that met the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct FluctuationEvent {
    /// Index of the later point of the pair.
    pub index: usize,
    pub date: NaiveDate,
    pub direction: Direction,
    /// Signed percentage change from the previous close.
    pub change_pct: f64,
}

impl FluctuationEvent {
    pub fn magnitude(&self) -> f64 {
        self.change_pct.abs()
    }
}

/// Outcome of a fluctuation scan.
///
/// `TooShort` (fewer than two points, nothing to compare) is deliberately
/// distinct from `Quiet` (pairs were evaluated, none crossed the threshold).
#[derive(Debug, Clone, PartialEq)]
pub enum FluctuationScan {
    TooShort,
    Quiet,
    Events(Vec<FluctuationEvent>),
}

/// Arithmetic mean of a slice.
///
/// # Errors
/// `Error::EmptySeries` on empty input — never a division-by-zero NaN.
pub fn mean(values: &[f64]) -> Result<f64, Error> {
    if values.is_empty() {
        return Err(Error::EmptySeries);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Arithmetic mean of the closing prices across the entire series.
///
/// A `TimeSeries` is non-empty by construction, so this cannot fail.
pub fn average_close(series: &TimeSeries) -> f64 {
    let closes = series.closes();
    closes.iter().sum::<f64>() / closes.len() as f64
}

/// Scan adjacent closes for moves of at least `threshold_pct` percent
/// (absolute).
///
/// A previous close of exactly zero has no defined relative change; such a
/// pair is treated as a 0% move and never flagged.
///
/// # Errors
/// `Error::InvalidParameter` when `threshold_pct` is not a positive finite
/// number.
pub fn detect_fluctuations(
    series: &TimeSeries,
    threshold_pct: f64,
) -> Result<FluctuationScan, Error> {
    if !threshold_pct.is_finite() || threshold_pct <= 0.0 {
        return Err(Error::invalid(format!(
            "fluctuation threshold {threshold_pct} must be a positive percentage"
        )));
    }

    if series.len() < 2 {
        return Ok(FluctuationScan::TooShort);
    }

    let closes = series.closes();
    let mut events = Vec::new();
    for i in 1..closes.len() {
        let prev = closes[i - 1];
        let pct = if prev == 0.0 {
            0.0
        } else {
            (closes[i] - prev) / prev * 100.0
        };

        if pct.abs() >= threshold_pct {
            events.push(FluctuationEvent {
                index: i,
                date: series.points()[i].date,
                direction: if pct > 0.0 {
                    Direction::Up
                } else {
                    Direction::Down
                },
                change_pct: pct,
            });
        }
    }

    if events.is_empty() {
        Ok(FluctuationScan::Quiet)
    } else {
        Ok(FluctuationScan::Events(events))
    }
}
