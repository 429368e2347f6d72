// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
// EMA recurrence, self-seeded from the first value:
//   k      = 2 / (period + 1)
//   EMA[0] = x[0]
//   EMA[i] = x[i] * k + EMA[i-1] * (1 - k)
//
// MACD[i]   = EMA_fast[i] - EMA_slow[i]          (defaults 12 / 26)
// signal[i] = EMA of the MACD series, period 9, seeded with MACD[0]
//
// Because the recurrence self-seeds, every column here is dense — defined at
// every index from the first point.  This is deliberately asymmetric with the
// null-padded SMA/RSI columns and covered by tests.
// =============================================================================

use crate::error::Error;

/// MACD line and its signal line, both aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Exponential moving average over `values`, seeded with `values[0]`.
///
/// # Errors
/// - `Error::EmptySeries` when `values` is empty.
/// - `Error::InvalidParameter` when `period` is zero.
pub fn ema(values: &[f64], period: usize) -> Result<Vec<f64>, Error> {
    if values.is_empty() {
        return Err(Error::EmptySeries);
    }
    if period == 0 {
        return Err(Error::invalid("ema period must be positive"));
    }

    let k = 2.0 / (period as f64 + 1.0);

    let mut out = Vec::with_capacity(values.len());
    let mut prev = values[0];
    out.push(prev);
    for &value in &values[1..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }

    Ok(out)
}

/// Compute the MACD and signal columns for `closes`.
///
/// # Errors
/// - `Error::EmptySeries` when `closes` is empty.
/// - `Error::InvalidParameter` when any period is zero.
pub fn macd_lines(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MacdLines, Error> {
    let fast = ema(closes, fast_period)?;
    let slow = ema(closes, slow_period)?;

    let macd: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal = ema(&macd, signal_period)?;

    Ok(MacdLines { macd, signal })
}
