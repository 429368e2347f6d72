// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// The SMA at index i is the arithmetic mean of the closes over the window
// [i - window + 1, i].  The first `window - 1` indices have no complete
// window behind them and therefore no value — they stay `None` rather than
// being back-filled with a number that would pollute downstream consumers.
// =============================================================================

use crate::error::Error;

/// Compute the SMA column for `closes`, aligned index-for-index with the
/// input.  Entries `0..window-1` are `None`.
///
/// # Errors
/// `Error::InvalidParameter` when `window` is zero or exceeds the series
/// length.
pub fn simple_moving_average(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>, Error> {
    if window == 0 || window > closes.len() {
        return Err(Error::invalid(format!(
            "moving-average window {window} must be in 1..={} (series length)",
            closes.len()
        )));
    }

    let mut column: Vec<Option<f64>> = vec![None; window - 1];
    column.extend(
        closes
            .windows(window)
            .map(|w| Some(w.iter().sum::<f64>() / window as f64)),
    );

    debug_assert_eq!(column.len(), closes.len());
    Ok(column)
}
