// =============================================================================
// Relative Strength Index (RSI) — simple rolling averages
// =============================================================================
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split each delta into gain = max(delta, 0) and loss = max(-delta, 0).
// Step 3 — Take the simple rolling mean of gains and losses over `period`
//          (the same windowing rule as the SMA — no Wilder smoothing here).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Since the first delta only exists at index 1, the rolling window is first
// complete at index `period`; the first `period` indices stay `None`.
//
// Zero-division policy:
//   avg_loss == 0, avg_gain > 0  =>  RSI = 100  (price only rose)
//   avg_loss == 0, avg_gain == 0 =>  RSI = 50   (no movement — neutral)
// =============================================================================

use crate::error::Error;

/// Compute the RSI column for `closes`, aligned index-for-index with the
/// input.  Entries `0..period` are `None`; every produced value lies in
/// `[0, 100]`.
///
/// # Errors
/// `Error::InvalidParameter` when `period` is zero or exceeds the series
/// length.
pub fn rolling_rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, Error> {
    if period == 0 || period > closes.len() {
        return Err(Error::invalid(format!(
            "rsi period {period} must be in 1..={} (series length)",
            closes.len()
        )));
    }

    let gains: Vec<f64> = closes.windows(2).map(|w| (w[1] - w[0]).max(0.0)).collect();
    let losses: Vec<f64> = closes.windows(2).map(|w| (w[0] - w[1]).max(0.0)).collect();

    let mut column: Vec<Option<f64>> = vec![None; closes.len()];
    for i in period..closes.len() {
        // Deltas i-period .. i-1 cover the close window ending at index i.
        let avg_gain = gains[i - period..i].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[i - period..i].iter().sum::<f64>() / period as f64;
        column[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(column)
}

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If both averages are zero, RSI is 50.0 (no movement at all — neutral).
/// - If average loss is zero (only gains), RSI is 100.0.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_zero_is_rejected() {
        let result = rolling_rsi(&[1.0, 2.0, 3.0], 0);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn period_larger_than_series_is_rejected() {
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert!(matches!(
            rolling_rsi(&closes, 14),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn initial_window_is_null() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let column = rolling_rsi(&closes, 14).unwrap();
        assert_eq!(column.len(), 20);
        for value in &column[..14] {
            assert!(value.is_none());
        }
        for value in &column[14..] {
            assert!(value.is_some());
        }
    }

    #[test]
    fn all_gains_pin_rsi_at_100() {
        // Strictly ascending closes: the rolling average loss is exactly 0.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let column = rolling_rsi(&closes, 14).unwrap();
        for value in column.iter().flatten() {
            assert!((value - 100.0).abs() < 1e-10, "expected 100.0, got {value}");
        }
    }

    #[test]
    fn all_losses_pin_rsi_at_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let column = rolling_rsi(&closes, 14).unwrap();
        for value in column.iter().flatten() {
            assert!(value.abs() < 1e-10, "expected 0.0, got {value}");
        }
    }

    #[test]
    fn flat_market_is_neutral_50() {
        let closes = vec![100.0; 30];
        let column = rolling_rsi(&closes, 14).unwrap();
        for value in column.iter().flatten() {
            assert!((value - 50.0).abs() < 1e-10, "expected 50.0, got {value}");
        }
    }

    #[test]
    fn rsi_stays_in_range() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let column = rolling_rsi(&closes, 14).unwrap();
        for value in column.iter().flatten() {
            assert!((0.0..=100.0).contains(value), "RSI {value} out of range");
        }
    }

    #[test]
    fn rolling_mean_not_wilder_smoothing() {
        // With simple rolling means, the value at index `period` is fully
        // determined by the first `period` deltas: one gain of 3 and four
        // zero deltas => avg_gain = 0.6, avg_loss = 0 => RSI = 100.
        let closes = [10.0, 13.0, 13.0, 13.0, 13.0, 13.0];
        let column = rolling_rsi(&closes, 5).unwrap();
        assert!((column[5].unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn period_equal_to_length_yields_all_null() {
        let closes = [10.0, 11.0, 12.0];
        let column = rolling_rsi(&closes, 3).unwrap();
        assert!(column.iter().all(Option::is_none));
    }

    #[test]
    fn idempotent_under_reapplication() {
        let closes: Vec<f64> = (1..=25).map(|x| ((x * 7) % 13) as f64 + 40.0).collect();
        let first = rolling_rsi(&closes, 14).unwrap();
        let second = rolling_rsi(&closes, 14).unwrap();
        assert_eq!(first, second);
    }
}
