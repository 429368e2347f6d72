// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicator math, plus the
// transform entry points that attach derived columns to an `EnrichedSeries`.
// Every transform reads only the base close column, so the transforms can be
// applied independently, in any order, and re-applied idempotently.

pub mod macd;
pub mod rsi;
pub mod sma;

use crate::error::Error;
use crate::series::EnrichedSeries;

/// Default moving-average window (trading periods).
pub const DEFAULT_MA_WINDOW: usize = 20;
/// Default RSI look-back period.
pub const DEFAULT_RSI_PERIOD: usize = 14;
/// Default MACD fast EMA period.
pub const DEFAULT_MACD_FAST: usize = 12;
/// Default MACD slow EMA period.
pub const DEFAULT_MACD_SLOW: usize = 26;
/// Default MACD signal-line EMA period.
pub const DEFAULT_MACD_SIGNAL: usize = 9;

impl EnrichedSeries {
    /// Attach the simple moving-average column (window in trading periods).
    ///
    /// The first `window - 1` entries are `None`.
    pub fn with_moving_average(mut self, window: usize) -> Result<Self, Error> {
        self.moving_average = Some(sma::simple_moving_average(
            self.series().closes(),
            window,
        )?);
        Ok(self)
    }

    /// Attach the RSI column.  The first `period` entries are `None`.
    pub fn with_rsi(mut self, period: usize) -> Result<Self, Error> {
        self.rsi = Some(rsi::rolling_rsi(self.series().closes(), period)?);
        Ok(self)
    }

    /// Attach the MACD and signal columns.  Both are dense (defined at every
    /// index) because the EMA recurrence self-seeds.
    pub fn with_macd(
        mut self,
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Result<Self, Error> {
        let lines = macd::macd_lines(
            self.series().closes(),
            fast_period,
            slow_period,
            signal_period,
        )?;
        self.macd = Some(lines.macd);
        self.macd_signal = Some(lines.signal);
        Ok(self)
    }
}
