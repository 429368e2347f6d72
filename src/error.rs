// =============================================================================
// Error kinds shared across the quotelens pipeline
// =============================================================================
//
// Every failure the engine can produce is deterministic for a given input, so
// none of these are retried — callers abort with a clear message instead of
// substituting defaults (a null moving-average silently becoming 0.0 would
// corrupt both the fluctuation scan and the export).

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for series construction, indicator math, reporting,
/// fetching and export.
#[derive(Debug, Error)]
pub enum Error {
    /// The operation needs at least one data point and got none.
    #[error("series is empty — nothing to compute")]
    EmptySeries,

    /// A caller-supplied parameter is out of contract (zero/oversized window,
    /// non-positive threshold, inverted date range, blank ticker, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Filesystem failure while writing the export.
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data source failed: transport error, bad HTTP status, or a
    /// response that is malformed / missing mandatory closes.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

impl Error {
    /// Shorthand for the common `InvalidParameter` construction sites.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
