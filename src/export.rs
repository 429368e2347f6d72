// =============================================================================
// CSV export — fixed column order, atomic finalize
// =============================================================================
//
// Column order: date, open, high, low, close, volume, then whichever derived
// columns are present, in the order moving_average, rsi, macd, macd_signal.
// A null derived value is an explicit empty field — never a default number,
// so "undefined" can never be re-read as "zero".
//
// The whole file is serialised in memory first, written to a `.tmp` sibling
// and renamed into place, so a failing export never leaves a partial file at
// the destination.
// =============================================================================

use std::path::Path;

use tracing::info;

use crate::error::Error;
use crate::series::EnrichedSeries;

/// Serialise `series` to `path` as UTF-8 CSV, chronological order preserved.
///
/// Derived columns that were never computed are omitted entirely (header and
/// fields); computed-but-null values become empty fields.
///
/// # Errors
/// `Error::Io` when the temporary sibling or the destination cannot be
/// written.
pub fn export_csv(series: &EnrichedSeries, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["date", "open", "high", "low", "close", "volume"];
    if series.moving_average().is_some() {
        header.push("moving_average");
    }
    if series.rsi().is_some() {
        header.push("rsi");
    }
    if series.macd().is_some() {
        header.push("macd");
    }
    if series.macd_signal().is_some() {
        header.push("macd_signal");
    }
    writer
        .write_record(&header)
        .map_err(|e| csv_io_error(path, e))?;

    for (i, point) in series.series().points().iter().enumerate() {
        let mut record: Vec<String> = vec![
            point.date.to_string(),
            optional_field(point.open),
            optional_field(point.high),
            optional_field(point.low),
            point.close.to_string(),
            optional_field(point.volume),
        ];
        if let Some(ma) = series.moving_average() {
            record.push(optional_field(ma[i]));
        }
        if let Some(rsi) = series.rsi() {
            record.push(optional_field(rsi[i]));
        }
        if let Some(macd) = series.macd() {
            record.push(macd[i].to_string());
        }
        if let Some(signal) = series.macd_signal() {
            record.push(signal[i].to_string());
        }
        writer
            .write_record(&record)
            .map_err(|e| csv_io_error(path, e))?;
    }

    let buffer = writer.into_inner().map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;

    // Atomic write: tmp sibling first, then rename over the destination.
    let tmp_path = path.with_extension("csv.tmp");
    if let Err(source) = std::fs::write(&tmp_path, &buffer) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Error::Io {
            path: tmp_path,
            source,
        });
    }
    std::fs::rename(&tmp_path, path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        rows = series.len(),
        columns = header.len(),
        "enriched series exported"
    );
    Ok(())
}

fn optional_field(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

fn csv_io_error(path: &Path, source: csv::Error) -> Error {
    match source.into_kind() {
        csv::ErrorKind::Io(io) => Error::Io {
            path: path.to_path_buf(),
            source: io,
        },
        other => Error::Io {
            path: path.to_path_buf(),
            source: std::io::Error::other(format!("csv serialisation failed: {other:?}")),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{PricePoint, TimeSeries};
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> TimeSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
                    + chrono::Days::new(i as u64),
                open: Some(close - 0.5),
                high: Some(close + 1.0),
                low: Some(close - 1.0),
                close,
                volume: Some(1_000.0 + i as f64),
            })
            .collect();
        TimeSeries::new(points).unwrap()
    }

    fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let header = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        (header, rows)
    }

    #[test]
    fn base_columns_only_when_nothing_is_enriched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.csv");

        let enriched = EnrichedSeries::from(series(&[10.0, 11.0]));
        export_csv(&enriched, &path).unwrap();

        let (header, rows) = read_rows(&path);
        assert_eq!(header, vec!["date", "open", "high", "low", "close", "volume"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "2024-05-01");
        assert_eq!(rows[0][4], "10");
    }

    #[test]
    fn round_trip_preserves_closes_and_null_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enriched.csv");

        let closes = [10.0, 11.0, 9.0, 9.0, 12.0];
        let enriched = EnrichedSeries::from(series(&closes))
            .with_moving_average(3)
            .unwrap()
            .with_rsi(3)
            .unwrap()
            .with_macd(2, 4, 3)
            .unwrap();
        export_csv(&enriched, &path).unwrap();

        let (header, rows) = read_rows(&path);
        assert_eq!(
            header,
            vec![
                "date",
                "open",
                "high",
                "low",
                "close",
                "volume",
                "moving_average",
                "rsi",
                "macd",
                "macd_signal"
            ]
        );
        assert_eq!(rows.len(), closes.len());

        // Closes survive in chronological order.
        let parsed: Vec<f64> = rows.iter().map(|r| r[4].parse().unwrap()).collect();
        assert_eq!(parsed, closes);

        // Null pattern: moving_average empty for the first two rows, rsi for
        // the first three, MACD columns never empty.
        assert_eq!(rows[0][6], "");
        assert_eq!(rows[1][6], "");
        assert!(!rows[2][6].is_empty());
        assert_eq!(rows[2][7], "");
        assert!(!rows[3][7].is_empty());
        for row in &rows {
            assert!(!row[8].is_empty());
            assert!(!row[9].is_empty());
        }

        // The recomputed SMA from re-parsed closes matches the exported one.
        let reparsed = crate::indicators::sma::simple_moving_average(&parsed, 3).unwrap();
        let exported_ma: Vec<Option<f64>> = rows
            .iter()
            .map(|r| {
                if r[6].is_empty() {
                    None
                } else {
                    Some(r[6].parse().unwrap())
                }
            })
            .collect();
        for (a, b) in reparsed.iter().zip(exported_ma.iter()) {
            match (a, b) {
                (None, None) => {}
                (Some(x), Some(y)) => assert!((x - y).abs() < 1e-9),
                other => panic!("null pattern mismatch: {other:?}"),
            }
        }
    }

    #[test]
    fn partially_enriched_series_omits_absent_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rsi_only.csv");

        let enriched = EnrichedSeries::from(series(&[10.0, 11.0, 9.0, 9.0, 12.0]))
            .with_rsi(3)
            .unwrap();
        export_csv(&enriched, &path).unwrap();

        let (header, _) = read_rows(&path);
        assert_eq!(
            header,
            vec!["date", "open", "high", "low", "close", "volume", "rsi"]
        );
    }

    #[test]
    fn unwritable_destination_fails_without_touching_it() {
        let enriched = EnrichedSeries::from(series(&[10.0, 11.0]));
        let path = Path::new("/nonexistent-dir/out.csv");

        let result = export_csv(&enriched, path);
        assert!(matches!(result, Err(Error::Io { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn export_overwrites_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale").unwrap();

        let enriched = EnrichedSeries::from(series(&[10.0, 11.0]));
        export_csv(&enriched, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("date,open,high,low,close,volume"));
        assert!(!path.with_extension("csv.tmp").exists());
    }
}
