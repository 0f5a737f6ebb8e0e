//! CSV candle source.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use trading_core::error::DataError;
use trading_core::types::{Bar, BarSeries};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "timestamp",
        alias = "Timestamp",
        alias = "time",
        alias = "open_time"
    )]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Candles stored one bar per row.
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Read every row, sorted oldest first.
    ///
    /// Two rows with the same timestamp are rejected.
    pub fn load(&self, pair: &str) -> Result<BarSeries, DataError> {
        let file = File::open(&self.path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut bars = Vec::new();
        for (row, result) in reader.deserialize().enumerate() {
            let record: CsvRecord =
                result.map_err(|e| DataError::ParseError(format!("row {}: {}", row + 1, e)))?;
            let timestamp = parse_timestamp(&record.date)?;
            bars.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        bars.sort_by_key(|b| b.timestamp);
        if let Some(pair_of_rows) = bars.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
            return Err(DataError::ParseError(format!(
                "Duplicate timestamp: {}",
                pair_of_rows[0].datetime()
            )));
        }

        debug!(path = %self.path.display(), rows = bars.len(), "CSV parsed");
        let series = BarSeries::from_bars(pair, bars)?;
        info!(pair, bars = series.len(), "Loaded candles");
        Ok(series)
    }
}

/// Parse a timestamp in one of the supported formats, returning Unix millis.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Some(dt) = NaiveDate::parse_from_str(date_str, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    // Unix timestamp, milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2024-01-15").unwrap(), 1_705_276_800_000);
        assert_eq!(parse_timestamp("2024-01-15 10:30:00").unwrap(), 1_705_314_600_000);
        assert_eq!(parse_timestamp("2024-01-15T10:30:00Z").unwrap(), 1_705_314_600_000);
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000);
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000);
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_load_sorts_rows() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-02,2,3,1,2.5,10\n\
             2024-01-01,1,2,0.5,1.5,20\n",
        );

        let series = CsvDataSource::new(file.path()).unwrap().load("BTC/USDT").unwrap();

        assert_eq!(series.pair, "BTC/USDT");
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_header_aliases_and_missing_volume() {
        let file = write_csv(
            "Date,Open,High,Low,Close\n\
             2024-01-01,1,2,0.5,1.5\n",
        );

        let series = CsvDataSource::new(file.path()).unwrap().load("ETH/USDT").unwrap();
        assert_eq!(series.volumes(), vec![0.0]);
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             1704067200,1,2,0.5,1.5,20\n\
             1704067200,1,2,0.5,1.6,20\n",
        );

        let result = CsvDataSource::new(file.path()).unwrap().load("BTC/USDT");
        assert!(matches!(result, Err(DataError::ParseError(msg)) if msg.contains("Duplicate")));
    }

    #[test]
    fn test_bad_number_reports_row() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-01,1,2,0.5,abc,20\n",
        );

        let result = CsvDataSource::new(file.path()).unwrap().load("BTC/USDT");
        assert!(matches!(result, Err(DataError::ParseError(msg)) if msg.starts_with("row 1")));
    }

    #[test]
    fn test_empty_and_missing_files() {
        let file = write_csv("timestamp,open,high,low,close,volume\n");
        assert!(matches!(
            CsvDataSource::new(file.path()).unwrap().load("BTC/USDT"),
            Err(DataError::NoDataAvailable)
        ));

        assert!(matches!(
            CsvDataSource::new("/nonexistent/candles.csv"),
            Err(DataError::NoDataAvailable)
        ));
    }

    #[test]
    fn test_load_csv_entry_point() {
        let file = write_csv(
            "timestamp,open,high,low,close,volume\n\
             2024-01-01 00:00:00,1,2,0.5,1.5,20\n\
             2024-01-01 00:01:00,1.5,2,1,1.8,25\n",
        );

        let series = crate::load_csv(file.path(), "BTC/USDT").unwrap();
        assert_eq!(series.last().map(|b| b.close), Some(1.8));
    }

    #[test]
    fn test_file_removed_after_open_is_io_error() {
        let file = write_csv("timestamp,open,high,low,close,volume\n");
        let source = CsvDataSource::new(file.path()).unwrap();
        file.close().unwrap();

        assert!(matches!(source.load("BTC/USDT"), Err(DataError::Io(_))));
    }
}
