use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::time::Duration;

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::NaiveDateTime;

use super::error::DataLoadError;
use super::model::{
    CellValue, SoilDataset, SoilRow, ANOMALY_COLUMN, DATE_COLUMN, DATE_FORMAT,
};

// ---------------------------------------------------------------------------
// Source locator
// ---------------------------------------------------------------------------

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl From<&str> for Source {
    /// `http://` and `https://` locators are URLs, anything else is a path.
    fn from(locator: &str) -> Self {
        let trimmed = locator.trim();
        if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
            Source::Url(trimmed.to_string())
        } else {
            Source::Path(PathBuf::from(trimmed))
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Knobs that apply to every read, independent of the source.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub http_timeout: Duration,
    /// Anomaly values the station uses to mean "not measured".
    pub missing_sentinels: Vec<f64>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(30),
            missing_sentinels: vec![-99.0, -9999.0],
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read and parse `source`, keeping at most `row_cap` data rows.
///
/// Single attempt: any network, file or parse problem is returned as is.
pub fn load_source(
    source: &Source,
    row_cap: Option<usize>,
    options: &LoadOptions,
) -> Result<SoilDataset, DataLoadError> {
    let parsed = match source {
        Source::Url(url) => {
            let response = fetch_url(url, options.http_timeout)?;
            parse_csv(response, row_cap, &options.missing_sentinels)
        }
        Source::Path(path) => {
            let file = File::open(path).map_err(|source| DataLoadError::Io {
                path: path.clone(),
                source,
            })?;
            parse_csv(BufReader::new(file), row_cap, &options.missing_sentinels)
        }
    };
    parsed.map_err(|e| e.attributed_to(source))
}

/// Issue the GET and hand back the body as a reader, so a row cap stops the
/// download early instead of buffering the whole file.
fn fetch_url(url: &str, timeout: Duration) -> Result<reqwest::blocking::Response, DataLoadError> {
    let network = |source| DataLoadError::Network {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(network)?;

    let response = client.get(url).send().map_err(network)?;
    let status = response.status();
    if !status.is_success() {
        return Err(DataLoadError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one observation per line.
/// `DATE_TIME` and `SMANOM_5_CM` are required; all other columns are carried
/// through as raw cells.
pub fn parse_csv<R: Read>(
    input: R,
    row_cap: Option<usize>,
    missing_sentinels: &[f64],
) -> Result<SoilDataset, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .ok_or(DataLoadError::MissingColumn(DATE_COLUMN))?;
    let anomaly_idx = headers
        .iter()
        .position(|h| h == ANOMALY_COLUMN)
        .ok_or(DataLoadError::MissingColumn(ANOMALY_COLUMN))?;

    let mut rows = Vec::new();
    let mut missing = 0usize;

    for (i, result) in reader.records().take(row_cap.unwrap_or(usize::MAX)).enumerate() {
        let record = result?;
        let row = i + 1;

        let raw_date = record.get(date_idx).unwrap_or("");
        let date_time = parse_date_time(raw_date).ok_or_else(|| DataLoadError::Timestamp {
            row,
            value: raw_date.to_string(),
        })?;

        let raw_anomaly = record.get(anomaly_idx).unwrap_or("");
        let anomaly_5cm = parse_anomaly(raw_anomaly, missing_sentinels).ok_or_else(|| {
            DataLoadError::Anomaly {
                row,
                value: raw_anomaly.to_string(),
            }
        })?;
        if anomaly_5cm.is_none() {
            missing += 1;
        }

        rows.push(SoilRow {
            date_time,
            anomaly_5cm,
            cells: record.iter().map(CellValue::infer).collect(),
        });
    }

    if missing > 0 {
        log::warn!("{missing} of {} rows have no {ANOMALY_COLUMN} value", rows.len());
    }

    Ok(SoilDataset { headers, rows })
}

/// Parse a `YYYYMMDDHH` value. Minutes are implied to be zero.
pub fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, raw.trim(), StrftimeItems::new(DATE_FORMAT)).ok()?;
    parsed.set_minute(0).ok()?;
    parsed.to_naive_datetime_with_offset(0).ok()
}

/// `Some(None)` for an empty, `NaN` or sentinel cell, `None` when the cell is
/// not a finite number.
fn parse_anomaly(raw: &str, missing_sentinels: &[f64]) -> Option<Option<f64>> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(None);
    }
    let value = s.parse::<f64>().ok()?;
    if value.is_nan() {
        return Some(None);
    }
    if value.is_infinite() {
        return None;
    }
    if missing_sentinels.iter().any(|m| (m - value).abs() < 1e-9) {
        return Some(None);
    }
    Some(Some(value))
}
