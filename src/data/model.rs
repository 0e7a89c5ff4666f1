use std::fmt;

use chrono::NaiveDateTime;

/// Column holding the observation hour, encoded as `YYYYMMDDHH`.
pub const DATE_COLUMN: &str = "DATE_TIME";

/// Standardized soil moisture anomaly at 5 cm depth, in IQR deviations.
pub const ANOMALY_COLUMN: &str = "SMANOM_5_CM";

/// `chrono` format of the [`DATE_COLUMN`] values.
pub const DATE_FORMAT: &str = "%Y%m%d%H";

// ---------------------------------------------------------------------------
// CellValue – a single raw cell of the CSV
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV reader would infer.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Infer the cell type from its raw text.
    pub fn infer(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// SoilRow – one hourly observation
// ---------------------------------------------------------------------------

/// One row of the soil anomaly CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilRow {
    /// Parsed [`DATE_COLUMN`].
    pub date_time: NaiveDateTime,
    /// Parsed [`ANOMALY_COLUMN`]; `None` when the station reported no value.
    pub anomaly_5cm: Option<f64>,
    /// Every cell of the row in header order, including the two above.
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// SoilDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed dataset. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilDataset {
    /// Column names in file order.
    pub headers: Vec<String>,
    pub rows: Vec<SoilRow>,
}

impl SoilDataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Non-missing anomaly values in row order.
    pub fn anomalies(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(|r| r.anomaly_5cm)
    }

    /// Position of a column in [`SoilDataset::headers`].
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}
