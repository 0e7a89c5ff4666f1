//! Page handler: one call per page view, from request parameters to
//! everything the UI draws. No egui types in here.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::data::cache::Loader;
use crate::data::loader::Source;
use crate::data::model::{SoilDataset, DATE_COLUMN};
use crate::data::stats::{hourly_counts, time_series, Histogram};

pub const TITLE: &str = "NOAA Dataset Analysis";
pub const HEADER: &str = "Standardized Soil Moisture";

pub const DESCRIPTION: &str = "This standardized soil moisture product is derived using the soil \
moisture climatology from the SMC01 product series (described in a separate README file) in the \
following manner. The soil moisture volumetric water content (SMVWC) is reported as observed for \
the layer in question. The soil moisture anomaly (SMANOM) is derived by subtracting the MEDIAN \
from the SMVWC value and dividing the difference by the interquartile range (IQR) for that hour:";

pub const FORMULA: &str = "SMANOM = (SMVWC - MEDIAN) / (IQR)";

pub const SUCCESS_MESSAGE: &str = "Data loaded successfully!";

/// Timestamp rendering in the table.
const TABLE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub source: Source,
    pub row_cap: Option<usize>,
    pub bins: usize,
    pub show_hourly: bool,
}

#[derive(Debug, Clone)]
pub struct Page {
    pub title: &'static str,
    pub header: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
    pub body: PageBody,
}

#[derive(Debug, Clone)]
pub enum PageBody {
    Loaded(Presentation),
    /// User-visible load failure; nothing else is rendered.
    Failed(String),
}

/// Raw table with every cell already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Presentation {
    pub source: Source,
    pub dataset: Arc<SoilDataset>,
    pub table: TableView,
    pub histogram: Histogram,
    pub series: Vec<(NaiveDateTime, f64)>,
    pub hourly: Option<[usize; 24]>,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// Load the requested dataset (possibly from the cache) and build the page.
pub fn render_page(loader: &mut Loader, request: &PageRequest) -> Page {
    let body = match loader.load(&request.source, request.row_cap) {
        Ok(dataset) => PageBody::Loaded(present(request, dataset)),
        Err(e) => {
            log::error!("Failed to load {}: {e}", request.source);
            PageBody::Failed(format!("An error occurred while loading the data: {e}"))
        }
    };

    Page {
        title: TITLE,
        header: HEADER,
        description: DESCRIPTION,
        formula: FORMULA,
        body,
    }
}

/// Derive the table and chart data from a loaded dataset.
pub fn present(request: &PageRequest, dataset: Arc<SoilDataset>) -> Presentation {
    Presentation {
        source: request.source.clone(),
        table: table_view(&dataset),
        histogram: Histogram::new(dataset.anomalies(), request.bins),
        series: time_series(&dataset),
        hourly: request.show_hourly.then(|| hourly_counts(&dataset)),
        dataset,
    }
}

/// Format every cell; the date column is shown as a calendar timestamp.
pub fn table_view(dataset: &SoilDataset) -> TableView {
    let date_idx = dataset.column_index(DATE_COLUMN);
    let rows = dataset
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if Some(i) == date_idx {
                        row.date_time.format(TABLE_DATE_FORMAT).to_string()
                    } else {
                        cell.to_string()
                    }
                })
                .collect()
        })
        .collect();

    TableView {
        headers: dataset.headers.clone(),
        rows,
    }
}

impl Page {
    pub fn is_loaded(&self) -> bool {
        matches!(self.body, PageBody::Loaded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request(source: Source) -> PageRequest {
        PageRequest {
            source,
            row_cap: None,
            bins: 30,
            show_hourly: true,
        }
    }

    fn write_day(dir: &TempDir) -> Source {
        let mut out = String::from("WBANNO,DATE_TIME,SMANOM_5_CM\n");
        for h in 0..24 {
            out.push_str(&format!("94075,20230615{h:02},{}\n", h as f64 / 24.0 - 0.5));
        }
        let path = dir.path().join("day.csv");
        fs::write(&path, out).unwrap();
        Source::from(path)
    }

    #[test]
    fn loaded_page_has_table_and_charts() {
        let dir = TempDir::new().unwrap();
        let mut loader = Loader::default();
        let source = write_day(&dir);
        let page = render_page(&mut loader, &request(source.clone()));

        assert_eq!(page.title, TITLE);
        let PageBody::Loaded(p) = page.body else {
            panic!("expected a loaded page");
        };
        assert_eq!(p.source, source);
        assert!(!p.dataset.is_empty());
        assert_eq!(p.table.rows.len(), 24);
        assert_eq!(p.table.rows[5][1], "2023-06-15 05:00:00");
        assert_eq!(p.table.rows[5][0], "94075");
        assert_eq!(p.histogram.counts.len(), 30);
        assert_eq!(p.series.len(), 24);
        assert_eq!(p.hourly.map(|h| h.iter().sum::<usize>()), Some(24));
    }

    #[test]
    fn hourly_chart_is_optional() {
        let dir = TempDir::new().unwrap();
        let mut loader = Loader::default();
        let req = PageRequest {
            show_hourly: false,
            ..request(write_day(&dir))
        };
        let PageBody::Loaded(p) = render_page(&mut loader, &req).body else {
            panic!("expected a loaded page");
        };
        assert!(p.hourly.is_none());
    }

    #[test]
    fn missing_file_renders_an_error_and_no_charts() {
        let dir = TempDir::new().unwrap();
        let mut loader = Loader::default();
        let page = render_page(&mut loader, &request(Source::from(dir.path().join("gone.csv"))));

        assert!(!page.is_loaded());
        match page.body {
            PageBody::Failed(msg) => {
                assert!(msg.starts_with("An error occurred while loading the data"));
                assert!(msg.contains("gone.csv"));
            }
            PageBody::Loaded(_) => unreachable!(),
        }
    }

    #[test]
    fn repeated_views_share_the_cached_dataset() {
        let dir = TempDir::new().unwrap();
        let mut loader = Loader::default();
        let req = request(write_day(&dir));

        let PageBody::Loaded(a) = render_page(&mut loader, &req).body else {
            panic!("expected a loaded page");
        };
        let PageBody::Loaded(b) = render_page(&mut loader, &req).body else {
            panic!("expected a loaded page");
        };
        assert!(Arc::ptr_eq(&a.dataset, &b.dataset));
        assert_eq!(a.table, b.table);
    }
}
