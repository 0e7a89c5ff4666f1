use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::{LoadOptions, Source};
use crate::data::stats::DEFAULT_BINS;
use crate::page::PageRequest;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "soil-viewer.json";

pub const DEFAULT_SOURCE: &str =
    "https://www.ncei.noaa.gov/pub/data/uscrn/products/soil/soilanom01/CRNSSM0101-CO_Boulder_14_W.csv";

pub const DEFAULT_ROW_CAP: usize = 10_000;

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Every field is optional in the file; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// URL or local path of the CSV.
    pub source: String,
    /// `null` reads the whole file.
    pub row_cap: Option<usize>,
    pub histogram_bins: usize,
    pub show_hourly_counts: bool,
    pub http_timeout_secs: u64,
    pub missing_sentinels: Vec<f64>,
    pub window_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let load = LoadOptions::default();
        Self {
            source: DEFAULT_SOURCE.to_string(),
            row_cap: Some(DEFAULT_ROW_CAP),
            histogram_bins: DEFAULT_BINS,
            show_hourly_counts: true,
            http_timeout_secs: load.http_timeout.as_secs(),
            missing_sentinels: load.missing_sentinels,
            window_size: [1200.0, 800.0],
        }
    }
}

impl ViewerConfig {
    /// Parse a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load [`CONFIG_FILE`] from the working directory if it exists.
    /// A broken file is logged and replaced by the defaults.
    pub fn discover() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(cfg) => {
                log::info!("Using configuration from {}", path.display());
                cfg
            }
            Err(e) => {
                log::error!("Ignoring invalid configuration: {e:#}");
                Self::default()
            }
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            http_timeout: Duration::from_secs(self.http_timeout_secs),
            missing_sentinels: self.missing_sentinels.clone(),
        }
    }

    /// The page request this configuration describes.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            source: Source::from(self.source.as_str()),
            row_cap: self.row_cap,
            bins: self.histogram_bins,
            show_hourly: self.show_hourly_counts,
        }
    }
}
