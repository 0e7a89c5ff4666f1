/// Data layer: core types, loading, caching and chart statistics.
///
/// Architecture:
/// ```text
///  https://… / path.csv
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  (source, row cap) → Arc<SoilDataset>, miss falls through
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch / open → parse CSV → SoilDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  histogram, time series, hourly counts
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod model;
pub mod stats;
