use chrono::{NaiveDateTime, Timelike};

use super::model::SoilDataset;

/// Bin count used when none is configured.
pub const DEFAULT_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into exactly `bins` buckets (at least one).
    ///
    /// Every bin is half-open except the last, which also holds `max`.
    /// A degenerate range `v..v` is widened to `v - 0.5 .. v + 0.5`; an empty
    /// input gives `0..1` with all-zero counts.
    pub fn new(values: impl IntoIterator<Item = f64>, bins: usize) -> Self {
        let bins = bins.max(1);
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();

        let (mut min, mut max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if values.is_empty() {
            min = 0.0;
            max = 1.0;
        } else if min == max {
            min -= 0.5;
            max += 0.5;
        }

        // Halved so spans wider than f64::MAX stay finite.
        let half_span = max / 2.0 - min / 2.0;
        let mut counts = vec![0usize; bins];
        for v in values {
            let idx = ((v / 2.0 - min / 2.0) / half_span * bins as f64) as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Histogram { min, max, counts }
    }

    pub fn bin_width(&self) -> f64 {
        (self.max / 2.0 - self.min / 2.0) / self.counts.len() as f64 * 2.0
    }

    /// Centre of bin `i`, for drawing bars.
    pub fn bin_center(&self, i: usize) -> f64 {
        let offset = (i as f64 + 0.5) * self.bin_width() / 2.0;
        self.min + offset + offset
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// `(timestamp, anomaly)` pairs in time order, missing values skipped.
pub fn time_series(dataset: &SoilDataset) -> Vec<(NaiveDateTime, f64)> {
    let mut points: Vec<(NaiveDateTime, f64)> = dataset
        .rows
        .iter()
        .filter_map(|r| r.anomaly_5cm.map(|v| (r.date_time, v)))
        .collect();
    points.sort_by_key(|(ts, _)| *ts);
    points
}

// ---------------------------------------------------------------------------
// Hour-of-day sampling counts
// ---------------------------------------------------------------------------

/// Number of rows per hour of day; bucket `h` counts rows stamped `HH == h`.
pub fn hourly_counts(dataset: &SoilDataset) -> [usize; 24] {
    let mut counts = [0usize; 24];
    for row in &dataset.rows {
        counts[row.date_time.hour() as usize] += 1;
    }
    counts
}
