//! Writes `sample_soil.csv`, a synthetic hourly USCRN soil anomaly file that
//! the viewer can open offline.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Timelike};

const STATION: &str = "94075";
const DAYS: i64 = 60;
const MISSING: f64 = -99.0;

/// Seeded xoshiro256** generator, so every run writes the same soil file.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`; also decides which hours go missing.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Sensor noise around `mean` (Box-Muller).
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Hourly climatology for a layer: `(median, iqr)` of volumetric water content.
fn climatology(hour: u32, depth_cm: u32) -> (f64, f64) {
    let phase = 2.0 * std::f64::consts::PI * hour as f64 / 24.0;
    let damping = 5.0 / depth_cm as f64;
    (0.22 + 0.01 * damping * phase.sin(), 0.04)
}

/// One layer's reading and its anomaly, or the missing sentinel for both.
fn layer(rng: &mut SimpleRng, hour: u32, depth_cm: u32, drying: f64) -> (f64, f64) {
    if rng.next_f64() < 0.01 {
        return (MISSING, MISSING);
    }
    let (median, iqr) = climatology(hour, depth_cm);
    let smvwc = (median - drying + rng.gauss(0.0, 0.01)).max(0.0);
    (smvwc, (smvwc - median) / iqr)
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2023, 6, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;

    let output_path = "sample_soil.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "WBANNO",
        "DATE_TIME",
        "SMVWC_5_CM",
        "SMANOM_5_CM",
        "SMVWC_10_CM",
        "SMANOM_10_CM",
    ])?;

    let hours = DAYS * 24;
    for i in 0..hours {
        let ts = start + Duration::hours(i);
        let hour = ts.hour();
        // Slow drying, reset by a storm halfway through.
        let drying = (i % (hours / 2)) as f64 * 0.00005;

        let (vwc5, anom5) = layer(&mut rng, hour, 5, drying);
        let (vwc10, anom10) = layer(&mut rng, hour, 10, drying * 0.6);

        writer.write_record([
            STATION.to_string(),
            ts.format("%Y%m%d%H").to_string(),
            format!("{vwc5:.3}"),
            format!("{anom5:.3}"),
            format!("{vwc10:.3}"),
            format!("{anom10:.3}"),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {hours} hourly rows for station {STATION} to {output_path}");
    Ok(())
}
