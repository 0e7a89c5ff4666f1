use chrono::{DateTime, NaiveDateTime};
use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};

use crate::color::ChartColors;
use crate::data::stats::Histogram;

const PLOT_HEIGHT: f32 = 320.0;
const ANOMALY_AXIS: &str = "Soil Moisture Anomaly (IQR Deviations)";

// ---------------------------------------------------------------------------
// Histogram of the anomaly column
// ---------------------------------------------------------------------------

/// Histogram of soil moisture anomaly at 5 cm depth.
pub fn histogram_plot(ui: &mut Ui, histogram: &Histogram, colors: &ChartColors) {
    ui.strong("Histogram of Soil Moisture Anomaly at 5 cm Depth");

    let width = histogram.bin_width();
    let bars: Vec<Bar> = histogram
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new(histogram.bin_center(i), count as f64)
                .width(width)
                .fill(colors.histogram)
                .stroke(Stroke::new(1.0, Color32::BLACK))
        })
        .collect();

    Plot::new("anomaly_histogram")
        .height(PLOT_HEIGHT)
        .x_axis_label(ANOMALY_AXIS)
        .y_axis_label("Frequency")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("SMANOM_5_CM"));
        });
}

// ---------------------------------------------------------------------------
// Anomaly over time
// ---------------------------------------------------------------------------

/// Anomaly against observation time; x is seconds since the Unix epoch.
pub fn time_series_plot(ui: &mut Ui, series: &[(NaiveDateTime, f64)], colors: &ChartColors) {
    ui.strong("Soil Moisture Anomaly at 5 cm Depth Over Time");

    let points: Vec<[f64; 2]> = series
        .iter()
        .map(|(ts, v)| [ts.and_utc().timestamp() as f64, *v])
        .collect();

    Plot::new("anomaly_over_time")
        .height(PLOT_HEIGHT)
        .x_axis_label("Date Time")
        .y_axis_label(ANOMALY_AXIS)
        .x_axis_formatter(|mark: GridMark, _range| format_epoch(mark.value, "%Y-%m-%d"))
        .label_formatter(|_name, value| {
            format!("{}\n{:.3}", format_epoch(value.x, "%Y-%m-%d %H:00"), value.y)
        })
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(colors.series.gamma_multiply(0.7))
                    .width(1.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .color(colors.series)
                    .radius(2.0),
            );
        });
}

fn format_epoch(secs: f64, fmt: &str) -> String {
    DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format(fmt).to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Samples per hour of day
// ---------------------------------------------------------------------------

/// Bar chart of the number of rows per hour of day.
pub fn hourly_plot(ui: &mut Ui, counts: &[usize; 24], colors: &ChartColors) {
    ui.strong("Number of Samples per Hour");

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(hour, &n)| {
            Bar::new(hour as f64, n as f64)
                .width(0.8)
                .name(format!("{hour:02}:00"))
                .fill(colors.hours[hour])
        })
        .collect();

    Plot::new("hourly_counts")
        .height(PLOT_HEIGHT * 0.75)
        .x_axis_label("Hour of Day")
        .y_axis_label("Samples")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_labels_are_utc_dates() {
        assert_eq!(format_epoch(0.0, "%Y-%m-%d"), "1970-01-01");
        assert_eq!(format_epoch(1_700_000_000.0, "%Y-%m-%d %H:00"), "2023-11-14 22:00");
    }
}
