use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// Fixed accents for the anomaly charts.
pub struct ChartColors {
    pub histogram: Color32,
    pub series: Color32,
    /// One colour per hour of day, midnight first.
    pub hours: Vec<Color32>,
}

impl Default for ChartColors {
    fn default() -> Self {
        Self {
            histogram: hsl_to_color32(210.0, 0.6, 0.55).gamma_multiply(0.7),
            series: hsl_to_color32(25.0, 0.85, 0.55),
            hours: generate_palette(24),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colours() {
        let p = generate_palette(24);
        assert_eq!(p.len(), 24);
        assert_ne!(p[0], p[12]);
        assert!(generate_palette(0).is_empty());
    }
}
