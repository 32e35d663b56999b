use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

pub const PRICE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
pub const RENT_COLOR: Color32 = Color32::from_rgb(214, 39, 40);
pub const UNITS_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

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

// ---------------------------------------------------------------------------
// Continuous scale: value → Color32 + bubble radius
// ---------------------------------------------------------------------------

/// Maps a numeric range onto a cool-to-warm hue gradient and a bubble radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousScale {
    min: f64,
    max: f64,
    min_radius: f32,
    max_radius: f32,
}

impl ContinuousScale {
    /// Hue at the bottom of the scale (blue).
    const COLD_HUE: f32 = 240.0;
    /// Hue at the top of the scale (red).
    const HOT_HUE: f32 = 0.0;

    /// Build a scale spanning the given values. An empty input gives a
    /// degenerate `[0, 0]` scale.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let (min, max) = if min.is_finite() { (min, max) } else { (0.0, 0.0) };
        ContinuousScale {
            min,
            max,
            min_radius: 4.0,
            max_radius: 18.0,
        }
    }

    pub fn with_radius(mut self, min_radius: f32, max_radius: f32) -> Self {
        self.min_radius = min_radius;
        self.max_radius = max_radius;
        self
    }

    /// Position of `value` within the scale, clamped to `[0, 1]`. A
    /// degenerate scale puts everything in the middle.
    pub fn normalize(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let t = self.normalize(value);
        let hue = Self::COLD_HUE + (Self::HOT_HUE - Self::COLD_HUE) * t;
        hsl_to_color32(hue, 0.8, 0.5)
    }

    pub fn radius_for(&self, value: f64) -> f32 {
        self.min_radius + (self.max_radius - self.min_radius) * self.normalize(value)
    }

    /// `(label, colour)` pairs for a small legend.
    pub fn legend_entries(&self, steps: usize) -> Vec<(String, Color32)> {
        if steps < 2 {
            return vec![(format!("{:.0}", self.min), self.color_for(self.min))];
        }
        (0..steps)
            .map(|i| {
                let v = self.min + (self.max - self.min) * i as f64 / (steps - 1) as f64;
                (format!("{v:.0}"), self.color_for(v))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert_eq!(generate_palette(0).len(), 0);
        let colors = generate_palette(10);
        assert_eq!(colors.len(), 10);
        assert_ne!(colors[0], colors[5]);
    }

    #[test]
    fn scale_ends_are_cold_and_hot() {
        let scale = ContinuousScale::from_values([1000.0, 2000.0, 4000.0]);
        let cold = scale.color_for(1000.0);
        let hot = scale.color_for(4000.0);
        assert!(cold.b() > cold.r());
        assert!(hot.r() > hot.b());
        assert_eq!(scale.radius_for(1000.0), 4.0);
        assert_eq!(scale.radius_for(4000.0), 18.0);
        assert_eq!(scale.radius_for(9000.0), 18.0);
    }

    #[test]
    fn degenerate_scale_is_centered() {
        let scale = ContinuousScale::from_values([2500.0]);
        assert_eq!(scale.normalize(2500.0), 0.5);
        assert_eq!(ContinuousScale::from_values(std::iter::empty::<f64>()).normalize(10.0), 0.5);
        assert_eq!(scale.legend_entries(3).len(), 3);
    }
}
