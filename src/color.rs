use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Hues start at blue so a single curve keeps the classic log colour.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (210.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Curve name → Color32
// ---------------------------------------------------------------------------

/// Assigns each curve option its own line colour.
#[derive(Debug, Clone, Default)]
pub struct CurvePalette {
    mapping: BTreeMap<String, Color32>,
}

impl CurvePalette {
    pub fn new(curves: &[String]) -> Self {
        let mapping = curves
            .iter()
            .cloned()
            .zip(generate_palette(curves.len()))
            .collect();
        CurvePalette { mapping }
    }

    pub fn color_for(&self, curve: &str) -> Color32 {
        self.mapping
            .get(curve)
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = generate_palette(4);
        assert_eq!(colours.len(), 4);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_curve_gets_fallback() {
        let p = CurvePalette::new(&["Gamma".to_string(), "Res".to_string()]);
        assert_ne!(p.color_for("Gamma"), p.color_for("Res"));
        assert_eq!(p.color_for("Sonic"), Color32::LIGHT_BLUE);
    }
}
