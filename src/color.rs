use std::collections::BTreeSet;

use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::QcStatus;

/// Fixed colours of the QC status legend.
pub fn status_color(status: QcStatus) -> &'static str {
    match status {
        QcStatus::Normal => "#4c78a8",
        QcStatus::Contaminated => "#e45756",
        QcStatus::NoProtein => "#f58518",
        QcStatus::ContaminatedNoProtein => "#b279a2",
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct `#rrggbb` colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            format!(
                "#{:02x}{:02x}{:02x}",
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → colour
// ---------------------------------------------------------------------------

/// Maps the distinct labels of a chart field to distinct colours, in legend
/// order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub field: String,
    mapping: Vec<(String, String)>,
}

impl ColorMap {
    /// Build a colour map from generated hues, one per distinct label.
    pub fn new(field: &str, labels: &BTreeSet<String>) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels.iter().cloned().zip(palette).collect();
        ColorMap {
            field: field.to_string(),
            mapping,
        }
    }

    /// The QC status legend with its fixed colours.
    pub fn status() -> Self {
        let mapping = QcStatus::ALL
            .iter()
            .map(|s| (s.label().to_string(), status_color(*s).to_string()))
            .collect();
        ColorMap {
            field: "status".to_string(),
            mapping,
        }
    }

    /// Legend entries (label → colour).
    pub fn legend_entries(&self) -> Vec<(String, String)> {
        self.mapping.clone()
    }
}
