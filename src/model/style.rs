use serde::{Deserialize, Serialize};

use crate::common::RgbColor;

/// Solid fill. Where a fill is optional, `None` means no fill at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: RgbColor,
    #[serde(default)]
    pub opacity: Option<f64>,
}

impl Fill {
    pub fn solid(color: RgbColor) -> Self {
        Self {
            color,
            opacity: None,
        }
    }

    /// Opacity clamped into `[0, 1]`, defaulting to opaque.
    pub fn opacity(&self) -> f64 {
        clamp_unit(self.opacity.unwrap_or(1.0))
    }
}

/// Outline. A thickness of zero disables the line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: RgbColor,
    #[serde(default)]
    pub thickness: f64,
    #[serde(default)]
    pub opacity: Option<f64>,
}

impl Stroke {
    pub fn opacity(&self) -> f64 {
        clamp_unit(self.opacity.unwrap_or(1.0))
    }

    pub fn is_visible(&self) -> bool {
        self.thickness > 0.0
    }
}

/// Outer drop shadow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Blur radius.
    #[serde(default)]
    pub radius: f64,
    /// Distance between the shape and its shadow.
    #[serde(default)]
    pub offset: f64,
    /// Direction in degrees, clockwise from the positive x axis.
    #[serde(default)]
    pub angle: f64,
    pub color: RgbColor,
    #[serde(default = "default_shadow_opacity")]
    pub opacity: f64,
}

fn default_shadow_opacity() -> f64 {
    1.0
}

/// Clamp into `[0, 1]`; NaN becomes 1.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 1.0 } else { value.clamp(0.0, 1.0) }
}
