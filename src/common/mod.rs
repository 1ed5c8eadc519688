//! Units, geometry, colors and XML helpers shared by every layer.

pub mod color;
pub mod geometry;
pub mod unit;
pub mod xml;

pub use color::RgbColor;
pub use geometry::{
    EmuRect, FitMode, FitPlacement, Focus, Margin, Position, Rect, Size, clamp_radii, fit_box,
};
