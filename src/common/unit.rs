//! Unit conversion utilities.
//!
//! Deck geometry is expressed in points, the package stores English Metric
//! Units (EMU), and raster work happens in pixels. All conversions between
//! the three live here.

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;
pub const PTS_PER_INCH: f64 = 72.0;

/// Hundredths of a point, the unit of `a:rPr/@sz`.
pub const CENTIPOINTS_PER_PT: f64 = 100.0;

/// Angle unit of DrawingML (`ST_PositiveFixedAngle`): 60000ths of a degree.
pub const ANGLE_UNITS_PER_DEGREE: f64 = 60_000.0;

/// Percentage unit of DrawingML (`ST_PositiveFixedPercentage`): 1000ths of a percent.
pub const PERCENT_UNITS_PER_WHOLE: f64 = 100_000.0;

/// Convert points to EMU, rounding to the nearest unit.
#[inline]
pub fn pt_to_emu(pt: f64) -> i64 {
    (pt * EMUS_PER_PT as f64).round() as i64
}

#[inline]
pub fn emu_to_pt(emu: i64) -> f64 {
    emu as f64 / EMUS_PER_PT as f64
}

#[inline]
pub fn px_to_emu(px: u32, dpi: u32) -> i64 {
    ((px as f64) * EMUS_PER_INCH as f64 / dpi as f64).round() as i64
}

#[inline]
pub fn px_to_emu_96(px: u32) -> i64 {
    px_to_emu(px, 96)
}

/// Font size in points to the `sz` attribute value.
#[inline]
pub fn pt_to_centipoints(pt: f64) -> u32 {
    (pt.max(0.0) * CENTIPOINTS_PER_PT).round() as u32
}

/// Degrees to DrawingML angle units, normalized into `[0, 360)`.
#[inline]
pub fn degrees_to_angle(degrees: f64) -> i64 {
    let normalized = degrees.rem_euclid(360.0);
    ((normalized * ANGLE_UNITS_PER_DEGREE).round() as i64).min(21_599_999)
}

/// Fraction in `[0, 1]` to DrawingML percentage units.
#[inline]
pub fn fraction_to_percent(fraction: f64) -> i64 {
    (fraction.clamp(0.0, 1.0) * PERCENT_UNITS_PER_WHOLE).round() as i64
}
