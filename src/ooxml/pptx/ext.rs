//! Document extensions: effects written below the level of the shape
//! builders.
//!
//! Shadows, run strikethrough and corner rounding have no dedicated builder
//! on [`MutableShape`](super::writer::MutableShape). They are applied here
//! directly on the property nodes so the rest of the renderer never touches
//! raw markup.

use thiserror::Error;

use super::writer::shape::{Adjustment, OuterShadow, ShapeProperties};
use super::writer::text::{RunProperties, StrikeKind};

/// An adjustment was requested on a preset geometry that has no such guide.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("preset geometry {preset} has no {effect} adjustment")]
pub struct UnsupportedEffect {
    pub preset: &'static str,
    pub effect: &'static str,
}

/// Replace every shadow on the shape with `shadow`.
///
/// `None` writes an invisible shadow so that the theme's effect style
/// cannot add one. Re-applying always leaves exactly one shadow.
pub fn apply_shadow(props: &mut ShapeProperties, shadow: Option<OuterShadow>) {
    props.effects.shadows.clear();
    props
        .effects
        .shadows
        .push(shadow.unwrap_or_else(OuterShadow::none));
}

/// Set the run's `strike` attribute: `Some(true)` strikes, `Some(false)`
/// explicitly disables, `None` leaves it inherited.
pub fn apply_strike(props: &mut RunProperties, strike: Option<bool>) {
    props.strike = strike.map(|on| {
        if on {
            StrikeKind::Single
        } else {
            StrikeKind::NoStrike
        }
    });
}

/// Guide that controls corner rounding for presets that have one.
fn corner_guide(preset: &str) -> Option<&'static str> {
    match preset {
        "roundRect" => Some("adj"),
        "round2SameRect" => Some("adj1"),
        _ => None,
    }
}

/// Round the shape's corners through its preset adjustment.
///
/// `value` is the guide value in 1000ths of a percent of the shorter side.
pub fn apply_corner_radius(
    props: &mut ShapeProperties,
    value: i64,
) -> Result<(), UnsupportedEffect> {
    let name = corner_guide(props.geometry.preset).ok_or(UnsupportedEffect {
        preset: props.geometry.preset,
        effect: "border radius",
    })?;
    let adjustments = &mut props.geometry.adjustments;
    adjustments.retain(|adj| adj.name != name);
    adjustments.push(Adjustment { name, value });
    Ok(())
}
