//! Renderers for autoshapes, text boxes and connectors.

use crate::common::unit::{degrees_to_angle, fraction_to_percent, pt_to_emu};
use crate::common::{Position, RgbColor};
use crate::error::ShapeError;
use crate::markup::MarkupParser;
use crate::model::{
    AutoShape, Connector, ConnectorKind, Fill, Geometry, Shadow, Stroke, TextBox, clamp_unit,
};
use crate::ooxml::pptx::ext::{apply_corner_radius, apply_shadow};
use crate::ooxml::pptx::{
    FillProperties, LineProperties, MutableSlide, OuterShadow, ShapeProperties, SolidColor,
};

use super::text::{body_properties, build_text_body};

/// Extra width given to text boxes so their last word does not wrap early.
const TEXT_BOX_SLACK_PT: f64 = 2.0;

/// Upper bound of the corner guide, as a fraction of the shorter side.
const MAX_CORNER_FRACTION: f64 = 0.5;

pub(crate) fn preset_name(geometry: Geometry) -> &'static str {
    match geometry {
        Geometry::Rectangle => "rect",
        Geometry::RoundedRectangle => "roundRect",
        Geometry::TopRoundedRectangle => "round2SameRect",
        Geometry::Ellipse => "ellipse",
        Geometry::Triangle => "triangle",
        Geometry::RightTriangle => "rtTriangle",
        Geometry::Diamond => "diamond",
        Geometry::Parallelogram => "parallelogram",
        Geometry::Trapezoid => "trapezoid",
        Geometry::Pentagon => "pentagon",
        Geometry::Hexagon => "hexagon",
        Geometry::Octagon => "octagon",
        Geometry::Chevron => "chevron",
        Geometry::HomePlate => "homePlate",
        Geometry::Star5 => "star5",
        Geometry::Heart => "heart",
        Geometry::Plus => "plus",
        Geometry::RightArrow => "rightArrow",
        Geometry::LeftArrow => "leftArrow",
        Geometry::UpArrow => "upArrow",
        Geometry::DownArrow => "downArrow",
    }
}

fn connector_preset(kind: ConnectorKind) -> &'static str {
    match kind {
        ConnectorKind::Straight => "line",
        ConnectorKind::Elbow => "bentConnector3",
        ConnectorKind::Curved => "curvedConnector3",
    }
}

/// Alpha is only written for translucent colors.
pub(crate) fn solid_color(color: RgbColor, opacity: f64) -> SolidColor {
    if opacity < 1.0 {
        SolidColor::with_alpha(color, fraction_to_percent(opacity))
    } else {
        SolidColor::opaque(color)
    }
}

pub(crate) fn fill_properties(fill: Option<&Fill>) -> FillProperties {
    match fill {
        Some(fill) => FillProperties::Solid(solid_color(fill.color, fill.opacity())),
        None => FillProperties::NoFill,
    }
}

fn line_properties(stroke: Option<&Stroke>) -> LineProperties {
    match stroke {
        Some(stroke) if stroke.is_visible() => LineProperties::Solid {
            width: pt_to_emu(stroke.thickness),
            color: solid_color(stroke.color, stroke.opacity()),
        },
        _ => LineProperties::NoLine,
    }
}

fn outer_shadow(shadow: &Shadow) -> OuterShadow {
    OuterShadow {
        blur_radius: pt_to_emu(shadow.radius.max(0.0)),
        distance: pt_to_emu(shadow.offset.max(0.0)),
        direction: degrees_to_angle(shadow.angle),
        color: SolidColor::with_alpha(shadow.color, fraction_to_percent(shadow.opacity)),
    }
}

/// Corner guide value for `radius` on a box of the given size.
pub(crate) fn corner_adjustment(radius: f64, position: &Position) -> i64 {
    let shorter = position.width.min(position.height);
    if shorter.is_nan() || shorter <= 0.0 {
        return 0;
    }
    let fraction = (radius / shorter).clamp(0.0, MAX_CORNER_FRACTION);
    fraction_to_percent(fraction)
}

fn shape_properties(
    position: &Position,
    preset: &'static str,
    rotation: Option<f64>,
) -> ShapeProperties {
    let mut props = ShapeProperties::new(position.to_emu(), preset);
    props.rotation = rotation.map(degrees_to_angle).unwrap_or(0);
    props
}

/// Add an autoshape.
///
/// A border radius the geometry cannot express is reported as
/// [`ShapeError::UnsupportedAdjustment`] after the shape has been added.
pub(crate) fn render_autoshape(
    slide: &mut MutableSlide,
    shape: &AutoShape,
    markup: &dyn MarkupParser,
) -> Result<(), ShapeError> {
    let position = shape.position.inset(shape.margin.as_ref());
    let mut props = shape_properties(&position, preset_name(shape.geometry), shape.rotation);
    props.fill = Some(fill_properties(shape.fill.as_ref()));
    props.line = Some(line_properties(shape.stroke.as_ref()));
    apply_shadow(&mut props, shape.shadow.as_ref().map(outer_shadow));

    let unsupported = match shape.border_radius {
        Some(radius) if radius > 0.0 => {
            apply_corner_radius(&mut props, corner_adjustment(radius, &position)).err()
        },
        _ => None,
    };

    let body = body_properties(shape.margin.as_ref(), shape.text_wrap);
    let text = build_text_body(&shape.paragraphs, body, markup);
    slide.add_autoshape(props, text);

    match unsupported {
        Some(e) => Err(ShapeError::UnsupportedAdjustment {
            shape: e.preset.to_string(),
            effect: e.effect.to_string(),
        }),
        None => Ok(()),
    }
}

pub(crate) fn render_text_box(
    slide: &mut MutableSlide,
    text_box: &TextBox,
    markup: &dyn MarkupParser,
) -> Result<(), ShapeError> {
    let mut position = text_box.position;
    position.width += TEXT_BOX_SLACK_PT;

    let mut props = shape_properties(&position, "rect", text_box.rotation);
    props.fill = Some(fill_properties(text_box.fill.as_ref()));

    let body = body_properties(text_box.margin.as_ref(), text_box.text_wrap);
    let text = build_text_body(&text_box.paragraphs, body, markup);
    slide.add_text_box(props, text);
    Ok(())
}

/// Add a connector. A connector without thickness is not drawn.
pub(crate) fn render_connector(
    slide: &mut MutableSlide,
    connector: &Connector,
) -> Result<(), ShapeError> {
    if connector.thickness.is_nan() || connector.thickness <= 0.0 {
        tracing::debug!("skipping connector without thickness");
        return Ok(());
    }
    let mut props =
        shape_properties(&connector.position, connector_preset(connector.kind), None);
    let opacity = clamp_unit(connector.opacity.unwrap_or(1.0));
    props.line = Some(LineProperties::Solid {
        width: pt_to_emu(connector.thickness),
        color: solid_color(connector.color, opacity),
    });
    slide.add_connector(props);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::HtmlSubsetParser;
    use crate::model::Paragraph;

    fn autoshape(geometry: Geometry) -> AutoShape {
        AutoShape::new(Position::new(10.0, 20.0, 200.0, 100.0), geometry)
    }

    #[test]
    fn test_fill_and_stroke_mapping() {
        assert_eq!(fill_properties(None), FillProperties::NoFill);
        let fill = Fill {
            color: RgbColor::WHITE,
            opacity: Some(0.25),
        };
        assert_eq!(
            fill_properties(Some(&fill)),
            FillProperties::Solid(SolidColor::with_alpha(RgbColor::WHITE, 25_000))
        );

        let hidden = Stroke {
            color: RgbColor::BLACK,
            thickness: 0.0,
            opacity: None,
        };
        assert_eq!(line_properties(Some(&hidden)), LineProperties::NoLine);
        let visible = Stroke {
            thickness: 1.5,
            ..hidden
        };
        assert_eq!(
            line_properties(Some(&visible)),
            LineProperties::Solid {
                width: 19_050,
                color: SolidColor::opaque(RgbColor::BLACK),
            }
        );
    }

    #[test]
    fn test_shadow_mapping() {
        let shadow = Shadow {
            radius: 8.0,
            offset: 4.0,
            angle: 90.0,
            color: RgbColor::BLACK,
            opacity: 0.3,
        };
        let outer = outer_shadow(&shadow);
        assert_eq!(outer.blur_radius, 101_600);
        assert_eq!(outer.distance, 50_800);
        assert_eq!(outer.direction, 5_400_000);
        assert_eq!(outer.color.alpha, Some(30_000));
    }

    #[test]
    fn test_corner_adjustment_is_capped() {
        let pos = Position::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(corner_adjustment(10.0, &pos), 10_000);
        assert_eq!(corner_adjustment(500.0, &pos), 50_000);
        assert_eq!(corner_adjustment(10.0, &Position::new(0.0, 0.0, 0.0, 10.0)), 0);
    }

    #[test]
    fn test_autoshape_is_margin_adjusted_and_unshadowed() {
        let mut shape = autoshape(Geometry::Rectangle);
        shape.margin = Some(crate::common::Margin {
            left: 10.0,
            top: 0.0,
            right: 10.0,
            bottom: 0.0,
        });
        shape.paragraphs = vec![Paragraph::markup("hi")];
        let mut slide = MutableSlide::new();
        render_autoshape(&mut slide, &shape, &HtmlSubsetParser).unwrap();

        let added = &slide.shapes()[0];
        assert_eq!(added.properties().rect.x, pt_to_emu(20.0));
        assert_eq!(added.properties().rect.cx, pt_to_emu(180.0));
        assert_eq!(added.properties().effects.shadows(), &[OuterShadow::none()]);
        let body = added.text_body().unwrap();
        assert_eq!(body.body.insets[0], pt_to_emu(10.0));
        assert_eq!(body.paragraphs[0].runs[0].text, "hi");
    }

    #[test]
    fn test_border_radius_on_unsupported_geometry_still_renders() {
        let mut shape = autoshape(Geometry::Ellipse);
        shape.border_radius = Some(12.0);
        let mut slide = MutableSlide::new();
        let err = render_autoshape(&mut slide, &shape, &HtmlSubsetParser).unwrap_err();
        assert!(matches!(err, ShapeError::UnsupportedAdjustment { .. }));
        assert!(!err.is_skipped());
        assert_eq!(slide.shape_count(), 1);

        let mut rounded = autoshape(Geometry::RoundedRectangle);
        rounded.border_radius = Some(12.0);
        render_autoshape(&mut slide, &rounded, &HtmlSubsetParser).unwrap();
        let adjustments = slide.shapes()[1].properties().geometry.adjustments();
        assert_eq!(adjustments[0].value, 12_000);
    }

    #[test]
    fn test_text_box_is_widened() {
        let text_box = TextBox::new(Position::new(0.0, 0.0, 100.0, 20.0), Vec::new());
        let mut slide = MutableSlide::new();
        render_text_box(&mut slide, &text_box, &HtmlSubsetParser).unwrap();
        assert_eq!(slide.shapes()[0].properties().rect.cx, pt_to_emu(102.0));
    }

    #[test]
    fn test_zero_thickness_connector_is_skipped() {
        let mut connector = Connector {
            position: Position::new(0.0, 0.0, 100.0, 0.0),
            kind: ConnectorKind::Elbow,
            thickness: 0.0,
            color: RgbColor::BLACK,
            opacity: Some(0.5),
        };
        let mut slide = MutableSlide::new();
        render_connector(&mut slide, &connector).unwrap();
        assert_eq!(slide.shape_count(), 0);

        connector.thickness = 2.0;
        render_connector(&mut slide, &connector).unwrap();
        let props = slide.shapes()[0].properties();
        assert_eq!(props.geometry.preset, "bentConnector3");
        assert_eq!(
            props.line,
            Some(LineProperties::Solid {
                width: 25_400,
                color: SolidColor::with_alpha(RgbColor::BLACK, 50_000),
            })
        );
    }
}
