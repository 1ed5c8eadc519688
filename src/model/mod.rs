//! The deck model handed to the renderer.
//!
//! A [`PresentationDocument`] is built by the caller (or deserialized from
//! JSON/YAML) and is never mutated by rendering. All lengths share the
//! caller's unit, points by convention, in the coordinate space established
//! by [`PresentationDocument::size`].

mod shape;
mod style;
mod text;

pub use shape::{
    AutoShape, Connector, ConnectorKind, Geometry, ObjectFit, PictureMask, PictureShape, Shape,
    TextBox,
};
pub use style::{Fill, Shadow, Stroke};
pub(crate) use style::clamp_unit;
pub use text::{Alignment, Font, Paragraph, ParagraphSpacing, TextRun};

use serde::{Deserialize, Serialize};

/// Canvas dimensions of every slide in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    /// 1280 × 720 points, the 16:9 canvas deck generators lay out against.
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// The whole deck.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresentationDocument {
    /// Written to the package's core properties as the title.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: CanvasSize,
    pub slides: Vec<Slide>,
    /// Drawn on every slide after the slide's own shapes.
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

/// A single slide. Shape order is paint order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub background: Option<Fill>,
    /// Speaker notes.
    #[serde(default)]
    pub note: Option<String>,
}

impl PresentationDocument {
    /// Parse a deck from YAML (JSON is a subset and parses too).
    pub fn from_yaml_str(input: &str) -> crate::Result<Self> {
        serde_saphyr::from_str(input).map_err(|e| crate::ConfigError::Parse(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{FitMode, RgbColor};

    const DECK: &str = r##"
name: Quarterly review
slides:
  - background: { color: "#101820" }
    note: Open with the headline number.
    shapes:
      - type: picture
        position: { left: 40, top: 40, width: 320, height: 180 }
        image: /static/images/cover.jpg
        mask: circle
        object_fit: { fit: cover, focus: { x: 30, y: 50 } }
      - type: auto_shape
        position: { left: 400, top: 40, width: 200, height: 100 }
        geometry: rounded_rectangle
        fill: { color: "FFFFFF", opacity: 0.8 }
        shadow: { radius: 8, offset: 4, angle: 90, color: "000000", opacity: 0.3 }
        border_radius: 12
        paragraphs:
          - text: "<b>Revenue</b> up 12%"
            alignment: center
      - type: text_box
        position: { left: 40, top: 300, width: 500, height: 60 }
        paragraphs:
          - text_runs:
              - text: plain
              - text: struck
                font: { strike: true, weight: 700 }
      - type: connector
        position: { left: 40, top: 400, width: 600, height: 0 }
        thickness: 2
        color: "CCCCCC"
"##;

    #[test]
    fn test_deserialize_deck() {
        let doc = PresentationDocument::from_yaml_str(DECK).unwrap();
        assert_eq!(doc.name.as_deref(), Some("Quarterly review"));
        assert_eq!(doc.size, CanvasSize::default());
        assert_eq!(doc.slides.len(), 1);

        let slide = &doc.slides[0];
        assert_eq!(
            slide.background.as_ref().map(|f| f.color),
            Some(RgbColor::new(0x10, 0x18, 0x20))
        );
        assert_eq!(slide.shapes.len(), 4);

        let Shape::Picture(pic) = &slide.shapes[0] else {
            panic!("expected picture");
        };
        assert_eq!(pic.mask, Some(PictureMask::Circle));
        let fit = pic.object_fit.unwrap();
        assert_eq!(fit.fit, FitMode::Cover);
        assert_eq!(fit.focus.x, 30.0);

        let Shape::AutoShape(shape) = &slide.shapes[1] else {
            panic!("expected autoshape");
        };
        assert_eq!(shape.geometry, Geometry::RoundedRectangle);
        assert!(shape.shadow.is_some());
        assert!(shape.text_wrap);

        let Shape::TextBox(text_box) = &slide.shapes[2] else {
            panic!("expected text box");
        };
        let font = text_box.paragraphs[0].text_runs[1].font.as_ref().unwrap();
        assert_eq!(font.strike, Some(true));
        assert_eq!(font.bold(), Some(true));

        assert!(matches!(slide.shapes[3], Shape::Connector(_)));
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let bad = "slides:\n  - background: { color: \"#12\" }\n";
        assert!(PresentationDocument::from_yaml_str(bad).is_err());
    }
}
