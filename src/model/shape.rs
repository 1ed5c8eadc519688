use serde::{Deserialize, Serialize};

use super::style::{Fill, Shadow, Stroke};
use super::text::Paragraph;
use crate::common::{FitMode, Focus, Margin, Position, RgbColor};

/// Anything positioned on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Picture(PictureShape),
    AutoShape(AutoShape),
    TextBox(TextBox),
    Connector(Connector),
}

impl Shape {
    pub fn position(&self) -> &Position {
        match self {
            Shape::Picture(s) => &s.position,
            Shape::AutoShape(s) => &s.position,
            Shape::TextBox(s) => &s.position,
            Shape::Connector(s) => &s.position,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Picture(_) => "picture",
            Shape::AutoShape(_) => "auto_shape",
            Shape::TextBox(_) => "text_box",
            Shape::Connector(_) => "connector",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PictureMask {
    Rectangle,
    Circle,
}

/// Fit mode plus focal point for pictures whose aspect differs from their box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectFit {
    #[serde(default)]
    pub fit: FitMode,
    #[serde(default)]
    pub focus: Focus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureShape {
    pub position: Position,
    #[serde(default)]
    pub margin: Option<Margin>,
    /// Local path, site-relative path, or URL.
    pub image: String,
    #[serde(default)]
    pub mask: Option<PictureMask>,
    /// Corner radii: top-left, top-right, bottom-right, bottom-left.
    #[serde(default)]
    pub border_radius: Option<[f64; 4]>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub object_fit: Option<ObjectFit>,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: Option<f64>,
}

impl PictureShape {
    pub fn new(position: Position, image: impl Into<String>) -> Self {
        Self {
            position,
            margin: None,
            image: image.into(),
            mask: None,
            border_radius: None,
            opacity: None,
            invert: false,
            object_fit: None,
            rotation: None,
        }
    }

    /// Whether pixels need to be rewritten before embedding.
    pub fn needs_processing(&self) -> bool {
        self.mask == Some(PictureMask::Circle)
            || self
                .border_radius
                .is_some_and(|radii| radii.iter().any(|r| *r > 0.0))
            || self.opacity.is_some_and(|o| o < 1.0)
            || self.invert
            || self.object_fit.is_some()
    }
}

/// Preset geometries an [`AutoShape`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Geometry {
    #[default]
    Rectangle,
    RoundedRectangle,
    TopRoundedRectangle,
    Ellipse,
    Triangle,
    RightTriangle,
    Diamond,
    Parallelogram,
    Trapezoid,
    Pentagon,
    Hexagon,
    Octagon,
    Chevron,
    HomePlate,
    Star5,
    Heart,
    Plus,
    RightArrow,
    LeftArrow,
    UpArrow,
    DownArrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoShape {
    pub position: Position,
    #[serde(default)]
    pub margin: Option<Margin>,
    #[serde(default)]
    pub geometry: Geometry,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default)]
    pub stroke: Option<Stroke>,
    /// `None` writes an explicit empty shadow, masking any theme default.
    #[serde(default)]
    pub shadow: Option<Shadow>,
    #[serde(default)]
    pub border_radius: Option<f64>,
    #[serde(default = "default_true")]
    pub text_wrap: bool,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub rotation: Option<f64>,
}

impl AutoShape {
    pub fn new(position: Position, geometry: Geometry) -> Self {
        Self {
            position,
            margin: None,
            geometry,
            fill: None,
            stroke: None,
            shadow: None,
            border_radius: None,
            text_wrap: true,
            paragraphs: Vec::new(),
            rotation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub position: Position,
    #[serde(default)]
    pub margin: Option<Margin>,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default = "default_true")]
    pub text_wrap: bool,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub rotation: Option<f64>,
}

impl TextBox {
    pub fn new(position: Position, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            position,
            margin: None,
            fill: None,
            text_wrap: true,
            paragraphs,
            rotation: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    #[default]
    Straight,
    Elbow,
    Curved,
}

/// A line from the top-left to the bottom-right corner of its box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub position: Position,
    #[serde(default)]
    pub kind: ConnectorKind,
    #[serde(default)]
    pub thickness: f64,
    #[serde(default)]
    pub color: RgbColor,
    #[serde(default)]
    pub opacity: Option<f64>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_needs_processing() {
        let mut pic = PictureShape::new(Position::new(0.0, 0.0, 10.0, 10.0), "a.png");
        assert!(!pic.needs_processing());

        pic.mask = Some(PictureMask::Rectangle);
        assert!(!pic.needs_processing());

        pic.border_radius = Some([0.0, 0.0, 0.0, 0.0]);
        assert!(!pic.needs_processing());
        pic.border_radius = Some([0.0, 4.0, 0.0, 0.0]);
        assert!(pic.needs_processing());

        pic.border_radius = None;
        pic.opacity = Some(1.0);
        assert!(!pic.needs_processing());
        pic.invert = true;
        assert!(pic.needs_processing());
    }
}
