//! Shape types and implementation for PPTX presentations.

use crate::common::xml::escape_xml;
use crate::common::{EmuRect, RgbColor};
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

// Import shared format types
pub use super::super::format::ImageFormat;
use super::text::TextBody;

/// A solid color with optional alpha (1000ths of a percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidColor {
    pub color: RgbColor,
    pub alpha: Option<i64>,
}

impl SolidColor {
    pub fn opaque(color: RgbColor) -> Self {
        Self { color, alpha: None }
    }

    pub fn with_alpha(color: RgbColor, alpha: i64) -> Self {
        Self {
            color,
            alpha: Some(alpha),
        }
    }

    fn write(&self, xml: &mut String) -> Result<()> {
        match self.alpha {
            Some(alpha) => write!(
                xml,
                r#"<a:srgbClr val="{}"><a:alpha val="{}"/></a:srgbClr>"#,
                self.color.to_hex(),
                alpha
            )?,
            None => write!(xml, r#"<a:srgbClr val="{}"/>"#, self.color.to_hex())?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillProperties {
    NoFill,
    Solid(SolidColor),
}

impl FillProperties {
    pub(crate) fn write(&self, xml: &mut String) -> Result<()> {
        match self {
            FillProperties::NoFill => xml.push_str("<a:noFill/>"),
            FillProperties::Solid(color) => {
                xml.push_str("<a:solidFill>");
                color.write(xml)?;
                xml.push_str("</a:solidFill>");
            },
        }
        Ok(())
    }
}

/// Outline (`a:ln`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineProperties {
    NoLine,
    Solid { width: i64, color: SolidColor },
}

impl LineProperties {
    fn write(&self, xml: &mut String) -> Result<()> {
        match self {
            LineProperties::NoLine => xml.push_str("<a:ln><a:noFill/></a:ln>"),
            LineProperties::Solid { width, color } => {
                write!(xml, r#"<a:ln w="{}"><a:solidFill>"#, width)?;
                color.write(xml)?;
                xml.push_str("</a:solidFill></a:ln>");
            },
        }
        Ok(())
    }
}

/// `a:outerShdw`. Distances in EMU, direction in 60000ths of a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OuterShadow {
    pub blur_radius: i64,
    pub distance: i64,
    pub direction: i64,
    pub color: SolidColor,
}

impl OuterShadow {
    /// A shadow that draws nothing. Overrides a shadow inherited from the
    /// theme's effect style.
    pub fn none() -> Self {
        Self {
            blur_radius: 0,
            distance: 0,
            direction: 0,
            color: SolidColor::with_alpha(RgbColor::BLACK, 0),
        }
    }

    fn write(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<a:outerShdw blurRad="{}" dist="{}" dir="{}" algn="ctr" rotWithShape="0">"#,
            self.blur_radius, self.distance, self.direction
        )?;
        self.color.write(xml)?;
        xml.push_str("</a:outerShdw>");
        Ok(())
    }
}

/// `a:effectLst`. Only shadows are modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectList {
    pub(crate) shadows: Vec<OuterShadow>,
}

impl EffectList {
    pub fn shadows(&self) -> &[OuterShadow] {
        &self.shadows
    }

    pub fn is_empty(&self) -> bool {
        self.shadows.is_empty()
    }

    fn write(&self, xml: &mut String) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        xml.push_str("<a:effectLst>");
        for shadow in &self.shadows {
            shadow.write(xml)?;
        }
        xml.push_str("</a:effectLst>");
        Ok(())
    }
}

/// A shape guide value in `a:avLst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub name: &'static str,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetGeometry {
    pub preset: &'static str,
    pub(crate) adjustments: Vec<Adjustment>,
}

impl PresetGeometry {
    pub fn new(preset: &'static str) -> Self {
        Self {
            preset,
            adjustments: Vec::new(),
        }
    }

    pub fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }

    fn write(&self, xml: &mut String) -> Result<()> {
        write!(xml, r#"<a:prstGeom prst="{}">"#, self.preset)?;
        if self.adjustments.is_empty() {
            xml.push_str("<a:avLst/>");
        } else {
            xml.push_str("<a:avLst>");
            for adj in &self.adjustments {
                write!(xml, r#"<a:gd name="{}" fmla="val {}"/>"#, adj.name, adj.value)?;
            }
            xml.push_str("</a:avLst>");
        }
        xml.push_str("</a:prstGeom>");
        Ok(())
    }
}

/// `p:spPr`: transform, geometry, fill, outline and effects, written in
/// schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeProperties {
    pub rect: EmuRect,
    /// Clockwise rotation in 60000ths of a degree
    pub rotation: i64,
    pub geometry: PresetGeometry,
    pub fill: Option<FillProperties>,
    pub line: Option<LineProperties>,
    pub effects: EffectList,
}

impl ShapeProperties {
    pub fn new(rect: EmuRect, preset: &'static str) -> Self {
        Self {
            rect,
            rotation: 0,
            geometry: PresetGeometry::new(preset),
            fill: None,
            line: None,
            effects: EffectList::default(),
        }
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<p:spPr>");
        if self.rotation != 0 {
            write!(xml, r#"<a:xfrm rot="{}">"#, self.rotation)?;
        } else {
            xml.push_str("<a:xfrm>");
        }
        write!(xml, r#"<a:off x="{}" y="{}"/>"#, self.rect.x, self.rect.y)?;
        write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, self.rect.cx, self.rect.cy)?;
        xml.push_str("</a:xfrm>");
        self.geometry.write(xml)?;
        if let Some(ref fill) = self.fill {
            fill.write(xml)?;
        }
        if let Some(ref line) = self.line {
            line.write(xml)?;
        }
        self.effects.write(xml)?;
        xml.push_str("</p:spPr>");
        Ok(())
    }
}

/// Theme style references an inserted autoshape carries: accent-colored
/// outline and fill, the theme's shadow effect, light text.
const AUTOSHAPE_STYLE: &str = concat!(
    "<p:style>",
    r#"<a:lnRef idx="1"><a:schemeClr val="accent1"/></a:lnRef>"#,
    r#"<a:fillRef idx="3"><a:schemeClr val="accent1"/></a:fillRef>"#,
    r#"<a:effectRef idx="2"><a:schemeClr val="accent1"/></a:effectRef>"#,
    r#"<a:fontRef idx="minor"><a:schemeClr val="lt1"/></a:fontRef>"#,
    "</p:style>"
);

/// A shape on a slide (autoshape, text box, picture or connector).
#[derive(Debug, Clone)]
pub struct MutableShape {
    /// Shape ID
    pub(crate) shape_id: u32,
    /// Shape type
    pub(crate) shape_type: ShapeType,
}

#[derive(Debug, Clone)]
pub(crate) enum ShapeType {
    AutoShape {
        props: ShapeProperties,
        text: TextBody,
    },
    TextBox {
        props: ShapeProperties,
        text: TextBody,
    },
    Picture {
        data: Vec<u8>,
        format: ImageFormat,
        props: ShapeProperties,
        description: String,
    },
    Connector {
        props: ShapeProperties,
    },
}

impl MutableShape {
    pub(crate) fn new(shape_id: u32, shape_type: ShapeType) -> Self {
        Self {
            shape_id,
            shape_type,
        }
    }

    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    pub fn properties(&self) -> &ShapeProperties {
        match &self.shape_type {
            ShapeType::AutoShape { props, .. }
            | ShapeType::TextBox { props, .. }
            | ShapeType::Picture { props, .. }
            | ShapeType::Connector { props } => props,
        }
    }

    pub fn properties_mut(&mut self) -> &mut ShapeProperties {
        match &mut self.shape_type {
            ShapeType::AutoShape { props, .. }
            | ShapeType::TextBox { props, .. }
            | ShapeType::Picture { props, .. }
            | ShapeType::Connector { props } => props,
        }
    }

    pub fn text_body(&self) -> Option<&TextBody> {
        match &self.shape_type {
            ShapeType::AutoShape { text, .. } | ShapeType::TextBox { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_picture(&self) -> bool {
        matches!(self.shape_type, ShapeType::Picture { .. })
    }

    /// Get image data if this shape is a picture.
    pub(crate) fn get_image_data(&self) -> Option<(&[u8], ImageFormat)> {
        match &self.shape_type {
            ShapeType::Picture { data, format, .. } => Some((data.as_slice(), *format)),
            _ => None,
        }
    }

    /// Generate XML for this shape.
    ///
    /// Pictures need the rId of their image relationship.
    pub(crate) fn to_xml(&self, xml: &mut String, rel_id: Option<&str>) -> Result<()> {
        match &self.shape_type {
            ShapeType::AutoShape { props, text } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="AutoShape {}"/>"#,
                    self.shape_id, self.shape_id
                )?;
                xml.push_str("<p:cNvSpPr/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");
                props.to_xml(xml)?;
                xml.push_str(AUTOSHAPE_STYLE);
                text.to_xml(xml)?;
                xml.push_str("</p:sp>");
            },
            ShapeType::TextBox { props, text } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
                    self.shape_id, self.shape_id
                )?;
                xml.push_str("<p:cNvSpPr txBox=\"1\"/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");
                props.to_xml(xml)?;
                text.to_xml(xml)?;
                xml.push_str("</p:sp>");
            },
            ShapeType::Picture {
                props, description, ..
            } => {
                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    self.shape_id,
                    self.shape_id,
                    escape_xml(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                let rid = rel_id.unwrap_or("rIdImagePlaceholder");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, rid)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                props.to_xml(xml)?;
                xml.push_str("</p:pic>");
            },
            ShapeType::Connector { props } => {
                xml.push_str("<p:cxnSp>");
                xml.push_str("<p:nvCxnSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Connector {}"/>"#,
                    self.shape_id, self.shape_id
                )?;
                xml.push_str("<p:cNvCxnSpPr/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvCxnSpPr>");
                props.to_xml(xml)?;
                xml.push_str("</p:cxnSp>");
            },
        }

        Ok(())
    }
}
