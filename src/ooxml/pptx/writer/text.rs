//! Text bodies for PPTX shapes: body properties, paragraphs and runs.

use crate::common::RgbColor;
use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

/// Horizontal paragraph alignment (`a:pPr/@algn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "l",
            TextAlign::Center => "ctr",
            TextAlign::Right => "r",
            TextAlign::Justify => "just",
        }
    }
}

/// Vertical anchoring of text inside its shape (`a:bodyPr/@anchor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Top,
    Middle,
    Bottom,
}

impl TextAnchor {
    fn as_str(&self) -> &'static str {
        match self {
            TextAnchor::Top => "t",
            TextAnchor::Middle => "ctr",
            TextAnchor::Bottom => "b",
        }
    }
}

/// Value of the run-level `strike` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeKind {
    Single,
    NoStrike,
}

impl StrikeKind {
    fn as_str(&self) -> &'static str {
        match self {
            StrikeKind::Single => "sngStrike",
            StrikeKind::NoStrike => "noStrike",
        }
    }
}

/// `a:bodyPr`: word wrap, insets (EMU, left/top/right/bottom) and anchoring.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyProperties {
    pub wrap: bool,
    pub insets: [i64; 4],
    pub anchor: Option<TextAnchor>,
}

impl Default for BodyProperties {
    fn default() -> Self {
        Self {
            wrap: true,
            insets: [0; 4],
            anchor: None,
        }
    }
}

/// Character properties shared by `a:rPr`, `a:defRPr` and `a:br/a:rPr`.
///
/// `None` fields are left out so the value is inherited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunProperties {
    /// Size in hundredths of a point
    pub size: Option<u32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub(crate) strike: Option<StrikeKind>,
    pub color: Option<RgbColor>,
    pub typeface: Option<String>,
}

impl RunProperties {
    pub fn strike(&self) -> Option<StrikeKind> {
        self.strike
    }

    fn write(&self, xml: &mut String, tag: &str) -> Result<()> {
        write!(xml, r#"<{} lang="en-US""#, tag)?;
        if let Some(size) = self.size {
            write!(xml, r#" sz="{}""#, size)?;
        }
        if let Some(bold) = self.bold {
            write!(xml, r#" b="{}""#, u8::from(bold))?;
        }
        if let Some(italic) = self.italic {
            write!(xml, r#" i="{}""#, u8::from(italic))?;
        }
        if let Some(underline) = self.underline {
            xml.push_str(if underline { r#" u="sng""# } else { r#" u="none""# });
        }
        if let Some(strike) = self.strike {
            write!(xml, r#" strike="{}""#, strike.as_str())?;
        }
        xml.push_str(r#" dirty="0""#);

        if self.color.is_none() && self.typeface.is_none() {
            xml.push_str("/>");
            return Ok(());
        }
        xml.push('>');
        if let Some(color) = self.color {
            write!(
                xml,
                r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
                color.to_hex()
            )?;
        }
        if let Some(ref typeface) = self.typeface {
            write!(xml, r#"<a:latin typeface="{}"/>"#, escape_xml(typeface))?;
        }
        write!(xml, "</{}>", tag)?;
        Ok(())
    }
}

/// A text run. Line breaks inside `text` become `a:br` elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
    pub props: RunProperties,
}

impl Run {
    pub fn new(text: impl Into<String>, props: RunProperties) -> Self {
        Self {
            text: text.into(),
            props,
        }
    }

    fn write(&self, xml: &mut String) -> Result<()> {
        for (idx, line) in self.text.split('\n').enumerate() {
            if idx > 0 {
                xml.push_str("<a:br>");
                self.props.write(xml, "a:rPr")?;
                xml.push_str("</a:br>");
            }
            if line.is_empty() {
                continue;
            }
            xml.push_str("<a:r>");
            self.props.write(xml, "a:rPr")?;
            write!(xml, "<a:t>{}</a:t>", escape_xml(line))?;
            xml.push_str("</a:r>");
        }
        Ok(())
    }
}

/// `a:pPr`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphProperties {
    pub alignment: Option<TextAlign>,
    /// Line spacing in 1000ths of a percent
    pub line_spacing: Option<i64>,
    /// Space before, hundredths of a point
    pub space_before: Option<u32>,
    /// Space after, hundredths of a point
    pub space_after: Option<u32>,
    pub default_run: Option<RunProperties>,
}

impl ParagraphProperties {
    fn is_empty(&self) -> bool {
        *self == ParagraphProperties::default()
    }

    fn write(&self, xml: &mut String) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        xml.push_str("<a:pPr");
        if let Some(alignment) = self.alignment {
            write!(xml, r#" algn="{}""#, alignment.as_str())?;
        }
        xml.push('>');
        if let Some(pct) = self.line_spacing {
            write!(xml, r#"<a:lnSpc><a:spcPct val="{}"/></a:lnSpc>"#, pct)?;
        }
        if let Some(pts) = self.space_before {
            write!(xml, r#"<a:spcBef><a:spcPts val="{}"/></a:spcBef>"#, pts)?;
        }
        if let Some(pts) = self.space_after {
            write!(xml, r#"<a:spcAft><a:spcPts val="{}"/></a:spcAft>"#, pts)?;
        }
        if let Some(ref default_run) = self.default_run {
            default_run.write(xml, "a:defRPr")?;
        }
        xml.push_str("</a:pPr>");
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextParagraph {
    pub props: ParagraphProperties,
    pub runs: Vec<Run>,
}

impl TextParagraph {
    fn write(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<a:p>");
        self.props.write(xml)?;
        for run in &self.runs {
            run.write(xml)?;
        }
        xml.push_str("</a:p>");
        Ok(())
    }
}

/// `p:txBody` of a shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBody {
    pub body: BodyProperties,
    pub paragraphs: Vec<TextParagraph>,
}

impl TextBody {
    pub fn new(body: BodyProperties) -> Self {
        Self {
            body,
            paragraphs: Vec::new(),
        }
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        let [l, t, r, b] = self.body.insets;
        xml.push_str("<p:txBody>");
        write!(
            xml,
            r#"<a:bodyPr wrap="{}" lIns="{}" tIns="{}" rIns="{}" bIns="{}" rtlCol="0""#,
            if self.body.wrap { "square" } else { "none" },
            l,
            t,
            r,
            b
        )?;
        if let Some(anchor) = self.body.anchor {
            write!(xml, r#" anchor="{}""#, anchor.as_str())?;
        }
        xml.push_str("><a:noAutofit/></a:bodyPr>");
        xml.push_str("<a:lstStyle/>");
        if self.paragraphs.is_empty() {
            xml.push_str("<a:p/>");
        }
        for paragraph in &self.paragraphs {
            paragraph.write(xml)?;
        }
        xml.push_str("</p:txBody>");
        Ok(())
    }
}
