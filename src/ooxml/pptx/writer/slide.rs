//! Slide types and implementation for PPTX presentations.

use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

// Import shared format types
use super::super::format::ImageFormat;
use super::relmap::RelationshipMapper;
use super::shape::{FillProperties, MutableShape, ShapeProperties, ShapeType};
use super::text::TextBody;

/// A mutable slide in a presentation.
#[derive(Debug, Clone, Default)]
pub struct MutableSlide {
    /// Slide ID (unique identifier), assigned when the slide joins a presentation
    pub(crate) slide_id: u32,
    /// Shapes on the slide, in paint order
    pub(crate) shapes: Vec<MutableShape>,
    /// Speaker notes for the slide
    pub(crate) notes: Option<String>,
    /// Slide background
    pub(crate) background: Option<FillProperties>,
}

impl MutableSlide {
    /// Create a new empty slide that is not yet part of a presentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    pub(crate) fn set_slide_id(&mut self, slide_id: u32) {
        self.slide_id = slide_id;
    }

    /// Set speaker notes for the slide.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = Some(notes.to_string());
    }

    /// Get the speaker notes for the slide.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Check if the slide has speaker notes.
    pub fn has_notes(&self) -> bool {
        self.notes.is_some()
    }

    /// Set a background for the slide. `NoFill` and unset both fall back to
    /// the master background.
    pub fn set_background(&mut self, background: FillProperties) {
        self.background = Some(background);
    }

    pub fn background(&self) -> Option<&FillProperties> {
        self.background.as_ref()
    }

    // IDs: 1=group, 2+=shapes
    fn push_shape(&mut self, shape_type: ShapeType) -> &mut MutableShape {
        let shape_id = (self.shapes.len() + 2) as u32;
        let idx = self.shapes.len();
        self.shapes.push(MutableShape::new(shape_id, shape_type));
        &mut self.shapes[idx]
    }

    /// Add an autoshape with a text frame.
    pub fn add_autoshape(&mut self, props: ShapeProperties, text: TextBody) -> &mut MutableShape {
        self.push_shape(ShapeType::AutoShape { props, text })
    }

    /// Add a text box.
    pub fn add_text_box(&mut self, props: ShapeProperties, text: TextBody) -> &mut MutableShape {
        self.push_shape(ShapeType::TextBox { props, text })
    }

    /// Add a picture. The image is embedded as-is in its native format.
    pub fn add_picture(
        &mut self,
        data: Vec<u8>,
        format: ImageFormat,
        props: ShapeProperties,
        description: &str,
    ) -> &mut MutableShape {
        self.push_shape(ShapeType::Picture {
            data,
            format,
            props,
            description: description.to_string(),
        })
    }

    /// Add a connector line.
    pub fn add_connector(&mut self, props: ShapeProperties) -> &mut MutableShape {
        self.push_shape(ShapeType::Connector { props })
    }

    pub fn shapes(&self) -> &[MutableShape] {
        &self.shapes
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Images of all picture shapes, in shape order.
    pub(crate) fn collect_images(&self) -> Vec<(&[u8], ImageFormat)> {
        self.shapes
            .iter()
            .filter_map(|shape| shape.get_image_data())
            .collect()
    }

    /// Generate slide XML content with relationship IDs from the mapper.
    ///
    /// # Arguments
    /// * `slide_index` - The index of this slide (used to look up relationships)
    /// * `rel_mapper` - The relationship mapper containing actual relationship IDs
    pub(crate) fn to_xml_with_rels(
        &self,
        slide_index: usize,
        rel_mapper: &RelationshipMapper,
    ) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);

        xml.push_str(
            r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#,
        );
        xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        xml.push_str("<p:cSld>");

        // Background must come before spTree
        if let Some(fill @ FillProperties::Solid(_)) = &self.background {
            xml.push_str("<p:bg><p:bgPr>");
            fill.write(&mut xml)?;
            xml.push_str("<a:effectLst/></p:bgPr></p:bg>");
        }

        xml.push_str("<p:spTree>");
        write_group_header(&mut xml);

        let mut image_counter = 0;
        for shape in &self.shapes {
            let rel_id = if shape.is_picture() {
                let rid = rel_mapper.image_id(slide_index, image_counter);
                image_counter += 1;
                rid
            } else {
                None
            };
            shape.to_xml(&mut xml, rel_id)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }

    /// Generate notes slide XML content.
    pub(crate) fn generate_notes_xml(&self) -> Option<Result<String>> {
        let notes_text = self.notes.as_ref()?;
        Some(notes_xml(notes_text))
    }
}

fn write_group_header(xml: &mut String) {
    xml.push_str("<p:nvGrpSpPr>");
    xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
    xml.push_str("<p:cNvGrpSpPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr>");
    xml.push_str("<a:xfrm>");
    xml.push_str(r#"<a:off x="0" y="0"/>"#);
    xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
    xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
    xml.push_str("</a:xfrm>");
    xml.push_str("</p:grpSpPr>");
}

fn notes_xml(notes_text: &str) -> Result<String> {
    let mut xml = String::with_capacity(2048);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<p:notes xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#);
    xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
    xml.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );

    xml.push_str("<p:cSld>");
    xml.push_str("<p:spTree>");
    write_group_header(&mut xml);

    // Notes text shape
    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Notes Placeholder 1"/>"#);
    xml.push_str("<p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr>");
    xml.push_str("<p:nvPr><p:ph type=\"body\" idx=\"1\"/></p:nvPr>");
    xml.push_str("</p:nvSpPr>");
    xml.push_str("<p:spPr/>");

    xml.push_str("<p:txBody>");
    xml.push_str("<a:bodyPr/>");
    xml.push_str("<a:lstStyle/>");
    for line in notes_text.lines() {
        xml.push_str("<a:p>");
        if !line.is_empty() {
            xml.push_str("<a:r>");
            xml.push_str("<a:rPr lang=\"en-US\" dirty=\"0\"/>");
            write!(xml, "<a:t>{}</a:t>", escape_xml(line))?;
            xml.push_str("</a:r>");
        }
        xml.push_str("</a:p>");
    }
    if notes_text.lines().next().is_none() {
        xml.push_str("<a:p/>");
    }
    xml.push_str("</p:txBody>");
    xml.push_str("</p:sp>");

    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
    xml.push_str("</p:notes>");

    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{EmuRect, RgbColor};
    use crate::ooxml::pptx::writer::shape::SolidColor;
    use crate::ooxml::pptx::writer::text::BodyProperties;

    fn props() -> ShapeProperties {
        ShapeProperties::new(EmuRect::default(), "rect")
    }

    #[test]
    fn test_shape_ids_follow_order() {
        let mut slide = MutableSlide::new();
        slide.add_autoshape(props(), TextBody::new(BodyProperties::default()));
        slide.add_connector(props());
        let ids: Vec<u32> = slide.shapes().iter().map(|s| s.shape_id()).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_slide_xml_uses_mapped_image_ids() {
        let mut slide = MutableSlide::new();
        slide.add_picture(vec![1], ImageFormat::Png, props(), "first");
        slide.add_text_box(props(), TextBody::default());
        slide.add_picture(vec![2], ImageFormat::Jpeg, props(), "second");
        assert_eq!(slide.collect_images().len(), 2);

        let mut mapper = RelationshipMapper::new();
        mapper.push_image(0, "rId2".into());
        mapper.push_image(0, "rId3".into());
        let xml = slide.to_xml_with_rels(0, &mapper).unwrap();

        let first = xml.find(r#"r:embed="rId2""#).unwrap();
        let text_box = xml.find(r#"txBox="1""#).unwrap();
        let second = xml.find(r#"r:embed="rId3""#).unwrap();
        assert!(first < text_box && text_box < second);
        assert!(xml.ends_with("</p:sld>"));
    }

    #[test]
    fn test_background() {
        let mut slide = MutableSlide::new();
        let mapper = RelationshipMapper::new();
        assert!(!slide.to_xml_with_rels(0, &mapper).unwrap().contains("<p:bg>"));

        slide.set_background(FillProperties::Solid(SolidColor::opaque(RgbColor::new(
            0x10, 0x18, 0x20,
        ))));
        let xml = slide.to_xml_with_rels(0, &mapper).unwrap();
        let bg = xml.find("<p:bg><p:bgPr><a:solidFill><a:srgbClr val=\"101820\"/>").unwrap();
        assert!(bg < xml.find("<p:spTree>").unwrap());
    }

    #[test]
    fn test_notes_xml() {
        let mut slide = MutableSlide::new();
        assert!(slide.generate_notes_xml().is_none());
        slide.set_notes("Open with <the> number\nthen pause");
        let xml = slide.generate_notes_xml().unwrap().unwrap();
        assert!(xml.contains(r#"<p:ph type="body" idx="1"/>"#));
        assert!(xml.contains("<a:t>Open with &lt;the&gt; number</a:t>"));
        assert_eq!(xml.matches("<a:p>").count(), 2);
    }
}
