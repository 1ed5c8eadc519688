//! Presentation writer for PPTX.

use crate::ooxml::error::Result;
use crate::ooxml::opc::{OpcPackage, PackageWriter};
use std::fmt::Write as FmtWrite;
use std::path::Path;

// Import shared format types
use super::super::format::ImageFormat;
use super::package;
use super::slide::MutableSlide;

/// First slide ID; lower values are reserved.
const FIRST_SLIDE_ID: u32 = 256;

/// A mutable PowerPoint presentation for writing.
///
/// Provides methods to add slides, set dimensions and serialize the whole
/// presentation as a package.
#[derive(Debug)]
pub struct MutablePresentation {
    /// Slides in the presentation
    pub(crate) slides: Vec<MutableSlide>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
    /// Title written to the core properties
    title: Option<String>,
}

impl MutablePresentation {
    /// Create a new empty presentation with default dimensions.
    ///
    /// Default size is 13.333" x 7.5" (16:9).
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            slide_width: 12_192_000,
            slide_height: 6_858_000,
            title: None,
        }
    }

    /// Add a new empty slide to the presentation.
    pub fn add_slide(&mut self) -> &mut MutableSlide {
        self.push_slide(MutableSlide::new())
    }

    /// Append a slide built elsewhere, assigning its slide ID.
    pub fn push_slide(&mut self, mut slide: MutableSlide) -> &mut MutableSlide {
        let idx = self.slides.len();
        slide.set_slide_id(idx as u32 + FIRST_SLIDE_ID);
        self.slides.push(slide);
        &mut self.slides[idx]
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[MutableSlide] {
        &self.slides
    }

    /// Get a mutable reference to a slide by index (0-based).
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut MutableSlide> {
        self.slides.get_mut(index)
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Set the slide size in EMUs.
    pub fn set_slide_size(&mut self, width: i64, height: i64) {
        self.slide_width = width;
        self.slide_height = height;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Collect all images from all slides in the presentation.
    pub(crate) fn collect_all_images(&self) -> Vec<(usize, &[u8], ImageFormat)> {
        let mut all_images = Vec::new();

        for (slide_index, slide) in self.slides.iter().enumerate() {
            for (image_data, image_format) in slide.collect_images() {
                all_images.push((slide_index, image_data, image_format));
            }
        }

        all_images
    }

    /// Build the OPC package holding this presentation.
    pub fn to_package(&self) -> Result<OpcPackage> {
        package::build(self)
    }

    /// Serialize the presentation to `.pptx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(PackageWriter::to_bytes(&self.to_package()?)?)
    }

    /// Write the presentation to `path`. The file only appears once it is
    /// complete.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PackageWriter::write(path, &self.to_package()?)?;
        Ok(())
    }

    /// Generate presentation.xml content with actual relationship IDs.
    ///
    /// # Arguments
    /// * `master_rel_id` - Relationship ID of the slide master
    /// * `notes_master_rel_id` - Relationship ID of the notes master, if any slide has notes
    /// * `slide_rel_ids` - Relationship IDs for slides, in slide order
    pub(crate) fn generate_presentation_xml_with_rels(
        &self,
        master_rel_id: &str,
        notes_master_rel_id: Option<&str>,
        slide_rel_ids: &[String],
    ) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" saveSubsetFonts="1">"#);

        // Write slide master ID list
        xml.push_str("<p:sldMasterIdLst>");
        write!(
            xml,
            r#"<p:sldMasterId id="2147483648" r:id="{}"/>"#,
            master_rel_id
        )?;
        xml.push_str("</p:sldMasterIdLst>");

        if let Some(rid) = notes_master_rel_id {
            write!(
                xml,
                r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
                rid
            )?;
        }

        // Write slide ID list
        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, rel_id) in self.slides.iter().zip(slide_rel_ids) {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    slide.slide_id(),
                    rel_id
                )?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        // Write slide size
        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )?;

        xml.push_str("<p:notesSz cx=\"6858000\" cy=\"9144000\"/>");
        xml.push_str("</p:presentation>");

        Ok(xml)
    }
}

impl Default for MutablePresentation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_presentation() {
        let pres = MutablePresentation::new();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), 12_192_000);
        assert_eq!(pres.slide_height(), 6_858_000);
    }

    #[test]
    fn test_push_slide_assigns_ids() {
        let mut pres = MutablePresentation::new();
        pres.add_slide();
        let slide = pres.push_slide(MutableSlide::new());
        assert_eq!(slide.slide_id(), 257);
        assert_eq!(pres.slides()[0].slide_id(), 256);
        assert_eq!(pres.slide_count(), 2);
    }

    #[test]
    fn test_xml_generation() {
        let mut pres = MutablePresentation::new();
        pres.set_slide_size(16_256_000, 9_144_000);
        pres.add_slide();
        pres.add_slide();

        let rids = vec!["rId3".to_string(), "rId4".to_string()];
        let xml = pres
            .generate_presentation_xml_with_rels("rId1", Some("rId2"), &rids)
            .unwrap();
        assert!(xml.contains(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<p:notesMasterId r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId3"/><p:sldId id="257" r:id="rId4"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="16256000" cy="9144000"/>"#));

        let master = xml.find("sldMasterIdLst").unwrap();
        let notes = xml.find("notesMasterIdLst").unwrap();
        let slides = xml.find("sldIdLst").unwrap();
        assert!(master < notes && notes < slides);
    }
}
