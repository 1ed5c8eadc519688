//! Presentation template module.
//!
//! Provides the fixed parts every generated presentation carries: one slide
//! master with a single blank layout, a notes master, the Office theme and
//! the presentation-level property parts. Document properties are generated
//! per presentation.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::common::xml::escape_xml;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Slide master with a blank background, color map and one layout (`rId1`).
pub fn default_slide_master_xml() -> &'static str {
    include_str!("../../../resources/slideMaster1.xml")
}

/// The blank slide layout every slide is based on.
pub fn blank_slide_layout_xml() -> &'static str {
    include_str!("../../../resources/slideLayout1.xml")
}

/// Notes master referenced by every notes slide.
pub fn default_notes_master_xml() -> &'static str {
    include_str!("../../../resources/notesMaster1.xml")
}

/// Office theme, shared by the slide master and the notes master.
pub fn default_theme_xml() -> &'static str {
    include_str!("../../../resources/theme1.xml")
}

pub fn default_table_styles_xml() -> &'static str {
    include_str!("../../../resources/tableStyles.xml")
}

pub fn default_view_props_xml() -> &'static str {
    include_str!("../../../resources/viewProps.xml")
}

pub fn default_pres_props_xml() -> &'static str {
    include_str!("../../../resources/presProps.xml")
}

/// Generate `docProps/core.xml` for a presentation created at `created`.
pub fn core_props_xml(title: Option<&str>, created: DateTime<Utc>) -> String {
    let timestamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
    let mut xml = String::with_capacity(640);
    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
    if let Some(title) = title {
        xml.push_str("<dc:title>");
        xml.push_str(&escape_xml(title));
        xml.push_str("</dc:title>");
    }
    xml.push_str("<dc:creator>deckwright</dc:creator>");
    xml.push_str("<cp:lastModifiedBy>deckwright</cp:lastModifiedBy>");
    xml.push_str("<cp:revision>1</cp:revision>");
    xml.push_str(r#"<dcterms:created xsi:type="dcterms:W3CDTF">"#);
    xml.push_str(&timestamp);
    xml.push_str("</dcterms:created>");
    xml.push_str(r#"<dcterms:modified xsi:type="dcterms:W3CDTF">"#);
    xml.push_str(&timestamp);
    xml.push_str("</dcterms:modified>");
    xml.push_str("</cp:coreProperties>");
    xml
}

/// Generate `docProps/app.xml`.
pub fn app_props_xml(slide_count: usize, notes_count: usize) -> String {
    format!(
        concat!(
            r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<TotalTime>0</TotalTime>",
            "<Application>deckwright</Application>",
            "<PresentationFormat>Custom</PresentationFormat>",
            "<Slides>{}</Slides>",
            "<Notes>{}</Notes>",
            "<HiddenSlides>0</HiddenSlides>",
            "<MMClips>0</MMClips>",
            "<ScaleCrop>false</ScaleCrop>",
            "<LinksUpToDate>false</LinksUpToDate>",
            "<SharedDoc>false</SharedDoc>",
            "<HyperlinksChanged>false</HyperlinksChanged>",
            "<AppVersion>16.0000</AppVersion>",
            "</Properties>"
        ),
        XML_DECLARATION, slide_count, notes_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_templates_are_xml_documents() {
        for xml in [
            default_slide_master_xml(),
            blank_slide_layout_xml(),
            default_notes_master_xml(),
            default_theme_xml(),
            default_table_styles_xml(),
            default_view_props_xml(),
            default_pres_props_xml(),
        ] {
            assert!(xml.starts_with("<?xml"));
        }
        assert!(default_slide_master_xml().contains(r#"r:id="rId1""#));
    }

    #[test]
    fn test_core_props() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let xml = core_props_xml(Some("Q&A"), created);
        assert!(xml.contains("<dc:title>Q&amp;A</dc:title>"));
        assert!(xml.contains(">2024-03-01T09:30:00Z</dcterms:created>"));

        let untitled = core_props_xml(None, created);
        assert!(!untitled.contains("dc:title"));
    }

    #[test]
    fn test_app_props_counts() {
        let xml = app_props_xml(3, 1);
        assert!(xml.contains("<Slides>3</Slides>"));
        assert!(xml.contains("<Notes>1</Notes>"));
    }
}
