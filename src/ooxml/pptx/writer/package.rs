//! Assembly of a [`MutablePresentation`] into an OPC package.
//!
//! Relationships are created before the XML that references them, so every
//! part is rendered with its final rIds.

use chrono::Utc;

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, PackURI, Part, Relationships};
use crate::ooxml::pptx::template;

use super::pres::MutablePresentation;
use super::relmap::RelationshipMapper;

fn uri(partname: impl Into<String>) -> Result<PackURI> {
    PackURI::new(partname).map_err(OoxmlError::InvalidPartName)
}

fn static_part(partname: &PackURI, content_type: &str, xml: &str) -> Part {
    Part::new(partname.clone(), content_type, xml.as_bytes().to_vec())
}

/// Build the complete package for `pres`.
pub(crate) fn build(pres: &MutablePresentation) -> Result<OpcPackage> {
    let mut pkg = OpcPackage::new();
    let mut rel_mapper = RelationshipMapper::new();

    let pres_uri = uri("/ppt/presentation.xml")?;
    let mut pres_rels = Relationships::new(pres_uri.base_uri());

    // Master, layout and theme
    let master_uri = uri("/ppt/slideMasters/slideMaster1.xml")?;
    let layout_uri = uri("/ppt/slideLayouts/slideLayout1.xml")?;
    let theme_uri = uri("/ppt/theme/theme1.xml")?;

    let master_rel_id = pres_rels.relate_to(&master_uri, rt::SLIDE_MASTER);

    let mut master = static_part(
        &master_uri,
        ct::PML_SLIDE_MASTER,
        template::default_slide_master_xml(),
    );
    // The master template refers to its layout as rId1
    master.relate_to(&layout_uri, rt::SLIDE_LAYOUT);
    master.relate_to(&theme_uri, rt::THEME);
    pkg.add_part(master)?;

    let mut layout = static_part(
        &layout_uri,
        ct::PML_SLIDE_LAYOUT,
        template::blank_slide_layout_xml(),
    );
    layout.relate_to(&master_uri, rt::SLIDE_MASTER);
    pkg.add_part(layout)?;

    pkg.add_part(static_part(&theme_uri, ct::OFC_THEME, template::default_theme_xml()))?;

    // Notes master, only when some slide has notes
    let notes_count = pres.slides.iter().filter(|s| s.has_notes()).count();
    let notes_master_uri = uri("/ppt/notesMasters/notesMaster1.xml")?;
    let notes_master_rel_id = if notes_count > 0 {
        let theme2_uri = uri("/ppt/theme/theme2.xml")?;
        let mut notes_master = static_part(
            &notes_master_uri,
            ct::PML_NOTES_MASTER,
            template::default_notes_master_xml(),
        );
        notes_master.relate_to(&theme2_uri, rt::THEME);
        pkg.add_part(notes_master)?;
        pkg.add_part(static_part(&theme2_uri, ct::OFC_THEME, template::default_theme_xml()))?;
        Some(pres_rels.relate_to(&notes_master_uri, rt::NOTES_MASTER))
    } else {
        None
    };

    // Media, one part per picture
    let mut slide_rels: Vec<Relationships> = Vec::with_capacity(pres.slides.len());
    for slide_index in 0..pres.slides.len() {
        let slide_uri = uri(format!("/ppt/slides/slide{}.xml", slide_index + 1))?;
        let mut rels = Relationships::new(slide_uri.base_uri());
        rels.relate_to(&layout_uri, rt::SLIDE_LAYOUT);
        slide_rels.push(rels);
    }
    for (slide_index, data, format) in pres.collect_all_images() {
        let media_uri =
            pkg.next_partname(&format!("/ppt/media/image%d.{}", format.extension()))?;
        pkg.add_part(Part::new(media_uri.clone(), format.mime_type(), data.to_vec()))?;
        let rid = slide_rels[slide_index].relate_to(&media_uri, rt::IMAGE);
        rel_mapper.push_image(slide_index, rid);
    }

    // Slides and their notes
    let mut slide_rel_ids = Vec::with_capacity(pres.slides.len());
    for ((slide_index, slide), mut rels) in pres.slides.iter().enumerate().zip(slide_rels) {
        let slide_uri = uri(format!("/ppt/slides/slide{}.xml", slide_index + 1))?;

        if let Some(notes_xml) = slide.generate_notes_xml() {
            let notes_uri = uri(format!(
                "/ppt/notesSlides/notesSlide{}.xml",
                slide_index + 1
            ))?;
            let mut notes_rels = Relationships::new(notes_uri.base_uri());
            notes_rels.relate_to(&notes_master_uri, rt::NOTES_MASTER);
            notes_rels.relate_to(&slide_uri, rt::SLIDE);
            pkg.add_part(Part::with_rels(
                notes_uri.clone(),
                ct::PML_NOTES_SLIDE,
                notes_xml?.into_bytes(),
                notes_rels,
            ))?;
            rels.relate_to(&notes_uri, rt::NOTES_SLIDE);
        }

        let slide_xml = slide.to_xml_with_rels(slide_index, &rel_mapper)?;
        pkg.add_part(Part::with_rels(
            slide_uri.clone(),
            ct::PML_SLIDE,
            slide_xml.into_bytes(),
            rels,
        ))?;
        slide_rel_ids.push(pres_rels.relate_to(&slide_uri, rt::SLIDE));
    }

    // Presentation-level property parts
    pres_rels.relate_to(&theme_uri, rt::THEME);
    for (partname, content_type, reltype, xml) in [
        (
            "/ppt/presProps.xml",
            ct::PML_PRES_PROPS,
            rt::PRES_PROPS,
            template::default_pres_props_xml(),
        ),
        (
            "/ppt/viewProps.xml",
            ct::PML_VIEW_PROPS,
            rt::VIEW_PROPS,
            template::default_view_props_xml(),
        ),
        (
            "/ppt/tableStyles.xml",
            ct::PML_TABLE_STYLES,
            rt::TABLE_STYLES,
            template::default_table_styles_xml(),
        ),
    ] {
        let part_uri = uri(partname)?;
        pres_rels.relate_to(&part_uri, reltype);
        pkg.add_part(static_part(&part_uri, content_type, xml))?;
    }

    let pres_xml = pres.generate_presentation_xml_with_rels(
        &master_rel_id,
        notes_master_rel_id.as_deref(),
        &slide_rel_ids,
    )?;
    pkg.add_part(Part::with_rels(
        pres_uri.clone(),
        ct::PML_PRESENTATION_MAIN,
        pres_xml.into_bytes(),
        pres_rels,
    ))?;
    pkg.relate_to(&pres_uri, rt::OFFICE_DOCUMENT);

    // Document properties
    let core_uri = uri("/docProps/core.xml")?;
    let core_xml = template::core_props_xml(pres.title(), Utc::now());
    pkg.add_part(Part::new(
        core_uri.clone(),
        ct::OPC_CORE_PROPERTIES,
        core_xml.into_bytes(),
    ))?;
    pkg.relate_to(&core_uri, rt::CORE_PROPERTIES);

    let app_uri = uri("/docProps/app.xml")?;
    let app_xml = template::app_props_xml(pres.slide_count(), notes_count);
    pkg.add_part(Part::new(
        app_uri.clone(),
        ct::OFC_EXTENDED_PROPERTIES,
        app_xml.into_bytes(),
    ))?;
    pkg.relate_to(&app_uri, rt::EXTENDED_PROPERTIES);

    Ok(pkg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::EmuRect;
    use crate::ooxml::pptx::format::ImageFormat;
    use crate::ooxml::pptx::writer::shape::ShapeProperties;

    fn part<'a>(pkg: &'a OpcPackage, name: &str) -> &'a Part {
        pkg.get_part(&PackURI::new(name).unwrap())
            .unwrap_or_else(|| panic!("missing part {name}"))
    }

    #[test]
    fn test_minimal_package() {
        let mut pres = MutablePresentation::new();
        pres.add_slide();
        let pkg = build(&pres).unwrap();

        assert_eq!(pkg.rels().len(), 3);
        let pres_part = part(&pkg, "/ppt/presentation.xml");
        let master_rel = pres_part.rels().get("rId1").unwrap();
        assert_eq!(master_rel.target_ref(), "slideMasters/slideMaster1.xml");

        let master = part(&pkg, "/ppt/slideMasters/slideMaster1.xml");
        let layout_rel = master.rels().get("rId1").unwrap();
        assert_eq!(layout_rel.reltype(), rt::SLIDE_LAYOUT);
        assert_eq!(layout_rel.target_ref(), "../slideLayouts/slideLayout1.xml");

        assert!(pkg.get_part(&PackURI::new("/ppt/notesMasters/notesMaster1.xml").unwrap()).is_none());
        let xml = std::str::from_utf8(pres_part.blob()).unwrap();
        assert!(!xml.contains("notesMasterIdLst"));
    }

    #[test]
    fn test_images_and_notes_are_related() {
        let mut pres = MutablePresentation::new();
        pres.add_slide();
        let slide = pres.add_slide();
        slide.add_picture(
            vec![0x89, b'P', b'N', b'G'],
            ImageFormat::Png,
            ShapeProperties::new(EmuRect::default(), "rect"),
            "chart",
        );
        slide.set_notes("talk track");

        let pkg = build(&pres).unwrap();
        assert_eq!(part(&pkg, "/ppt/media/image1.png").blob(), &[0x89, b'P', b'N', b'G']);

        let slide2 = part(&pkg, "/ppt/slides/slide2.xml");
        let image_rel = slide2
            .rels()
            .iter()
            .find(|rel| rel.reltype() == rt::IMAGE)
            .unwrap();
        assert_eq!(image_rel.target_ref(), "../media/image1.png");
        let slide_xml = std::str::from_utf8(slide2.blob()).unwrap();
        assert!(slide_xml.contains(&format!(r#"r:embed="{}""#, image_rel.r_id())));
        assert!(slide2.rels().iter().any(|rel| rel.reltype() == rt::NOTES_SLIDE));

        let notes = part(&pkg, "/ppt/notesSlides/notesSlide2.xml");
        let targets: Vec<&str> = notes.rels().iter().map(|r| r.target_ref()).collect();
        assert_eq!(
            targets,
            vec!["../notesMasters/notesMaster1.xml", "../slides/slide2.xml"]
        );
        assert!(part(&pkg, "/ppt/notesMasters/notesMaster1.xml").rels().len() == 1);

        let app = std::str::from_utf8(part(&pkg, "/docProps/app.xml").blob()).unwrap();
        assert!(app.contains("<Slides>2</Slides>"));
    }
}
