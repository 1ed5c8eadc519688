//! Deck model to in-memory presentation.
//!
//! Every slide renders into its own [`MutableSlide`] with its own scratch
//! subdirectory, optionally on the rayon pool. The finished slides are then
//! appended to the presentation in deck order.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::assets::{AssetFetcher, AssetResolver};
use crate::common::unit::pt_to_emu;
use crate::config::RenderConfig;
use crate::error::{RenderError, ShapeError};
use crate::markup::MarkupParser;
use crate::model::{PresentationDocument, Shape, Slide};
use crate::ooxml::pptx::{MutablePresentation, MutableSlide};

use super::picture::{PictureContext, render_picture};
use super::shapes::{fill_properties, render_autoshape, render_connector, render_text_box};
use super::{RenderReport, ShapeWarning};

pub(crate) struct Assembler<'a> {
    config: &'a RenderConfig,
    resolver: AssetResolver<'a>,
    markup: &'a dyn MarkupParser,
}

struct RenderedSlide {
    slide: MutableSlide,
    warnings: Vec<ShapeWarning>,
}

fn scratch_subdir(path: PathBuf) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(&path).map_err(|source| RenderError::Scratch {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

impl<'a> Assembler<'a> {
    pub(crate) fn new(
        config: &'a RenderConfig,
        fetcher: &'a dyn AssetFetcher,
        markup: &'a dyn MarkupParser,
    ) -> Self {
        Self {
            config,
            resolver: AssetResolver::new(config, fetcher),
            markup,
        }
    }

    pub(crate) fn assemble(
        &self,
        doc: &PresentationDocument,
        scratch_dir: &Path,
    ) -> Result<(MutablePresentation, RenderReport), RenderError> {
        let scratch_dir = scratch_subdir(scratch_dir.to_path_buf())?;

        let mut pres = MutablePresentation::new();
        pres.set_slide_size(pt_to_emu(doc.size.width), pt_to_emu(doc.size.height));
        if let Some(name) = doc.name.as_deref() {
            pres.set_title(name);
        }

        let rendered: Vec<Result<RenderedSlide, RenderError>> = if self.config.parallel_slides {
            doc.slides
                .par_iter()
                .enumerate()
                .map(|(index, slide)| self.render_slide(doc, index, slide, &scratch_dir))
                .collect()
        } else {
            doc.slides
                .iter()
                .enumerate()
                .map(|(index, slide)| self.render_slide(doc, index, slide, &scratch_dir))
                .collect()
        };

        let mut report = RenderReport::default();
        for result in rendered {
            let RenderedSlide { slide, warnings } = result?;
            pres.push_slide(slide);
            report.warnings.extend(warnings);
        }
        report.slide_count = pres.slide_count();
        Ok((pres, report))
    }

    /// Render one slide. Deck-wide shapes are painted after the slide's own.
    fn render_slide(
        &self,
        doc: &PresentationDocument,
        slide_index: usize,
        model: &Slide,
        scratch_dir: &Path,
    ) -> Result<RenderedSlide, RenderError> {
        let slide_number = slide_index + 1;
        let scratch = scratch_subdir(scratch_dir.join(format!("slide-{}", slide_number)))?;

        let mut slide = MutableSlide::new();
        if let Some(background) = model.background.as_ref() {
            slide.set_background(fill_properties(Some(background)));
        }
        if let Some(note) = model.note.as_deref().filter(|n| !n.is_empty()) {
            slide.set_notes(note);
        }

        let ctx = PictureContext {
            resolver: &self.resolver,
            icon_cleanup: &self.config.icon_cleanup,
            scratch_dir: &scratch,
        };

        let mut warnings = Vec::new();
        for (shape_index, shape) in model.shapes.iter().chain(&doc.shapes).enumerate() {
            tracing::debug!(
                slide = slide_number,
                shape = shape_index,
                kind = shape.kind(),
                "rendering shape"
            );
            if let Err(error) = self.render_shape(&mut slide, shape, &ctx, shape_index) {
                warnings.push(warn_shape(slide_index, shape_index, error));
            }
        }

        Ok(RenderedSlide { slide, warnings })
    }

    fn render_shape(
        &self,
        slide: &mut MutableSlide,
        shape: &Shape,
        ctx: &PictureContext<'_>,
        shape_index: usize,
    ) -> Result<(), ShapeError> {
        match shape {
            Shape::Picture(picture) => render_picture(slide, picture, ctx, shape_index),
            Shape::AutoShape(autoshape) => render_autoshape(slide, autoshape, self.markup),
            Shape::TextBox(text_box) => render_text_box(slide, text_box, self.markup),
            Shape::Connector(connector) => render_connector(slide, connector),
        }
    }
}

fn warn_shape(slide_index: usize, shape_index: usize, error: ShapeError) -> ShapeWarning {
    let slide_number = slide_index + 1;
    if error.is_skipped() {
        tracing::warn!(slide = slide_number, shape = shape_index, %error, "shape skipped");
    } else {
        tracing::warn!(slide = slide_number, shape = shape_index, %error, "shape effect dropped");
    }
    ShapeWarning {
        slide_index,
        slide_number,
        shape_index,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::OfflineFetcher;
    use crate::common::{Position, RgbColor};
    use crate::markup::HtmlSubsetParser;
    use crate::model::{AutoShape, Fill, Geometry, PictureShape, TextBox};

    fn deck() -> PresentationDocument {
        PresentationDocument {
            name: Some("Review".into()),
            slides: vec![
                Slide {
                    shapes: vec![Shape::AutoShape(AutoShape::new(
                        Position::new(0.0, 0.0, 10.0, 10.0),
                        Geometry::Rectangle,
                    ))],
                    background: Some(Fill::solid(RgbColor::BLACK)),
                    note: Some("first".into()),
                },
                Slide {
                    shapes: vec![Shape::Picture(PictureShape::new(
                        Position::new(0.0, 0.0, 10.0, 10.0),
                        "/static/missing.png",
                    ))],
                    ..Default::default()
                },
            ],
            shapes: vec![Shape::TextBox(TextBox::new(
                Position::new(0.0, 700.0, 100.0, 20.0),
                Vec::new(),
            ))],
            ..Default::default()
        }
    }

    fn assemble(
        config: &RenderConfig,
        doc: &PresentationDocument,
    ) -> (MutablePresentation, RenderReport) {
        let scratch = tempfile::tempdir().unwrap();
        let assembler = Assembler::new(config, &OfflineFetcher, &HtmlSubsetParser);
        assembler.assemble(doc, scratch.path()).unwrap()
    }

    #[test]
    fn test_deck_shapes_follow_slide_shapes() {
        let (pres, report) = assemble(&RenderConfig::default(), &deck());
        assert_eq!(pres.slide_count(), 2);
        assert_eq!(report.slide_count, 2);
        assert_eq!(pres.title(), Some("Review"));
        assert_eq!(pres.slide_width(), pt_to_emu(1280.0));

        let first = &pres.slides()[0];
        assert_eq!(first.shape_count(), 2);
        assert!(first.shapes()[1].text_body().is_some());
        assert_eq!(first.notes(), Some("first"));
        assert!(first.background().is_some());

        // missing picture dropped, deck text box kept
        let second = &pres.slides()[1];
        assert_eq!(second.shape_count(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].slide_number, 2);
        assert_eq!(report.warnings[0].shape_index, 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let doc = deck();
        let config = RenderConfig {
            parallel_slides: true,
            ..Default::default()
        };
        let (parallel, parallel_report) = assemble(&config, &doc);
        let (sequential, _) = assemble(&RenderConfig::default(), &doc);
        assert_eq!(parallel.slide_count(), sequential.slide_count());
        for (a, b) in parallel.slides().iter().zip(sequential.slides()) {
            assert_eq!(a.slide_id(), b.slide_id());
            assert_eq!(a.shape_count(), b.shape_count());
        }
        assert_eq!(parallel_report.warnings.len(), 1);
    }

    #[test]
    fn test_unwritable_scratch_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();

        let config = RenderConfig::default();
        let assembler = Assembler::new(&config, &OfflineFetcher, &HtmlSubsetParser);
        let err = assembler.assemble(&deck(), &file).unwrap_err();
        assert!(matches!(err, RenderError::Scratch { .. }));
    }
}
