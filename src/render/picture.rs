//! Picture shapes: resolve, process, embed.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::assets::{AssetKind, AssetResolver};
use crate::common::unit::degrees_to_angle;
use crate::common::{Size, clamp_radii};
use crate::config::IconCleanupConfig;
use crate::error::ShapeError;
use crate::images::{ImagePipeline, Mask, clean_icon, encode_png};
use crate::model::{PictureMask, PictureShape, clamp_unit};
use crate::ooxml::pptx::{ImageFormat, MutableSlide, ShapeProperties};

/// What a picture renderer needs besides the shape itself.
pub(crate) struct PictureContext<'a> {
    pub resolver: &'a AssetResolver<'a>,
    pub icon_cleanup: &'a IconCleanupConfig,
    /// This slide's scratch subdirectory.
    pub scratch_dir: &'a Path,
}

/// Pixel transforms requested by the shape, in box units.
pub(crate) fn pipeline_for(picture: &PictureShape, box_size: Size) -> ImagePipeline {
    let mut pipeline = ImagePipeline::new(box_size);
    if let Some(object_fit) = picture.object_fit {
        pipeline.fit = object_fit.fit;
        pipeline.focus = object_fit.focus;
    }
    pipeline.invert = picture.invert;
    pipeline.opacity = picture.opacity.map(clamp_unit).filter(|o| *o < 1.0);
    pipeline.mask = match (picture.mask, picture.border_radius) {
        (Some(PictureMask::Circle), _) => Some(Mask::Circle),
        (_, Some(radii)) if radii.iter().any(|r| *r > 0.0) => Some(Mask::Rounded(clamp_radii(
            radii,
            box_size.width,
            box_size.height,
        ))),
        _ => None,
    };
    pipeline
}

fn decode(reference: &str, bytes: &[u8]) -> Result<RgbaImage, ShapeError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| ShapeError::ImageDecode {
            reference: reference.to_string(),
            reason: e.to_string(),
        })
}

/// Encode `image` as PNG into `path` and return the bytes.
fn store_png(image: &RgbaImage, path: PathBuf) -> Result<Vec<u8>, ShapeError> {
    let png = encode_png(image).map_err(|e| ShapeError::ImageEncode {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    std::fs::write(&path, &png).map_err(|e| ShapeError::ImageEncode {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), bytes = png.len(), "wrote processed image");
    Ok(png)
}

fn description(reference: &str) -> &str {
    let path = reference.split(['?', '#']).next().unwrap_or(reference);
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Add a picture. Any failure drops this shape only.
pub(crate) fn render_picture(
    slide: &mut MutableSlide,
    picture: &PictureShape,
    ctx: &PictureContext<'_>,
    shape_index: usize,
) -> Result<(), ShapeError> {
    let reference = picture.image.as_str();
    let position = picture.position.inset(picture.margin.as_ref());

    let asset = ctx
        .resolver
        .resolve(reference, ctx.scratch_dir, &format!("asset-{}", shape_index))?;
    let bytes = std::fs::read(&asset.path).map_err(|e| ShapeError::AssetUnavailable {
        reference: reference.to_string(),
        reason: format!("{}: {}", asset.path.display(), e),
    })?;
    let embeddable = ImageFormat::detect_from_bytes(&bytes);

    let (data, format) = if picture.needs_processing() {
        let source = decode(reference, &bytes)?;
        let processed = pipeline_for(picture, position.size()).apply(&source);
        let path = ctx.scratch_dir.join(format!("shape-{}.png", shape_index));
        (store_png(&processed, path)?, ImageFormat::Png)
    } else if asset.kind == AssetKind::Icon && embeddable == Some(ImageFormat::Png) {
        let source = decode(reference, &bytes)?;
        match clean_icon(&source, ctx.icon_cleanup) {
            Some(cleaned) => {
                let path = ctx.scratch_dir.join(format!("icon-{}.png", shape_index));
                (store_png(&cleaned, path)?, ImageFormat::Png)
            },
            None => (bytes, ImageFormat::Png),
        }
    } else if let Some(format) = embeddable {
        (bytes, format)
    } else {
        // decodable, but not a format slides can embed
        let source = decode(reference, &bytes)?;
        let path = ctx.scratch_dir.join(format!("image-{}.png", shape_index));
        (store_png(&source, path)?, ImageFormat::Png)
    };

    let mut props = ShapeProperties::new(position.to_emu(), "rect");
    props.rotation = picture.rotation.map(degrees_to_angle).unwrap_or(0);
    slide.add_picture(data, format, props, description(reference));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::OfflineFetcher;
    use crate::common::{FitMode, Focus, Position};
    use crate::config::RenderConfig;
    use crate::model::ObjectFit;
    use image::Rgba;

    fn png_file(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, encode_png(image).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_pipeline_for() {
        let mut pic = PictureShape::new(Position::new(0.0, 0.0, 100.0, 50.0), "a.png");
        let pipeline = pipeline_for(&pic, pic.position.size());
        assert_eq!(pipeline.fit, FitMode::Cover);
        assert_eq!(pipeline.mask, None);

        pic.border_radius = Some([10.0, 80.0, 0.0, 0.0]);
        pic.opacity = Some(1.0);
        pic.object_fit = Some(ObjectFit {
            fit: FitMode::Contain,
            focus: Focus::new(0.0, 100.0),
        });
        let pipeline = pipeline_for(&pic, pic.position.size());
        assert_eq!(pipeline.mask, Some(Mask::Rounded([10.0, 25.0, 0.0, 0.0])));
        assert_eq!(pipeline.opacity, None);
        assert_eq!(pipeline.fit, FitMode::Contain);

        pic.mask = Some(PictureMask::Circle);
        let pipeline = pipeline_for(&pic, pic.position.size());
        assert_eq!(pipeline.mask, Some(Mask::Circle));
    }

    #[test]
    fn test_description() {
        assert_eq!(description("https://x/y/photo.jpg?w=2"), "photo.jpg");
        assert_eq!(description("cover.png"), "cover.png");
    }

    #[test]
    fn test_processed_picture_is_png_in_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let source = RgbaImage::from_pixel(40, 20, Rgba([10, 20, 30, 255]));
        let path = png_file(dir.path(), "wide.png", &source);

        let config = RenderConfig::default();
        let resolver = AssetResolver::new(&config, &OfflineFetcher);
        let ctx = PictureContext {
            resolver: &resolver,
            icon_cleanup: &config.icon_cleanup,
            scratch_dir: dir.path(),
        };

        let mut pic = PictureShape::new(
            Position::new(0.0, 0.0, 20.0, 20.0),
            path.to_string_lossy().to_string(),
        );
        pic.mask = Some(PictureMask::Circle);

        let mut slide = MutableSlide::new();
        render_picture(&mut slide, &pic, &ctx, 3).unwrap();
        assert!(dir.path().join("shape-3.png").is_file());
        assert!(slide.shapes()[0].is_picture());
    }

    #[test]
    fn test_undecodable_asset_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let config = RenderConfig::default();
        let resolver = AssetResolver::new(&config, &OfflineFetcher);
        let ctx = PictureContext {
            resolver: &resolver,
            icon_cleanup: &config.icon_cleanup,
            scratch_dir: dir.path(),
        };
        let pic = PictureShape::new(
            Position::new(0.0, 0.0, 20.0, 20.0),
            path.to_string_lossy().to_string(),
        );
        let mut slide = MutableSlide::new();
        let err = render_picture(&mut slide, &pic, &ctx, 0).unwrap_err();
        assert!(matches!(err, ShapeError::ImageDecode { .. }));
        assert_eq!(slide.shape_count(), 0);
    }
}
