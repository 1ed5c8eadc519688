//! Raster transforms applied to pictures before they are embedded.
//!
//! Every function takes an RGBA buffer by reference and returns a new one.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};

use crate::common::{FitMode, Focus, Size, clamp_radii, fit_box};

/// Subsamples per axis used for anti-aliased masks.
pub const SUPERSAMPLE: u32 = 4;

/// Distance from a pixel center beyond which a pixel cannot straddle an edge.
const HALF_DIAGONAL: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Fraction of the pixel at `(x, y)` whose subsamples satisfy `inside`,
/// scaled to `0..=255`.
fn coverage(x: f64, y: f64, inside: impl Fn(f64, f64) -> bool) -> u8 {
    let n = SUPERSAMPLE;
    let step = 1.0 / n as f64;
    let mut hits = 0u32;
    for sy in 0..n {
        for sx in 0..n {
            let px = x + (sx as f64 + 0.5) * step;
            let py = y + (sy as f64 + 0.5) * step;
            if inside(px, py) {
                hits += 1;
            }
        }
    }
    ((hits * 255 + (n * n) / 2) / (n * n)) as u8
}

/// Multiply the alpha channel by a coverage mask of the same size.
fn apply_mask(image: &RgbaImage, mask: &GrayImage) -> RgbaImage {
    let mut out = image.clone();
    for (pixel, Luma([m])) in out.pixels_mut().zip(mask.pixels()) {
        let alpha = (pixel[3] as u32 * *m as u32 + 127) / 255;
        pixel[3] = alpha as u8;
        if alpha == 0 {
            pixel.0 = [0, 0, 0, 0];
        }
    }
    out
}

/// Round the corners of `image`.
///
/// `radii` are in pixels, ordered top-left, top-right, bottom-right,
/// bottom-left, and are clamped to half the shorter side. The mask is the
/// full-opacity cross between the corners plus one quarter disc per corner,
/// sampled at [`SUPERSAMPLE`]² points per pixel.
pub fn round_corners(image: &RgbaImage, radii: [f64; 4]) -> RgbaImage {
    let (width, height) = image.dimensions();
    let radii = clamp_radii(radii, width as f64, height as f64);
    if radii.iter().all(|r| *r <= 0.0) {
        return image.clone();
    }

    let mut mask = GrayImage::from_pixel(width, height, Luma([255]));
    for (corner, &radius) in radii.iter().enumerate() {
        if radius <= 0.0 {
            continue;
        }
        // Tile in top-left orientation, mirrored onto the real corner.
        let tile = radius.ceil() as u32;
        for ty in 0..tile.min(height) {
            for tx in 0..tile.min(width) {
                let value = coverage(tx as f64, ty as f64, |px, py| {
                    px >= radius
                        || py >= radius
                        || (px - radius).powi(2) + (py - radius).powi(2) <= radius * radius
                });
                let (x, y) = match corner {
                    0 => (tx, ty),
                    1 => (width - 1 - tx, ty),
                    2 => (width - 1 - tx, height - 1 - ty),
                    _ => (tx, height - 1 - ty),
                };
                let current = mask.get_pixel(x, y)[0];
                mask.put_pixel(x, y, Luma([current.min(value)]));
            }
        }
    }

    apply_mask(image, &mask)
}

/// Clip `image` to the circle inscribed in its shorter side, centered.
pub fn mask_circle(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let radius = width.min(height) as f64 / 2.0;
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);

    let mask = GrayImage::from_fn(width, height, |x, y| {
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= radius - HALF_DIAGONAL {
            Luma([255])
        } else if distance >= radius + HALF_DIAGONAL {
            Luma([0])
        } else {
            Luma([coverage(x as f64, y as f64, |px, py| {
                (px - cx).powi(2) + (py - cy).powi(2) <= radius * radius
            })])
        }
    });

    apply_mask(image, &mask)
}

/// Multiply every alpha value by `opacity` (clamped to `[0, 1]`).
pub fn set_opacity(image: &RgbaImage, opacity: f64) -> RgbaImage {
    let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    let mut out = image.clone();
    if opacity >= 1.0 {
        return out;
    }
    for pixel in out.pixels_mut() {
        pixel[3] = (pixel[3] as f64 * opacity).round() as u8;
        if pixel[3] == 0 {
            pixel.0 = [0, 0, 0, 0];
        }
    }
    out
}

/// Invert RGB, keeping alpha. Fully transparent pixels stay `(0, 0, 0, 0)`.
pub fn invert(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        if pixel[3] == 0 {
            pixel.0 = [0, 0, 0, 0];
        } else {
            pixel[0] = 255 - pixel[0];
            pixel[1] = 255 - pixel[1];
            pixel[2] = 255 - pixel[2];
        }
    }
    out
}

/// Scale `image` to cover a `width` × `height` pixel box, then crop the
/// overflow at the focus-weighted offset.
pub fn crop_to_box(image: &RgbaImage, width: u32, height: u32, focus: Focus) -> RgbaImage {
    let (iw, ih) = image.dimensions();
    if width == 0 || height == 0 || iw == 0 || ih == 0 {
        return RgbaImage::new(width, height);
    }
    let focus = focus.clamped();

    let scale = (width as f64 / iw as f64).max(height as f64 / ih as f64);
    let scaled_w = ((iw as f64 * scale).round() as u32).max(width);
    let scaled_h = ((ih as f64 * scale).round() as u32).max(height);
    let scaled = if (scaled_w, scaled_h) == (iw, ih) {
        image.clone()
    } else {
        imageops::resize(image, scaled_w, scaled_h, FilterType::Lanczos3)
    };

    let x = ((scaled_w - width) as f64 * focus.x / 100.0).round() as u32;
    let y = ((scaled_h - height) as f64 * focus.y / 100.0).round() as u32;
    imageops::crop_imm(&scaled, x, y, width, height).to_image()
}

/// Longest edge, in pixels, of a fitted image.
pub const MAX_FIT_EDGE: u32 = 4096;

/// Output pixels per box unit: `natural`, lowered so neither edge of the
/// box exceeds [`MAX_FIT_EDGE`].
fn output_density(natural: f64, bx: Size) -> f64 {
    let cap = MAX_FIT_EDGE as f64 / bx.width.max(bx.height);
    natural.min(cap)
}

fn scaled_dims(size: Size, density: f64) -> (u32, u32) {
    (
        ((size.width * density).round() as u32).clamp(1, MAX_FIT_EDGE),
        ((size.height * density).round() as u32).clamp(1, MAX_FIT_EDGE),
    )
}

fn resize_to(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        image.clone()
    } else {
        imageops::resize(image, width, height, FilterType::Lanczos3)
    }
}

/// Reconcile `image` with a box of a different aspect ratio.
///
/// The result has the box's aspect ratio at one pixel density on both axes,
/// the source's own where possible, with its longest edge capped at
/// [`MAX_FIT_EDGE`]. `Cover` crops, `Contain` pads with transparent bands,
/// `Fill` resamples.
pub fn fit_to_box(image: &RgbaImage, bx: Size, mode: FitMode, focus: Focus) -> RgbaImage {
    let (iw, ih) = image.dimensions();
    if iw == 0 || ih == 0 || !(bx.width > 0.0 && bx.height > 0.0) {
        return image.clone();
    }
    let placement = fit_box(Size::new(iw as f64, ih as f64), bx, mode, focus);

    match mode {
        FitMode::Cover => {
            let density = output_density(placement.source.width / bx.width, bx);
            let (width, height) = scaled_dims(bx, density);
            crop_to_box(image, width, height, focus)
        },
        FitMode::Contain => {
            let natural = (iw as f64 / placement.dest.width).min(ih as f64 / placement.dest.height);
            let density = output_density(natural, bx);
            let (canvas_w, canvas_h) = scaled_dims(bx, density);
            let (w, h) = scaled_dims(Size::new(placement.dest.width, placement.dest.height), density);
            let (w, h) = (w.min(canvas_w), h.min(canvas_h));
            let fitted = resize_to(image, w, h);

            let mut canvas = RgbaImage::new(canvas_w, canvas_h);
            let x = ((placement.dest.x * density).round() as i64).clamp(0, (canvas_w - w) as i64);
            let y = ((placement.dest.y * density).round() as i64).clamp(0, (canvas_h - h) as i64);
            imageops::replace(&mut canvas, &fitted, x, y);
            canvas
        },
        FitMode::Fill => {
            // keep every source pixel on the denser axis
            let natural = (iw as f64 / bx.width).max(ih as f64 / bx.height);
            let (width, height) = scaled_dims(bx, output_density(natural, bx));
            resize_to(image, width, height)
        },
    }
}

/// Shape of the alpha mask applied last in an [`ImagePipeline`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mask {
    Circle,
    /// Corner radii in box units.
    Rounded([f64; 4]),
}

/// The composed transform for one picture: fit, inversion, opacity, then mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePipeline {
    /// Size of the target box in layout units.
    pub box_size: Size,
    pub fit: FitMode,
    pub focus: Focus,
    pub invert: bool,
    pub opacity: Option<f64>,
    pub mask: Option<Mask>,
}

impl ImagePipeline {
    pub fn new(box_size: Size) -> Self {
        Self {
            box_size,
            fit: FitMode::Cover,
            focus: Focus::default(),
            invert: false,
            opacity: None,
            mask: None,
        }
    }

    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        let mut out = fit_to_box(image, self.box_size, self.fit, self.focus);
        if self.invert {
            out = invert(&out);
        }
        if let Some(opacity) = self.opacity {
            out = set_opacity(&out, opacity);
        }
        match self.mask {
            Some(Mask::Circle) => mask_circle(&out),
            Some(Mask::Rounded(radii)) => {
                let scale = if self.box_size.width > 0.0 {
                    out.width() as f64 / self.box_size.width
                } else {
                    1.0
                };
                round_corners(&out, radii.map(|r| r * scale))
            },
            None => out,
        }
    }
}

/// Encode as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_round_corners_clears_corners_keeps_center() {
        let img = solid(40, 40, [200, 100, 50, 255]);
        let out = round_corners(&img, [10.0; 4]);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(39, 0)[3], 0);
        assert_eq!(out.get_pixel(39, 39)[3], 0);
        assert_eq!(out.get_pixel(0, 39)[3], 0);
        assert_eq!(out.get_pixel(20, 20), &Rgba([200, 100, 50, 255]));
        // edge midpoints lie on the cross
        assert_eq!(out.get_pixel(20, 0)[3], 255);
        assert_eq!(out.get_pixel(0, 20)[3], 255);
    }

    #[test]
    fn test_round_corners_is_antialiased() {
        let img = solid(64, 64, [0, 0, 0, 255]);
        let out = round_corners(&img, [32.0, 0.0, 0.0, 0.0]);
        let partial = (0..32)
            .flat_map(|y| (0..32).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                let a = out.get_pixel(x, y)[3];
                a > 0 && a < 255
            })
            .count();
        assert!(partial > 0, "expected soft edge pixels");
        // other corners untouched
        assert_eq!(out.get_pixel(63, 0)[3], 255);
        assert_eq!(out.get_pixel(63, 63)[3], 255);
    }

    #[test]
    fn test_round_corners_zero_radius_is_noop() {
        let img = solid(8, 8, [1, 2, 3, 255]);
        assert_eq!(round_corners(&img, [0.0; 4]), img);
    }

    #[test]
    fn test_circle_mask() {
        let img = solid(60, 40, [10, 20, 30, 255]);
        let out = mask_circle(&img);
        assert_eq!(out.get_pixel(30, 20)[3], 255);
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        // left of the inscribed circle (diameter 40, starts at x = 10)
        assert_eq!(out.get_pixel(5, 20)[3], 0);
        assert_eq!(out.get_pixel(12, 20)[3], 255);
    }

    #[test]
    fn test_opacity() {
        let img = solid(2, 2, [9, 9, 9, 200]);
        assert_eq!(set_opacity(&img, 1.0), img);
        assert_eq!(set_opacity(&img, 0.5).get_pixel(0, 0)[3], 100);
        assert_eq!(set_opacity(&img, 0.0).get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(set_opacity(&img, 3.0), img);
    }

    #[test]
    fn test_invert_keeps_transparent_pixels() {
        let mut img = solid(2, 1, [10, 20, 30, 255]);
        img.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let out = invert(&img);
        assert_eq!(out.get_pixel(0, 0), &Rgba([245, 235, 225, 255]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_crop_to_box_uses_focus() {
        // left half red, right half blue
        let img = RgbaImage::from_fn(200, 100, |x, _| {
            if x < 100 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let left = crop_to_box(&img, 100, 100, Focus::new(0.0, 50.0));
        assert_eq!(left.dimensions(), (100, 100));
        assert_eq!(left.get_pixel(50, 50), &Rgba([255, 0, 0, 255]));

        let right = crop_to_box(&img, 100, 100, Focus::new(100.0, 50.0));
        assert_eq!(right.get_pixel(50, 50), &Rgba([0, 0, 255, 255]));

        let center = crop_to_box(&img, 100, 100, Focus::default());
        assert_eq!(center.get_pixel(10, 50), &Rgba([255, 0, 0, 255]));
        assert_eq!(center.get_pixel(90, 50), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_fit_cover_and_contain() {
        let img = solid(200, 100, [0, 128, 0, 255]);
        let bx = Size::new(100.0, 100.0);

        let cover = fit_to_box(&img, bx, FitMode::Cover, Focus::default());
        assert_eq!(cover.dimensions(), (100, 100));
        assert!(cover.pixels().all(|p| p[3] == 255));

        let contain = fit_to_box(&img, bx, FitMode::Contain, Focus::default());
        assert_eq!(contain.dimensions(), (200, 200));
        // letterbox bands are transparent, the whole image is present
        assert_eq!(contain.get_pixel(100, 10)[3], 0);
        assert_eq!(contain.get_pixel(100, 190)[3], 0);
        let opaque = contain.pixels().filter(|p| p[3] == 255).count();
        assert_eq!(opaque, 200 * 100);

        let fill = fit_to_box(&img, bx, FitMode::Fill, Focus::default());
        assert_eq!(fill.dimensions(), (200, 200));
    }

    #[test]
    fn test_fill_keeps_the_denser_axis() {
        // tall image stretched into a wide banner
        let img = solid(100, 2000, [10, 20, 30, 255]);
        let fill = fit_to_box(&img, Size::new(1280.0, 50.0), FitMode::Fill, Focus::default());
        assert_eq!(fill.dimensions(), (MAX_FIT_EDGE, 160));
    }

    #[test]
    fn test_contain_canvas_is_bounded() {
        let img = solid(1000, 3000, [10, 20, 30, 255]);
        let contain = fit_to_box(&img, Size::new(1280.0, 100.0), FitMode::Contain, Focus::default());
        assert_eq!(contain.dimensions(), (MAX_FIT_EDGE, 320));
        assert_eq!(contain.get_pixel(0, 160)[3], 0);
        assert_eq!(contain.get_pixel(MAX_FIT_EDGE - 1, 160)[3], 0);
        assert!(contain.get_pixel(2048, 160)[3] >= 250);
    }

    #[test]
    fn test_pipeline_order_and_radius_scaling() {
        let img = solid(100, 100, [0, 0, 0, 255]);
        let mut pipeline = ImagePipeline::new(Size::new(50.0, 50.0));
        pipeline.invert = true;
        pipeline.opacity = Some(0.5);
        pipeline.mask = Some(Mask::Rounded([10.0; 4]));
        let out = pipeline.apply(&img);

        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(out.get_pixel(50, 50), &Rgba([255, 255, 255, 128]));
        // 10pt radius on a 50pt box is 20px on a 100px image
        assert_eq!(out.get_pixel(3, 3)[3], 0);
        assert_eq!(out.get_pixel(20, 0)[3], 128);
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_png(&solid(3, 3, [1, 2, 3, 4])).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_opacity_composes(alpha in 0u8..=255, a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let img = solid(1, 1, [50, 60, 70, alpha]);
            let twice = set_opacity(&set_opacity(&img, a), b).get_pixel(0, 0)[3] as i32;
            let once = set_opacity(&img, a * b).get_pixel(0, 0)[3] as i32;
            prop_assert!((twice - once).abs() <= 1, "twice={twice} once={once}");
            prop_assert!(once <= alpha as i32);
        }

        #[test]
        fn prop_invert_is_involution_on_opaque(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let img = solid(1, 1, [r, g, b, 255]);
            prop_assert_eq!(invert(&invert(&img)), img);
        }

        #[test]
        fn prop_masks_never_raise_alpha(w in 1u32..24, h in 1u32..24, alpha in any::<u8>(), r in 0.0f64..20.0) {
            let img = solid(w, h, [90, 90, 90, alpha]);
            let rounded = round_corners(&img, [r; 4]);
            let circle = mask_circle(&img);
            prop_assert!(rounded.pixels().all(|p| p[3] <= alpha));
            prop_assert!(circle.pixels().all(|p| p[3] <= alpha));
        }
    }
}
