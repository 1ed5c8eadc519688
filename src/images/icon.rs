//! Edge cleanup for alpha-bearing icon assets.
//!
//! Icons exported with soft, semi-transparent edges pick up a dark fringe in
//! viewers that flatten transparency against an opaque background. This pass
//! removes near-invisible and dark halo pixels and steepens the remaining
//! edge ramp.

use image::RgbaImage;

use crate::config::IconCleanupConfig;

/// Counts of pixels by alpha class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlphaHistogram {
    pub transparent: u64,
    /// `0 < alpha < 255`
    pub partial: u64,
    /// Partial pixels whose color is dark enough to be a halo.
    pub dark_partial: u64,
    pub opaque: u64,
}

impl AlphaHistogram {
    pub fn of(image: &RgbaImage, config: &IconCleanupConfig) -> Self {
        let mut hist = AlphaHistogram::default();
        for pixel in image.pixels() {
            match pixel[3] {
                0 => hist.transparent += 1,
                255 => hist.opaque += 1,
                _ => {
                    hist.partial += 1;
                    if is_dark(pixel.0, config) {
                        hist.dark_partial += 1;
                    }
                },
            }
        }
        hist
    }
}

#[inline]
fn is_dark([r, g, b, _]: [u8; 4], config: &IconCleanupConfig) -> bool {
    r.max(g).max(b) <= config.dark_rgb_max
}

/// Clean the edges of an icon.
///
/// Returns `None` when the image has no semi-transparent pixels (or cleanup
/// is disabled) and the original should be used as is.
pub fn clean_icon(image: &RgbaImage, config: &IconCleanupConfig) -> Option<RgbaImage> {
    if !config.enabled {
        return None;
    }
    let hist = AlphaHistogram::of(image, config);
    if hist.partial == 0 {
        return None;
    }
    tracing::debug!(
        partial = hist.partial,
        dark_partial = hist.dark_partial,
        "cleaning icon edges"
    );

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let alpha = pixel[3];
        if alpha == 255 {
            continue;
        }
        let cleaned = if alpha < config.transparent_below
            || (alpha < config.dark_alpha_below && is_dark(pixel.0, config))
            || alpha < config.edge_floor
        {
            0
        } else if alpha > config.edge_ceiling {
            255
        } else {
            (alpha as f32 * config.edge_gain).round().min(255.0) as u8
        };
        if cleaned == 0 {
            pixel.0 = [0, 0, 0, 0];
        } else {
            pixel[3] = cleaned;
        }
    }
    Some(out)
}
