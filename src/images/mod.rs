//! Image processing for picture shapes.
//!
//! - [`process`]: masks, opacity, inversion, fit and crop
//! - [`icon`]: edge cleanup for icons with soft alpha

pub mod icon;
pub mod process;

pub use icon::{AlphaHistogram, clean_icon};
pub use process::{
    ImagePipeline, MAX_FIT_EDGE, Mask, crop_to_box, encode_png, fit_to_box, invert, mask_circle,
    round_corners, set_opacity,
};
