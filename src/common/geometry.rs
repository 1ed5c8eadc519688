//! Layout geometry: shape boxes, margins, and object-fit placement.
//!
//! Everything here works in abstract units; callers decide whether the
//! numbers are points or pixels.

use serde::{Deserialize, Serialize};

use super::unit::pt_to_emu;

/// A shape box in points, measured from the slide's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Per-side inset in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// The same box in EMU, ready for `a:off` / `a:ext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmuRect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Position {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Shrink the box by `margin` on every side.
    ///
    /// Width and height never go negative.
    pub fn inset(&self, margin: Option<&Margin>) -> Position {
        let m = margin.copied().unwrap_or_default();
        Position {
            left: self.left + m.left,
            top: self.top + m.top,
            width: (self.width - m.left - m.right).max(0.0),
            height: (self.height - m.top - m.bottom).max(0.0),
        }
    }

    /// Corner coordinates `(left, top, right, bottom)`.
    pub fn to_xyxy(&self) -> (f64, f64, f64, f64) {
        (
            self.left,
            self.top,
            self.left + self.width,
            self.top + self.height,
        )
    }

    pub fn to_emu(&self) -> EmuRect {
        EmuRect {
            x: pt_to_emu(self.left),
            y: pt_to_emu(self.top),
            cx: pt_to_emu(self.width.max(0.0)),
            cy: pt_to_emu(self.height.max(0.0)),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[inline]
    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn covering(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }
}

/// How an image is sized into its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to fit entirely inside the box, leaving empty bands.
    #[default]
    Contain,
    /// Scale to fill the box, cropping the overflow.
    Cover,
    /// Stretch to the box, ignoring aspect ratio.
    Fill,
}

/// Focal point in percent of each axis. `(50, 50)` centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Focus {
    pub x: f64,
    pub y: f64,
}

impl Default for Focus {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

impl Focus {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }.clamped()
    }

    /// Both coordinates clamped into `[0, 100]`. NaN falls back to center.
    pub fn clamped(self) -> Self {
        let clamp = |v: f64| if v.is_nan() { 50.0 } else { v.clamp(0.0, 100.0) };
        Self {
            x: clamp(self.x),
            y: clamp(self.y),
        }
    }
}

/// Result of [`fit_box`]: which part of the image is shown and where it lands in the box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitPlacement {
    /// Region of the source image, in image units.
    pub source: Rect,
    /// Region of the box the source region is drawn into, in box units.
    pub dest: Rect,
}

/// Compute how an `image` of the given size is placed into `bx`.
///
/// Degenerate inputs (any zero or negative dimension) place the whole
/// image over the whole box.
pub fn fit_box(image: Size, bx: Size, mode: FitMode, focus: Focus) -> FitPlacement {
    if image.is_degenerate() || bx.is_degenerate() {
        return FitPlacement {
            source: Rect::covering(image),
            dest: Rect::covering(bx),
        };
    }
    let focus = focus.clamped();

    match mode {
        FitMode::Fill => FitPlacement {
            source: Rect::covering(image),
            dest: Rect::covering(bx),
        },
        FitMode::Contain => {
            let scale = (bx.width / image.width).min(bx.height / image.height);
            let width = image.width * scale;
            let height = image.height * scale;
            FitPlacement {
                source: Rect::covering(image),
                dest: Rect::new(
                    (bx.width - width) * focus.x / 100.0,
                    (bx.height - height) * focus.y / 100.0,
                    width,
                    height,
                ),
            }
        },
        FitMode::Cover => {
            let scale = (bx.width / image.width).max(bx.height / image.height);
            let width = bx.width / scale;
            let height = bx.height / scale;
            FitPlacement {
                source: Rect::new(
                    (image.width - width) * focus.x / 100.0,
                    (image.height - height) * focus.y / 100.0,
                    width,
                    height,
                ),
                dest: Rect::covering(bx),
            }
        },
    }
}

/// Clamp each corner radius into `[0, min(width, height) / 2]`.
///
/// Corner order is top-left, top-right, bottom-right, bottom-left.
pub fn clamp_radii(radii: [f64; 4], width: f64, height: f64) -> [f64; 4] {
    let limit = (width.min(height) / 2.0).max(0.0);
    radii.map(|r| if r.is_nan() { 0.0 } else { r.clamp(0.0, limit) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn assert_rect(actual: Rect, expected: Rect) {
        assert!(
            (actual.x - expected.x).abs() < EPS
                && (actual.y - expected.y).abs() < EPS
                && (actual.width - expected.width).abs() < EPS
                && (actual.height - expected.height).abs() < EPS,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_cover_wide_image_centered() {
        let p = fit_box(
            Size::new(200.0, 100.0),
            Size::new(100.0, 100.0),
            FitMode::Cover,
            Focus::default(),
        );
        assert_rect(p.source, Rect::new(50.0, 0.0, 100.0, 100.0));
        assert_rect(p.dest, Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_cover_focus_left() {
        let p = fit_box(
            Size::new(200.0, 100.0),
            Size::new(100.0, 100.0),
            FitMode::Cover,
            Focus::new(0.0, 50.0),
        );
        assert_rect(p.source, Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_contain_wide_image_letterboxed() {
        let p = fit_box(
            Size::new(200.0, 100.0),
            Size::new(100.0, 100.0),
            FitMode::Contain,
            Focus::default(),
        );
        assert_rect(p.source, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_rect(p.dest, Rect::new(0.0, 25.0, 100.0, 50.0));
    }

    #[test]
    fn test_fill_ignores_aspect() {
        let p = fit_box(
            Size::new(30.0, 10.0),
            Size::new(10.0, 40.0),
            FitMode::Fill,
            Focus::default(),
        );
        assert_rect(p.source, Rect::new(0.0, 0.0, 30.0, 10.0));
        assert_rect(p.dest, Rect::new(0.0, 0.0, 10.0, 40.0));
    }

    #[test]
    fn test_degenerate_sizes() {
        let p = fit_box(
            Size::new(0.0, 10.0),
            Size::new(10.0, 10.0),
            FitMode::Cover,
            Focus::default(),
        );
        assert_rect(p.source, Rect::new(0.0, 0.0, 0.0, 10.0));
        assert_rect(p.dest, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_focus_clamped() {
        let f = Focus::new(-20.0, 140.0);
        assert_eq!(f, Focus { x: 0.0, y: 100.0 });
        assert_eq!(Focus { x: f64::NAN, y: 10.0 }.clamped().x, 50.0);
    }

    #[test]
    fn test_inset_and_emu() {
        let pos = Position::new(10.0, 20.0, 100.0, 50.0);
        let margin = Margin {
            left: 5.0,
            top: 5.0,
            right: 5.0,
            bottom: 60.0,
        };
        let inner = pos.inset(Some(&margin));
        assert_eq!(inner, Position::new(15.0, 25.0, 90.0, 0.0));
        assert_eq!(pos.inset(None), pos);

        let emu = pos.to_emu();
        assert_eq!(emu.x, 127_000);
        assert_eq!(emu.cy, 635_000);
        assert_eq!(pos.to_xyxy(), (10.0, 20.0, 110.0, 70.0));
    }

    #[test]
    fn test_clamp_radii() {
        assert_eq!(
            clamp_radii([10.0, -1.0, 80.0, f64::NAN], 100.0, 60.0),
            [10.0, 0.0, 30.0, 0.0]
        );
    }

    fn dims() -> impl Strategy<Value = f64> {
        1.0f64..4000.0
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_cover_fills_box_and_stays_in_image(
            iw in dims(), ih in dims(), bw in dims(), bh in dims(),
            fx in -50.0f64..150.0, fy in -50.0f64..150.0,
        ) {
            let p = fit_box(Size::new(iw, ih), Size::new(bw, bh), FitMode::Cover, Focus { x: fx, y: fy });
            prop_assert!((p.dest.width - bw).abs() < 1e-6);
            prop_assert!((p.dest.height - bh).abs() < 1e-6);
            prop_assert!(p.source.x >= -1e-6 && p.source.y >= -1e-6);
            prop_assert!(p.source.x + p.source.width <= iw + 1e-6);
            prop_assert!(p.source.y + p.source.height <= ih + 1e-6);
            // aspect of the shown region matches the box
            prop_assert!((p.source.width / p.source.height - bw / bh).abs() / (bw / bh) < 1e-6);
        }

        #[test]
        fn prop_contain_keeps_whole_image_inside_box(
            iw in dims(), ih in dims(), bw in dims(), bh in dims(),
            fx in 0.0f64..100.0, fy in 0.0f64..100.0,
        ) {
            let p = fit_box(Size::new(iw, ih), Size::new(bw, bh), FitMode::Contain, Focus { x: fx, y: fy });
            prop_assert_eq!(p.source, Rect::new(0.0, 0.0, iw, ih));
            prop_assert!(p.dest.x >= -1e-6 && p.dest.y >= -1e-6);
            prop_assert!(p.dest.x + p.dest.width <= bw + 1e-6);
            prop_assert!(p.dest.y + p.dest.height <= bh + 1e-6);
            prop_assert!((p.dest.width / p.dest.height - iw / ih).abs() / (iw / ih) < 1e-6);
        }

        #[test]
        fn prop_inset_never_negative(
            left in -1000.0f64..1000.0, top in -1000.0f64..1000.0,
            width in -100.0f64..2000.0, height in -100.0f64..2000.0,
            margin in proptest::array::uniform4(-500.0f64..5000.0),
        ) {
            let position = Position::new(left, top, width, height);
            let [ml, mt, mr, mb] = margin;
            let margin = Margin { left: ml, top: mt, right: mr, bottom: mb };
            for inset in [position.inset(Some(&margin)), position.inset(None)] {
                prop_assert!(inset.width >= 0.0, "width {}", inset.width);
                prop_assert!(inset.height >= 0.0, "height {}", inset.height);
            }
            let inset = position.inset(Some(&margin));
            prop_assert!((inset.left - (left + ml)).abs() < 1e-9);
            prop_assert!((inset.top - (top + mt)).abs() < 1e-9);
        }

        #[test]
        fn prop_clamped_radii_fit(r in proptest::array::uniform4(-100.0f64..500.0), w in 0.0f64..400.0, h in 0.0f64..400.0) {
            for c in clamp_radii(r, w, h) {
                prop_assert!(c >= 0.0 && c <= w.min(h) / 2.0);
            }
        }
    }
}
