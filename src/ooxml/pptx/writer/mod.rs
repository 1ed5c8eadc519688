//! Mutable presentation writer components for PPTX.

mod package;
pub mod pres;
pub(crate) mod relmap;
pub mod shape;
pub mod slide;
pub mod text;

// Re-export main types
pub use pres::MutablePresentation;
pub use shape::{
    Adjustment, EffectList, FillProperties, LineProperties, MutableShape, OuterShadow,
    PresetGeometry, ShapeProperties, SolidColor,
};
pub use slide::MutableSlide;
pub use text::{
    BodyProperties, ParagraphProperties, Run, RunProperties, StrikeKind, TextAlign, TextAnchor,
    TextBody, TextParagraph,
};
