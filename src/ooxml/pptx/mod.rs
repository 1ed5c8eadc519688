//! PowerPoint (.pptx) presentation writing.
//!
//! - `writer`: the mutable object model (`MutablePresentation`,
//!   `MutableSlide`, `MutableShape`, text bodies) and its serialization
//!   into an OPC package
//! - `ext`: effects applied directly on property nodes (shadow,
//!   strikethrough, corner radius)
//! - `template`: the fixed master, layout, theme and property parts
//!
//! # Example
//!
//! ```rust,no_run
//! use deckwright::common::{Position, RgbColor};
//! use deckwright::ooxml::pptx::{
//!     FillProperties, MutablePresentation, ShapeProperties, SolidColor, TextBody,
//! };
//!
//! let mut pres = MutablePresentation::new();
//! let slide = pres.add_slide();
//! let mut props = ShapeProperties::new(Position::new(40.0, 40.0, 200.0, 100.0).to_emu(), "rect");
//! props.fill = Some(FillProperties::Solid(SolidColor::opaque(RgbColor::WHITE)));
//! slide.add_autoshape(props, TextBody::default());
//! pres.save("deck.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ext;
pub mod format;
pub mod template;
pub mod writer;

pub use format::ImageFormat;
pub use writer::*;
