//! Deckwright - renders slide deck models into PowerPoint (.pptx) packages
//!
//! A deck is described as plain data ([`model::PresentationDocument`]):
//! slides holding positioned pictures, autoshapes, text boxes and
//! connectors with their styling. The renderer resolves image references,
//! processes pixels where the styling asks for it, and writes a complete
//! PresentationML package.
//!
//! # Features
//!
//! - **Shapes**: preset autoshapes with fill, outline, drop shadow and corner
//!   rounding; text boxes; straight, elbow and curved connectors
//! - **Text**: paragraphs with alignment, spacing and line height; runs from
//!   explicit formatting or inline HTML-like markup
//! - **Pictures**: circle and rounded-corner masks, opacity, inversion and
//!   object fit, rendered with anti-aliased edges
//! - **Assets**: local paths, mounted site prefixes and remote URLs
//! - **Resilience**: a failing shape is reported, never fatal to the deck
//!
//! # Example - Rendering a deck
//!
//! ```no_run
//! use deckwright::config::RenderConfig;
//! use deckwright::model::PresentationDocument;
//! use deckwright::render::Renderer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = PresentationDocument::from_yaml_str(&std::fs::read_to_string("deck.yaml")?)?;
//! let config = RenderConfig::load("render.yaml")?;
//!
//! let report = Renderer::new(config).render(&doc, "/tmp/deck-scratch", "deck.pptx")?;
//! println!("{} slides, {} warnings", report.slide_count, report.warnings.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Writing slides directly
//!
//! ```no_run
//! use deckwright::common::{Position, RgbColor};
//! use deckwright::ooxml::pptx::{
//!     BodyProperties, FillProperties, MutablePresentation, ShapeProperties, SolidColor, TextBody,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut pres = MutablePresentation::new();
//! let slide = pres.add_slide();
//!
//! let mut props = ShapeProperties::new(Position::new(40.0, 40.0, 200.0, 80.0).to_emu(), "roundRect");
//! props.fill = Some(FillProperties::Solid(SolidColor::opaque(RgbColor::new(0x1F, 0x4E, 0x79))));
//! slide.add_autoshape(props, TextBody::new(BodyProperties::default()));
//!
//! pres.save("shapes.pptx")?;
//! # Ok(())
//! # }
//! ```

/// Resolution of picture references to local files
pub mod assets;

/// Units, geometry, colors and XML helpers
pub mod common;

/// Render configuration loaded from YAML
pub mod config;

pub mod error;

/// Pixel processing for pictures
pub mod images;

/// Inline markup to text runs
pub mod markup;

/// The deck model handed to the renderer
pub mod model;

/// Office Open XML packaging and PresentationML writing
pub mod ooxml;

/// Deck model to package
pub mod render;

pub use error::{ConfigError, Error, RenderError, Result, ShapeError};
pub use render::{RenderReport, Renderer, ShapeWarning, render_presentation};
