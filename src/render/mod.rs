//! Rendering a deck model into a `.pptx` package.
//!
//! ```no_run
//! use deckwright::config::RenderConfig;
//! use deckwright::model::PresentationDocument;
//! use deckwright::render::render_presentation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = PresentationDocument::from_yaml_str("slides: [{}]")?;
//! let report = render_presentation(&doc, &RenderConfig::default(), "scratch", "deck.pptx")?;
//! for warning in &report.warnings {
//!     eprintln!("{}", warning);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Per-shape failures never abort a render; they are collected in the
//! [`RenderReport`]. The scratch directory is only written to, never
//! cleaned up.

mod assembler;
mod picture;
mod shapes;
mod text;

use std::fmt;
use std::path::Path;
#[cfg(feature = "remote-assets")]
use std::time::Duration;

use crate::assets::{AssetFetcher, OfflineFetcher};
use crate::config::RenderConfig;
use crate::error::{RenderError, ShapeError};
use crate::markup::{HtmlSubsetParser, MarkupParser};
use crate::model::PresentationDocument;
use crate::ooxml::opc::PackageWriter;
use crate::ooxml::pptx::MutablePresentation;

use assembler::Assembler;

/// A shape that failed to render, or rendered without one of its effects.
#[derive(Debug)]
pub struct ShapeWarning {
    /// 0-based slide index
    pub slide_index: usize,
    /// 1-based slide number, as shown to users
    pub slide_number: usize,
    /// Index into the slide's shapes followed by the deck-wide shapes
    pub shape_index: usize,
    pub error: ShapeError,
}

impl fmt::Display for ShapeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slide {}, shape {}: {}",
            self.slide_number, self.shape_index, self.error
        )
    }
}

/// Outcome of a successful render.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub slide_count: usize,
    pub warnings: Vec<ShapeWarning>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warnings raised on the given 1-based slide.
    pub fn warnings_for_slide(&self, slide_number: usize) -> impl Iterator<Item = &ShapeWarning> {
        self.warnings
            .iter()
            .filter(move |w| w.slide_number == slide_number)
    }
}

fn default_fetcher(config: &RenderConfig) -> Box<dyn AssetFetcher> {
    #[cfg(feature = "remote-assets")]
    {
        let timeout = Duration::from_secs(config.download_timeout_secs);
        match crate::assets::HttpFetcher::new(timeout) {
            Ok(fetcher) => return Box::new(fetcher),
            Err(e) => tracing::warn!(error = %e, "HTTP client unavailable, remote assets disabled"),
        }
    }
    #[cfg(not(feature = "remote-assets"))]
    let _ = config;
    Box::new(OfflineFetcher)
}

/// Renders decks with one configuration.
pub struct Renderer {
    config: RenderConfig,
    fetcher: Box<dyn AssetFetcher>,
    markup: Box<dyn MarkupParser>,
}

impl Renderer {
    /// Downloads use HTTP when the `remote-assets` feature is on; inline
    /// markup is read with [`HtmlSubsetParser`].
    pub fn new(config: RenderConfig) -> Self {
        let fetcher = default_fetcher(&config);
        Self {
            config,
            fetcher,
            markup: Box::new(HtmlSubsetParser),
        }
    }

    pub fn with_fetcher(mut self, fetcher: impl AssetFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn with_markup_parser(mut self, parser: impl MarkupParser + 'static) -> Self {
        self.markup = Box::new(parser);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn assemble(
        &self,
        doc: &PresentationDocument,
        scratch_dir: &Path,
    ) -> Result<(MutablePresentation, RenderReport), RenderError> {
        Assembler::new(&self.config, self.fetcher.as_ref(), self.markup.as_ref())
            .assemble(doc, scratch_dir)
    }

    /// Render `doc` to `output_path`.
    ///
    /// The package is written in one step; on failure nothing is left at
    /// `output_path`.
    pub fn render(
        &self,
        doc: &PresentationDocument,
        scratch_dir: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<RenderReport, RenderError> {
        let output_path = output_path.as_ref();
        let (pres, report) = self.assemble(doc, scratch_dir.as_ref())?;
        let package = pres.to_package()?;
        PackageWriter::write(output_path, &package).map_err(|e| RenderError::PackageWrite {
            path: output_path.to_path_buf(),
            source: e.into(),
        })?;

        tracing::info!(
            slides = report.slide_count,
            warnings = report.warnings.len(),
            output = %output_path.display(),
            "rendered presentation"
        );
        Ok(report)
    }

    /// Render `doc` to package bytes.
    pub fn render_to_bytes(
        &self,
        doc: &PresentationDocument,
        scratch_dir: impl AsRef<Path>,
    ) -> Result<(Vec<u8>, RenderReport), RenderError> {
        let (pres, report) = self.assemble(doc, scratch_dir.as_ref())?;
        let bytes = pres.to_bytes()?;
        tracing::info!(
            slides = report.slide_count,
            warnings = report.warnings.len(),
            bytes = bytes.len(),
            "rendered presentation"
        );
        Ok((bytes, report))
    }
}

/// Render `doc` to `output_path` with a default [`Renderer`].
pub fn render_presentation(
    doc: &PresentationDocument,
    config: &RenderConfig,
    scratch_dir: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<RenderReport, RenderError> {
    Renderer::new(config.clone()).render(doc, scratch_dir, output_path)
}
