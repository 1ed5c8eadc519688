//! Error types.
//!
//! Rendering distinguishes two severities. [`RenderError`] aborts the whole
//! render and no output is written. [`ShapeError`] is scoped to one shape:
//! it is collected into the render report and the deck still renders.

use std::path::PathBuf;

use thiserror::Error;

use crate::ooxml::OoxmlError;

/// Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for fallible library calls outside rendering.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal render failures.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The package could not be serialized to the output path. Nothing was
    /// left at that path.
    #[error("failed to write package to {path}: {source}")]
    PackageWrite {
        path: PathBuf,
        #[source]
        source: OoxmlError,
    },

    /// A scratch subdirectory could not be created.
    #[error("scratch directory {path} is not writable: {source}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory document could not be assembled.
    #[error("failed to assemble presentation: {0}")]
    Ooxml(#[from] OoxmlError),
}

/// Per-shape failures. None of these abort the deck.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// The picture reference could not be turned into local bytes.
    #[error("asset unavailable: {reference}: {reason}")]
    AssetUnavailable { reference: String, reason: String },

    /// The bytes behind a picture reference are not a decodable image.
    #[error("cannot decode image {reference}: {reason}")]
    ImageDecode { reference: String, reason: String },

    /// An effect was requested that the shape's geometry cannot express.
    /// The shape is still rendered without it.
    #[error("{shape} does not support {effect}")]
    UnsupportedAdjustment { shape: String, effect: String },

    /// A processed image could not be written to the scratch directory.
    #[error("cannot encode processed image {path}: {reason}")]
    ImageEncode { path: PathBuf, reason: String },
}

impl ShapeError {
    /// Whether the shape was dropped from the slide.
    pub fn is_skipped(&self) -> bool {
        !matches!(self, ShapeError::UnsupportedAdjustment { .. })
    }
}

/// Configuration and deck loading failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Parse(String),
}
