//! Asset resolution.
//!
//! Picture shapes reference their image as a local path, a site-relative
//! path (`/static/...`, `/app-data/...`) or a URL. [`AssetResolver`] turns
//! such a reference into a readable local file:
//!
//! 1. a URL on one of the configured local origins is served from the
//!    matching local root when the file exists there;
//! 2. any other URL is downloaded into the slide's scratch directory;
//! 3. a path that exists as given is used directly;
//! 4. a mounted prefix is rewritten to its local root;
//! 5. a relative path is looked up under the app-data directory.
//!
//! Failures are per shape and reported as
//! [`ShapeError::AssetUnavailable`].

pub mod fetch;

use std::path::{Component, Path, PathBuf};

pub use fetch::{AssetFetcher, FetchError, OfflineFetcher};

#[cfg(feature = "remote-assets")]
pub use fetch::HttpFetcher;

use crate::config::{AssetMount, RenderConfig};
use crate::error::ShapeError;
use crate::ooxml::pptx::ImageFormat;

/// Where a resolved asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSource {
    /// The reference was already a readable path
    Local,
    /// A known prefix or origin was rewritten to a local root
    Mounted,
    /// Fetched over the network into the scratch directory
    Downloaded,
}

/// Processing strategy for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Small alpha-bearing artwork from an icon set
    Icon,
    Photo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub path: PathBuf,
    pub source: AssetSource,
    pub kind: AssetKind,
}

/// Classify an asset by where it lives and its file type.
///
/// Icons are PNG or SVG files served from an icon directory.
pub fn classify(reference: &str, resolved: &Path) -> AssetKind {
    let from_icons = reference.contains("/static/icons/")
        || reference.contains("\\static\\icons\\")
        || resolved
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == "icons"));

    let lower = reference
        .split(['?', '#'])
        .next()
        .unwrap_or(reference)
        .to_ascii_lowercase();
    let icon_format = lower.ends_with(".png") || lower.ends_with(".svg");

    if from_icons && icon_format {
        AssetKind::Icon
    } else {
        AssetKind::Photo
    }
}

fn is_remote(reference: &str) -> bool {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Join `rest` onto `root`, refusing anything that could climb out of it.
fn join_inside(root: &Path, rest: &str) -> Option<PathBuf> {
    let rest = Path::new(rest.trim_start_matches('/'));
    rest.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        .then(|| root.join(rest))
}

fn unavailable(reference: &str, reason: impl Into<String>) -> ShapeError {
    ShapeError::AssetUnavailable {
        reference: reference.to_string(),
        reason: reason.into(),
    }
}

/// Maps asset references to local files.
pub struct AssetResolver<'a> {
    mounts: Vec<AssetMount>,
    app_data_dir: PathBuf,
    local_origins: Vec<String>,
    fetcher: &'a dyn AssetFetcher,
}

impl<'a> AssetResolver<'a> {
    pub fn new(config: &RenderConfig, fetcher: &'a dyn AssetFetcher) -> Self {
        Self {
            mounts: config.all_mounts(),
            app_data_dir: config.app_data_dir.clone(),
            local_origins: config
                .local_origins
                .iter()
                .map(|origin| origin.trim_end_matches('/').to_string())
                .collect(),
            fetcher,
        }
    }

    /// Resolve `reference`. Downloads are stored in `scratch_dir` as
    /// `{stem}.{ext}`.
    pub fn resolve(
        &self,
        reference: &str,
        scratch_dir: &Path,
        stem: &str,
    ) -> Result<ResolvedAsset, ShapeError> {
        let (path, source) = self.locate(reference, scratch_dir, stem)?;
        let kind = classify(reference, &path);
        tracing::debug!(reference, path = %path.display(), ?source, ?kind, "resolved asset");
        Ok(ResolvedAsset { path, source, kind })
    }

    fn locate(
        &self,
        reference: &str,
        scratch_dir: &Path,
        stem: &str,
    ) -> Result<(PathBuf, AssetSource), ShapeError> {
        if is_remote(reference) {
            if let Some(path) = self.local_path_for_url(reference)
                && path.is_file()
            {
                return Ok((path, AssetSource::Mounted));
            }
            let path = self.download(reference, scratch_dir, stem)?;
            return Ok((path, AssetSource::Downloaded));
        }

        let path_ref = reference.strip_prefix("file://").unwrap_or(reference);
        let direct = Path::new(path_ref);
        if direct.is_file() {
            return Ok((direct.to_path_buf(), AssetSource::Local));
        }

        if let Some(path) = self.mounted_path(path_ref) {
            return if path.is_file() {
                Ok((path, AssetSource::Mounted))
            } else {
                Err(unavailable(
                    reference,
                    format!("no such file: {}", path.display()),
                ))
            };
        }

        if direct.is_relative()
            && let Some(path) = join_inside(&self.app_data_dir, path_ref)
            && path.is_file()
        {
            return Ok((path, AssetSource::Mounted));
        }

        Err(unavailable(reference, "no such file"))
    }

    /// Local file behind a URL on one of the local origins.
    fn local_path_for_url(&self, url: &str) -> Option<PathBuf> {
        let path = self
            .local_origins
            .iter()
            .find_map(|origin| url.strip_prefix(origin.as_str()))
            .filter(|rest| rest.starts_with('/'))?;
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.mounted_path(path)
    }

    fn mounted_path(&self, path: &str) -> Option<PathBuf> {
        self.mounts.iter().find_map(|mount| {
            path.strip_prefix(mount.prefix.as_str())
                .and_then(|rest| join_inside(&mount.root, rest))
        })
    }

    fn download(&self, url: &str, scratch_dir: &Path, stem: &str) -> Result<PathBuf, ShapeError> {
        let bytes = self
            .fetcher
            .fetch(url)
            .map_err(|e| unavailable(url, e.to_string()))?;

        let ext = ImageFormat::detect_from_bytes(&bytes)
            .map(|format| format.extension())
            .or_else(|| url_extension(url))
            .unwrap_or("bin");
        let path = scratch_dir.join(format!("{}.{}", stem, ext));
        std::fs::write(&path, &bytes)
            .map_err(|e| unavailable(url, format!("cannot store download: {}", e)))?;
        tracing::debug!(url, path = %path.display(), bytes = bytes.len(), "downloaded asset");
        Ok(path)
    }
}

/// Extension of the URL's last path segment, for formats that cannot be
/// sniffed.
fn url_extension(url: &str) -> Option<&'static str> {
    let path = url.split(['?', '#']).next()?;
    let (_, ext) = path.rsplit('/').next()?.rsplit_once('.')?;
    if ext.eq_ignore_ascii_case("svg") {
        Some("svg")
    } else {
        ImageFormat::from_extension(ext).map(|format| format.extension())
    }
}
