//! Render configuration.
//!
//! Everything the renderer needs from its environment is passed in through
//! [`RenderConfig`]: where site-relative assets live, which public origins
//! are really this host, how long to wait on downloads and how aggressively
//! to clean icon edges.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maps a reference prefix such as `/uploads/` to a local directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMount {
    pub prefix: String,
    pub root: PathBuf,
}

impl AssetMount {
    pub fn new(prefix: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            root: root.into(),
        }
    }
}

/// Thresholds for the icon edge cleanup pass. All values are alpha or
/// channel levels in `0..=255` except `edge_gain`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconCleanupConfig {
    pub enabled: bool,
    /// Alpha below this is forced to fully transparent.
    pub transparent_below: u8,
    /// Pixels whose brightest channel is at most this are "dark".
    pub dark_rgb_max: u8,
    /// Dark pixels with alpha below this are treated as halo and removed.
    pub dark_alpha_below: u8,
    /// Remaining alpha below this snaps to 0.
    pub edge_floor: u8,
    /// Remaining alpha above this snaps to 255.
    pub edge_ceiling: u8,
    /// Multiplier for alpha between floor and ceiling.
    pub edge_gain: f32,
}

impl Default for IconCleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            transparent_below: 25,
            dark_rgb_max: 30,
            dark_alpha_below: 100,
            edge_floor: 30,
            edge_ceiling: 225,
            edge_gain: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Root for `/static/...` references.
    pub static_dir: PathBuf,
    /// Root for `/app-data/...` and `/app_data/...` references, and for
    /// relative references.
    pub app_data_dir: PathBuf,
    /// Additional prefix rewrites, tried after the built-in ones.
    pub mounts: Vec<AssetMount>,
    /// Public base URLs served from the local roots, e.g. `http://localhost:5001`.
    pub local_origins: Vec<String>,
    pub download_timeout_secs: u64,
    /// Render slides concurrently on the rayon pool.
    pub parallel_slides: bool,
    pub icon_cleanup: IconCleanupConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            app_data_dir: PathBuf::from("app_data"),
            mounts: Vec::new(),
            local_origins: Vec::new(),
            download_timeout_secs: 30,
            parallel_slides: false,
            icon_cleanup: IconCleanupConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&input)
    }

    /// All prefix mounts in resolution order: built-ins first.
    pub fn all_mounts(&self) -> Vec<AssetMount> {
        let mut mounts = vec![
            AssetMount::new("/static/", &self.static_dir),
            AssetMount::new("/app-data/", &self.app_data_dir),
            AssetMount::new("/app_data/", &self.app_data_dir),
        ];
        mounts.extend(self.mounts.iter().cloned());
        mounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.download_timeout_secs, 30);
        assert!(!config.parallel_slides);
        assert!(config.icon_cleanup.enabled);
    }

    #[test]
    fn test_from_yaml_fills_defaults() {
        let config = RenderConfig::from_yaml_str(
            r#"
static_dir: /srv/static
local_origins: ["http://localhost:5001"]
mounts:
  - { prefix: /uploads/, root: /srv/uploads }
icon_cleanup:
  edge_gain: 1.5
"#,
        )
        .unwrap();
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.app_data_dir, PathBuf::from("app_data"));
        assert_eq!(config.local_origins, vec!["http://localhost:5001".to_string()]);
        assert_eq!(config.icon_cleanup.edge_gain, 1.5);
        assert_eq!(config.icon_cleanup.transparent_below, 25);

        let mounts = config.all_mounts();
        assert_eq!(mounts.len(), 4);
        assert_eq!(mounts[0].prefix, "/static/");
        assert_eq!(mounts[3].root, PathBuf::from("/srv/uploads"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RenderConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
