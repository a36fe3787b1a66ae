//! Generator configuration and default values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Resolution used for on-screen previews.
pub const PREVIEW_DPI: u32 = 150;
/// Resolution used for print output.
pub const OUTPUT_DPI: u32 = 600;
/// Default search radius in meters.
pub const DEFAULT_DISTANCE: f64 = 8000.0;
/// Default paper preset.
pub const DEFAULT_PAPER_SIZE: &str = "A4";
/// Default theme name.
pub const DEFAULT_THEME: &str = "feature_based";
/// Default font family id.
pub const DEFAULT_FONT: &str = "roboto";
/// Default largest allowed search radius in meters.
pub const DEFAULT_MAX_DISTANCE: f64 = 50_000.0;
/// Default number of entries kept by [`AssetCache`](crate::AssetCache).
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Settings of a [`PosterGenerator`](crate::PosterGenerator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory with `<name>.json` theme files.
    pub themes_dir: PathBuf,
    /// Directory with font files.
    pub fonts_dir: PathBuf,
    /// Largest allowed search radius in meters.
    pub max_distance: f64,
    /// Capacity of an asset cache created with [`AssetCache::from_config`](crate::AssetCache::from_config).
    pub cache_capacity: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            themes_dir: PathBuf::from("themes"),
            fonts_dir: PathBuf::from("fonts"),
            max_distance: DEFAULT_MAX_DISTANCE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
