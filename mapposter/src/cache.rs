//! Memoization of themes and font bundles between renders.

use std::sync::Arc;

use log::debug;
use quick_cache::sync::Cache;

use crate::config::GeneratorConfig;
use crate::font::{FontBundle, FontError, FontStore};
use crate::theme::{Theme, ThemeError, ThemeStore};

/// Themes and font bundles loaded by previous renders.
///
/// The cache is owned by the caller and passed to every [`PosterGenerator::generate`](crate::PosterGenerator::generate)
/// call, so renders sharing a cache read each theme file and font file once. Failed loads are not cached.
/// Cached values are immutable; themes with overrides are derived copies and never stored back.
pub struct AssetCache {
    themes: Cache<String, Arc<Theme>>,
    fonts: Cache<String, Arc<FontBundle>>,
}

impl AssetCache {
    /// Creates a cache holding up to `capacity` themes and as many font bundles.
    pub fn new(capacity: usize) -> Self {
        Self {
            themes: Cache::new(capacity.max(1)),
            fonts: Cache::new(capacity.max(1)),
        }
    }

    /// Creates a cache with the capacity from the config.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.cache_capacity)
    }

    /// Returns the theme with the given name, loading it from the store on the first request.
    pub fn theme(&self, store: &ThemeStore, name: &str) -> Result<Arc<Theme>, ThemeError> {
        if let Some(theme) = self.themes.get(name) {
            debug!("Theme '{name}' found in cache");
            return Ok(theme);
        }

        let theme = Arc::new(store.load(name)?);
        self.themes.insert(name.to_string(), theme.clone());
        Ok(theme)
    }

    /// Returns the font bundle of the family, loading it from the store on the first request.
    pub fn fonts(&self, store: &FontStore, id: &str) -> Result<Arc<FontBundle>, FontError> {
        if let Some(fonts) = self.fonts.get(id) {
            debug!("Font family '{id}' found in cache");
            return Ok(fonts);
        }

        let fonts = Arc::new(store.load(id)?);
        self.fonts.insert(id.to_string(), fonts.clone());
        Ok(fonts)
    }

    /// Number of cached themes and font bundles.
    pub fn len(&self) -> usize {
        self.themes.len() + self.fonts.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all cached values.
    pub fn clear(&self) {
        self.themes.clear();
        self.fonts.clear();
    }
}

impl Default for AssetCache {
    fn default() -> Self {
        Self::from_config(&GeneratorConfig::default())
    }
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("themes", &self.themes.len())
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::tests::{font_store, theme_json, write_theme, TEST_FONT};

    #[test]
    fn themes_are_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        write_theme(dir.path(), "noir", &theme_json());
        let store = ThemeStore::new(dir.path());
        let cache = AssetCache::new(4);

        let first = cache.theme(&store, "noir").unwrap();
        std::fs::remove_file(dir.path().join("noir.json")).unwrap();
        let second = cache.theme(&store, "noir").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path());
        let cache = AssetCache::new(4);

        assert_matches!(cache.theme(&store, "noir"), Err(ThemeError::NotFound(_)));
        assert!(cache.is_empty());

        write_theme(dir.path(), "noir", &theme_json());
        assert!(cache.theme(&store, "noir").is_ok());
    }

    #[test]
    fn fonts_are_shared() {
        let store = font_store();
        let cache = AssetCache::new(4);

        let first = cache.fonts(&store, TEST_FONT).unwrap();
        let second = cache.fonts(&store, TEST_FONT).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        assert_matches!(cache.fonts(&store, "comic"), Err(FontError::UnknownFamily(_)));

        cache.clear();
        assert!(cache.is_empty());
    }
}
