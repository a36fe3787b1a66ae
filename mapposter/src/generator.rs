//! Poster generation pipeline.

use std::sync::Arc;

use log::{debug, info};

use crate::cache::AssetCache;
use crate::compositor::{composite, RenderMode};
use crate::config::GeneratorConfig;
use crate::error::PosterError;
use crate::fetch::{FeatureFetcher, GeoDataSource};
use crate::font::FontStore;
use crate::layer::LayerSet;
use crate::location::Location;
use crate::lod::LodPolicy;
use crate::paper::PaperSize;
use crate::render::{draw_text, Canvas, MapView};
use crate::render_spec::{RenderSpec, MAX_EDGE_FADE};
use crate::theme::{Theme, ThemeStore};
use crate::typography::layout;

/// Renders posters from the features of a geographic data source.
///
/// The generator holds no state between renders. Themes and fonts are memoized in the [`AssetCache`]
/// passed to [`PosterGenerator::generate`], so one generator can serve renders sharing or not sharing a
/// cache.
#[derive(Debug)]
pub struct PosterGenerator<S> {
    config: GeneratorConfig,
    themes: ThemeStore,
    fonts: FontStore,
    source: S,
    lod: LodPolicy,
}

impl<S: GeoDataSource> PosterGenerator<S> {
    /// Creates a generator reading themes and fonts from the directories of the config.
    pub fn new(config: GeneratorConfig, source: S) -> Self {
        Self {
            themes: ThemeStore::new(&config.themes_dir),
            fonts: FontStore::new(&config.fonts_dir),
            config,
            source,
            lod: LodPolicy::default(),
        }
    }

    /// Replaces the font store, e.g. to register custom families.
    pub fn with_font_store(mut self, fonts: FontStore) -> Self {
        self.fonts = fonts;
        self
    }

    /// Replaces the level of detail policy.
    pub fn with_lod_policy(mut self, lod: LodPolicy) -> Self {
        self.lod = lod;
        self
    }

    /// Configuration of the generator.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Store the themes are loaded from.
    pub fn themes(&self) -> &ThemeStore {
        &self.themes
    }

    /// Store the fonts are loaded from.
    pub fn fonts(&self) -> &FontStore {
        &self.fonts
    }

    /// Level of detail policy.
    pub fn lod_policy(&self) -> &LodPolicy {
        &self.lod
    }

    /// Geographic data source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Renders a poster.
    ///
    /// With `mode` set to `None` the mode declared by the theme is used, or the standard mode if the theme
    /// declares none. The render fails on the first error; [`PosterError::stage`] tells which step failed.
    pub fn generate(
        &self,
        location: &Location,
        spec: &RenderSpec,
        mode: Option<RenderMode>,
        cache: &AssetCache,
    ) -> Result<Canvas, PosterError> {
        let theme = self.resolve_theme(spec, cache)?;
        info!("Using theme '{}'", theme.name());

        let fonts = cache.fonts(&self.fonts, &spec.font)?;
        info!("Using font family '{}'", fonts.family());

        check_location(location)?;
        self.check_distance(spec.distance)?;
        check_edge_fade(spec.edge_fade)?;
        let paper: PaperSize = spec.paper_size.parse()?;
        let text_layout = layout(spec, location, theme.colors().text, fonts.as_ref())?;

        let mode = mode.or(theme.mode()).unwrap_or_default();
        let active_layers = self
            .lod
            .active_layers(spec.distance, spec.layers.as_ref());
        info!(
            "Rendering {} mode, {} m around {:?}, layers: {active_layers:?}",
            mode, spec.distance, location.point
        );

        let layers: LayerSet =
            FeatureFetcher::new(&self.source).fetch(location.point, spec.distance, &active_layers)?;
        info!(
            "Fetched {} features, skipped layers: {:?}",
            layers.feature_count(),
            layers.skipped()
        );

        let mut canvas = Canvas::new(paper.pixel_size(spec.dpi), spec.dpi)?;
        let view = MapView::new(location.point, spec.distance, canvas.size());
        debug!(
            "Canvas {}x{} px at {} dpi, {:.4} px/m",
            canvas.width(),
            canvas.height(),
            spec.dpi,
            view.pixels_per_meter()
        );

        composite(mode.compositor(), &mut canvas, &view, &layers, &theme, spec);
        draw_text(&mut canvas, &text_layout, &fonts);
        info!("Poster rendered");

        Ok(canvas)
    }

    fn resolve_theme(&self, spec: &RenderSpec, cache: &AssetCache) -> Result<Arc<Theme>, PosterError> {
        let theme = cache.theme(&self.themes, &spec.theme)?;
        let overrides = &spec.personalization.colors;
        if overrides.is_empty() {
            return Ok(theme);
        }

        debug!("Applying color overrides to theme '{}'", theme.name());
        Ok(Arc::new(theme.with_overrides(overrides)))
    }

    fn check_distance(&self, distance: f64) -> Result<(), PosterError> {
        let max = self.config.max_distance;
        if distance.is_finite() && distance > 0.0 && distance <= max {
            Ok(())
        } else {
            Err(PosterError::DistanceOutOfRange { distance, max })
        }
    }
}

fn check_location(location: &Location) -> Result<(), PosterError> {
    let point = location.point;
    if point.is_valid() {
        Ok(())
    } else {
        Err(PosterError::InvalidLocation {
            lat: point.lat(),
            lon: point.lon(),
        })
    }
}

fn check_edge_fade(band: f32) -> Result<(), PosterError> {
    if (0.0..=MAX_EDGE_FADE).contains(&band) {
        Ok(())
    } else {
        Err(PosterError::EdgeFadeOutOfRange { band })
    }
}
