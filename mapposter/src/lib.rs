//! Mapposter renders minimalist, print-quality map posters.
//!
//! A poster is a map of the streets, water, parks and buildings around a location, painted in the colors
//! of a theme and one of several render modes, with the name of the place and its coordinates set in a
//! text block at the bottom.
//!
//! # Quick start
//!
//! ```no_run
//! use mapposter::{AssetCache, GeneratorConfig, GeoJsonSource, Location, PosterGenerator, RenderSpec};
//! use mapposter::export::{save, ExportFormat};
//! use mapposter::mapposter_types::latlon;
//!
//! let generator = PosterGenerator::new(GeneratorConfig::default(), GeoJsonSource::new("data/paris"));
//! let cache = AssetCache::default();
//!
//! let location = Location::new(latlon!(48.8566, 2.3522)).with_city("Paris").with_country("France");
//! let spec = RenderSpec::default().with_theme("noir").with_distance(4000.0);
//!
//! let canvas = generator.generate(&location, &spec, None, &cache).unwrap();
//! save(&canvas, "paris.png", ExportFormat::Png).unwrap();
//! ```
//!
//! # Main components
//!
//! * [`PosterGenerator`] runs the pipeline: it loads the [`Theme`] and the fonts, picks the layers to
//!   render with the [`LodPolicy`], fetches features from a [`GeoDataSource`], paints them with the
//!   [`compositor`] of the render mode and draws the [`typography`] layout on top.
//! * [`AssetCache`] keeps loaded themes and fonts between renders. It is owned by the caller.
//! * [`export`] writes the finished [`Canvas`] as PNG or JPEG.
//!
//! Every failure is a [`PosterError`], and [`PosterError::stage`] tells which step of the pipeline
//! produced it.

mod cache;
mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod font;
mod generator;
pub mod layer;
mod location;
mod lod;
mod paper;
pub mod render;
mod render_spec;
pub mod theme;
pub mod typography;

pub use cache::AssetCache;
pub use color::{Color, ColorParseError};
pub use compositor::{Compositor, RenderMode};
pub use config::GeneratorConfig;
pub use error::{PosterError, Stage};
#[cfg(feature = "geojson")]
pub use fetch::GeoJsonSource;
pub use fetch::{GeoDataSource, MemorySource};
pub use generator::PosterGenerator;
pub use layer::{Feature, LayerKind, LayerSet};
pub use location::Location;
pub use lod::{LodPolicy, LodTier};
pub use paper::PaperSize;
pub use render::Canvas;
pub use render_spec::{
    Alignment, ColorOverrides, Personalization, RenderSpec, TextPlacement, DEFAULT_EDGE_FADE,
    MAX_EDGE_FADE,
};
pub use theme::{Theme, ThemeStore};

// Reexport mapposter_types
pub use mapposter_types;

#[cfg(test)]
mod tests;
