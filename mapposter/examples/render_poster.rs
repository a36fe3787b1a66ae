//! Renders a poster from a directory of GeoJSON extracts.
//!
//! ```text
//! cargo run --example render_poster -- <geojson dir> <lat> <lon> <city> <country> [theme] [mode]
//! ```
//!
//! Themes are read from `themes/` and fonts from `fonts/` of the working directory. The poster is saved
//! as `poster.png`.

use anyhow::{bail, Context};
use mapposter::config::PREVIEW_DPI;
use mapposter::export::{save, ExportFormat};
use mapposter::mapposter_types::latlon;
use mapposter::{
    AssetCache, GeneratorConfig, GeoJsonSource, Location, PosterGenerator, RenderMode, RenderSpec,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [path, lat, lon, city, country, rest @ ..] = &args[..] else {
        bail!("usage: render_poster <geojson dir> <lat> <lon> <city> <country> [theme] [mode]");
    };

    let lat: f64 = lat.parse().context("invalid latitude")?;
    let lon: f64 = lon.parse().context("invalid longitude")?;
    let theme = rest.first().map(String::as_str).unwrap_or("noir");
    let mode = rest
        .get(1)
        .map(|mode| mode.parse::<RenderMode>())
        .transpose()?;

    let config = GeneratorConfig::default();
    let cache = AssetCache::from_config(&config);
    let generator = PosterGenerator::new(config, GeoJsonSource::new(path));

    let location = Location::new(latlon!(lat, lon))
        .with_city(city)
        .with_country(country);
    let spec = RenderSpec::default()
        .with_theme(theme)
        .with_dpi(PREVIEW_DPI)
        .with_distance(4000.0);

    let canvas = generator.generate(&location, &spec, mode, &cache)?;
    save(&canvas, "poster.png", ExportFormat::Png)?;

    Ok(())
}
