use std::path::Path;

use geo_types::{Coord, LineString, Polygon};
use mapposter_types::{latlon, GeoPoint, LocalMercator, Size};
use nalgebra::Point2;
use serde_json::{json, Value};

use crate::compositor::{composite, RenderMode};
use crate::font::{FontFamily, FontStore};
use crate::layer::{Feature, LayerKind, LayerSet, Tags};
use crate::render::{Canvas, MapView};
use crate::render_spec::RenderSpec;
use crate::theme::Theme;

pub const TEST_FONT: &str = "dejavu";

/// Pixel on the motorway crossing the center of [`render_sample`].
pub const ROAD_PROBE: (u32, u32) = (100, 100);
/// Pixel inside the central building, away from roads and outlines.
pub const BUILDING_PROBE: (u32, u32) = (100, 85);
/// Pixel inside the park around the building.
pub const PARK_PROBE: (u32, u32) = (130, 70);
/// Pixel with no features.
pub const EMPTY_PROBE: (u32, u32) = (70, 40);
/// Pixel on the hedge south-east of the park.
pub const HEDGE_PROBE: (u32, u32) = (150, 130);

pub fn theme_json() -> Value {
    json!({
        "bg": "#F5F2EC",
        "text": "#202020",
        "gradient_color": "#6080A0",
        "water": "#A8C8E0",
        "parks": "#C8DCB4",
        "road_motorway": "#303030",
        "road_primary": "#404040",
        "road_secondary": "#505050",
        "road_tertiary": "#606060",
        "road_residential": "#707070",
        "road_default": "#808080",
        "buildings_fill": "#D8C8B8",
        "buildings_edge": "#A09080"
    })
}

pub fn write_theme(dir: &Path, name: &str, value: &Value) {
    let contents = serde_json::to_string_pretty(value).unwrap();
    std::fs::write(dir.join(format!("{name}.json")), contents).unwrap();
}

pub fn sample_theme() -> Theme {
    let mut value = theme_json();
    value["road_width_motorway"] = json!(20);
    Theme::from_json("sample", value).unwrap()
}

pub fn night_theme() -> Theme {
    Theme::from_json(
        "night",
        json!({
            "bg": "#05050A",
            "text": "#E0E0F0",
            "gradient_color": "#05050A",
            "water": "#0A1020",
            "parks": "#080C0A",
            "road_motorway": "#FF9A40",
            "road_primary": "#FFB060",
            "road_secondary": "#E08040",
            "road_tertiary": "#C07030",
            "road_residential": "#A06028",
            "road_default": "#805020",
            "mode": "night_lights"
        }),
    )
    .unwrap()
}

pub fn font_store() -> FontStore {
    FontStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/fonts")).with_family(
        FontFamily::new(
            TEST_FONT,
            "DejaVu Sans",
            "DejaVuSans-Bold.ttf",
            "DejaVuSans.ttf",
            "DejaVuSans-ExtraLight.ttf",
        ),
    )
}

pub fn berlin() -> GeoPoint {
    latlon!(52.52, 13.405)
}

/// View 2000 meters tall around [`berlin`].
pub fn berlin_view(size: Size<u32>) -> MapView {
    MapView::new(berlin(), 1000.0, size)
}

/// Coordinate `east` and `north` meters away from [`berlin`].
pub fn offset(east: f64, north: f64) -> Coord<f64> {
    let point = LocalMercator::new(berlin())
        .unproject(&Point2::new(east, north))
        .unwrap();
    point.into()
}

/// Square with the center `east` and `north` meters away from [`berlin`].
pub fn square(east: f64, north: f64, half_size: f64) -> Polygon<f64> {
    let ring: LineString<f64> = vec![
        offset(east - half_size, north - half_size),
        offset(east + half_size, north - half_size),
        offset(east + half_size, north + half_size),
        offset(east - half_size, north + half_size),
        offset(east - half_size, north - half_size),
    ]
    .into();
    Polygon::new(ring, vec![])
}

fn line(points: &[(f64, f64)]) -> LineString<f64> {
    points
        .iter()
        .map(|&(east, north)| offset(east, north))
        .collect()
}

fn tagged(geometry: impl Into<geo_types::Geometry<f64>>, key: &str, value: &str) -> Feature {
    Feature::new(geometry, Tags::new()).with_tag(key, value)
}

/// A small city around [`berlin`]: land cover, a pond, a park with a building, a hedge, a railway and three
/// roads.
pub fn sample_layers() -> LayerSet {
    LayerSet::new()
        .with_layer(
            LayerKind::Landscape,
            vec![tagged(square(600.0, 600.0, 100.0), "landuse", "farmland")],
        )
        .with_layer(
            LayerKind::Water,
            vec![tagged(square(-600.0, -600.0, 100.0), "natural", "water")],
        )
        .with_layer(
            LayerKind::Parks,
            vec![tagged(square(0.0, 0.0, 400.0), "leisure", "park")],
        )
        .with_layer(
            LayerKind::Buildings,
            vec![tagged(square(0.0, 0.0, 200.0), "building", "yes")],
        )
        .with_layer(
            LayerKind::Hedges,
            vec![tagged(line(&[(400.0, -305.0), (600.0, -305.0)]), "barrier", "hedge")],
        )
        .with_layer(
            LayerKind::Railways,
            vec![tagged(line(&[(-500.0, 800.0), (500.0, 800.0)]), "railway", "rail")],
        )
        .with_layer(
            LayerKind::Roads,
            vec![
                tagged(line(&[(-900.0, 0.0), (900.0, 0.0)]), "highway", "motorway"),
                tagged(line(&[(-700.0, -900.0), (-700.0, 900.0)]), "highway", "primary"),
                tagged(line(&[(700.0, -900.0), (700.0, 900.0)]), "highway", "residential"),
            ],
        )
}

/// Paints [`sample_layers`] onto a 200 by 200 pixels canvas at 72 dpi.
pub fn render_sample(mode: RenderMode, theme: &Theme) -> Canvas {
    let mut canvas = Canvas::new(Size::new(200, 200), 72).unwrap();
    let view = berlin_view(canvas.size());

    composite(
        mode.compositor(),
        &mut canvas,
        &view,
        &sample_layers(),
        theme,
        &RenderSpec::default(),
    );
    canvas
}
