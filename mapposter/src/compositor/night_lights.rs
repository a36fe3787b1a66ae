use geo::CoordsIter;
use log::trace;
use nalgebra::Point2;

use super::effects::{glow_dot, horizon_glow, paint_glow, GlowProfile, Highlight};
use super::seed::SeededStream;
use super::standard::paint_flat_layer;
use super::{edge_fade, Compositor, Frame};
use crate::color::Color;
use crate::layer::{Feature, LayerKind, LayerSet, RoadClass, RoadGroup};
use crate::render::{LineStyle, MapView};

/// Part of the search radius around the center where roads and windows use the warmer inner colors.
const INNER_RADIUS: f64 = 0.4;

const CORE_COLOR: Color = Color::from_hex("#FFFFF0");
const BUILDINGS_FILL: Color = Color::from_hex("#08080F");
const BUILDINGS_EDGE: Color = Color::from_hex("#101018");
const HORIZON_GLOW: Color = Color::from_hex("#0A1530");

const WINDOWS_INNER: [Color; 4] = [
    Color::from_hex("#E8E8FF"),
    Color::from_hex("#D0E0FF"),
    Color::from_hex("#F0F0FF"),
    Color::from_hex("#FFFFFF"),
];
const WINDOWS_OUTER: [Color; 4] = [
    Color::from_hex("#FFE4B5"),
    Color::from_hex("#FFEFD5"),
    Color::from_hex("#FFD700"),
    Color::from_hex("#FFA500"),
];

/// Smallest building side in meters that gets window lights.
const MIN_LIT_SIDE: f64 = 10.0;
/// Ground area in square meters per window light.
const AREA_PER_LIGHT: f64 = 400.0;
const MAX_LIGHTS: usize = 6;
/// Distance of window lights from the building outline in meters.
const LIGHT_INSET: f64 = 2.0;

/// City lights at night.
///
/// Roads glow with layered halos, brighter and warmer near the center. Buildings are dark blocks with
/// scattered window lights, and a faint glow rises over the top edge.
#[derive(Debug, Default, Copy, Clone)]
pub struct NightLightsCompositor;

impl Compositor for NightLightsCompositor {
    fn paint_layer(&self, frame: &mut Frame<'_>, kind: LayerKind, features: &[Feature]) {
        match kind {
            LayerKind::Parks => {
                let parks = frame.palette().base.parks;
                for feature in features {
                    frame.fill_area(feature.geometry(), parks, 0.95);
                }
            }
            LayerKind::Buildings => {
                let details = frame.theme().details();
                let fill = details.buildings_fill.unwrap_or(BUILDINGS_FILL);
                let edge = details.buildings_edge.unwrap_or(BUILDINGS_EDGE);
                let style = LineStyle::new(0.2);
                for feature in features {
                    frame.fill_area(feature.geometry(), fill, 0.97);
                    frame.stroke(feature.geometry(), &style, edge, 0.08);
                }
            }
            _ => paint_flat_layer(frame, kind, features),
        }
    }

    fn paint_roads(&self, frame: &mut Frame<'_>, class: RoadClass, roads: &[&Feature]) {
        let params = frame.theme().params();
        let (width, layers, intensity, inner_default) = match class.group() {
            RoadGroup::Minor => (0.25, 5, 0.45, Color::from_hex("#FFD8A8")),
            RoadGroup::Secondary => (0.45, 6, 0.65, Color::from_hex("#FFE0C0")),
            RoadGroup::Major => (
                0.8,
                params.glow_layers.unwrap_or(8),
                params.glow_intensity.unwrap_or(0.9),
                Color::from_hex("#FFEEDD"),
            ),
        };
        let profile = GlowProfile {
            layers,
            intensity,
            falloff: params.glow_falloff.unwrap_or(1.2),
            spread: 0.5,
            decay: 3.0,
            strength: 0.4,
        };

        let outer_color = frame.palette().road(class);
        let inner_color = frame.extra_or(&format!("{}_inner", class.theme_key()), inner_default);
        let limit = INNER_RADIUS * frame.view().half_height();
        let (inner, outer): (Vec<&Feature>, Vec<&Feature>) = roads
            .iter()
            .copied()
            .partition(|road| is_inner(frame.view(), road, limit));

        for (roads, color) in [(outer, outer_color), (inner, inner_color)] {
            let Some(path) = frame.features_path(&roads) else {
                continue;
            };

            let highlights = [
                Highlight {
                    width: 0.8,
                    opacity: 0.7,
                    color,
                },
                Highlight {
                    width: 0.4,
                    opacity: 0.9,
                    color,
                },
                Highlight {
                    width: 0.15,
                    opacity: 1.0,
                    color: CORE_COLOR,
                },
            ];
            paint_glow(frame.canvas(), &path, width, color, &profile, &highlights);
        }
    }

    fn paint_ornaments(&self, frame: &mut Frame<'_>, layers: &LayerSet) {
        let Some(buildings) = layers.get(LayerKind::Buildings) else {
            return;
        };

        let params = frame.theme().params();
        let inner_colors = non_empty_or(&params.window_lights_inner, &WINDOWS_INNER);
        let outer_colors = non_empty_or(&params.window_lights_outer, &WINDOWS_OUTER);
        let limit = INNER_RADIUS * frame.view().half_height();

        let mut lit = 0;
        for building in buildings {
            let lights = window_lights(frame.view(), building, limit, &inner_colors, &outer_colors);
            lit += lights.len();
            for light in lights {
                let (x, y) = frame.view().meters_to_pixel(light.position);
                let canvas = frame.canvas();
                glow_dot(canvas, x, y, light.size * 20.0, light.color, 0.15);
                glow_dot(canvas, x, y, light.size * 5.0, light.color, 0.4);
                glow_dot(canvas, x, y, light.size, light.color, 0.9);
            }
        }

        trace!("Painted {lit} window lights");
    }

    fn paint_atmosphere(&self, frame: &mut Frame<'_>) {
        let glow = frame.extra_or("horizon_glow", HORIZON_GLOW);
        horizon_glow(frame.canvas(), glow, 0.3, 0.25);

        let color = frame.palette().base.gradient_color;
        let band = frame.edge_fade();
        edge_fade(frame.canvas(), color, band);
    }
}

/// Returns true if the midpoint of the first segment of the road is within `limit` meters of the center.
fn is_inner(view: &MapView, road: &Feature, limit: f64) -> bool {
    let mut coords = road.geometry().coords_iter();
    let Some(first) = coords.next() else {
        return false;
    };
    let second = coords.next().unwrap_or(first);
    let midpoint = (first + second) / 2.0;

    view.center_distance(midpoint)
        .is_some_and(|distance| distance <= limit)
}

fn non_empty_or(colors: &[Color], default: &[Color]) -> Vec<Color> {
    if colors.is_empty() {
        default.to_vec()
    } else {
        colors.to_vec()
    }
}

/// Window light of a building in projected meters.
#[derive(Debug, Clone, PartialEq)]
struct WindowLight {
    position: Point2<f64>,
    /// Size multiplier of the light dot.
    size: f32,
    color: Color,
}

/// Lights of a building. Buildings narrower than 10 meters stay dark; larger ones get one light per 400
/// square meters of their bounding box, up to 6. Positions, sizes and colors are seeded by the building
/// geometry.
fn window_lights(
    view: &MapView,
    building: &Feature,
    limit: f64,
    inner_colors: &[Color],
    outer_colors: &[Color],
) -> Vec<WindowLight> {
    let Some(rect) = building.bounding_rect() else {
        return vec![];
    };
    let (Some(min), Some(max)) = (view.project(rect.min()), view.project(rect.max())) else {
        return vec![];
    };

    let (width, height) = (max.x - min.x, max.y - min.y);
    if width < MIN_LIT_SIDE || height < MIN_LIT_SIDE {
        return vec![];
    }

    let count = ((width * height / AREA_PER_LIGHT) as usize).min(MAX_LIGHTS);
    let center = nalgebra::center(&min, &max);
    let colors = if center.coords.norm() <= limit {
        inner_colors
    } else {
        outer_colors
    };

    let mut stream = SeededStream::from_geometry(building.geometry());
    (0..count)
        .filter_map(|_| {
            let x = stream.range((min.x + LIGHT_INSET) as f32, (max.x - LIGHT_INSET) as f32);
            let y = stream.range((min.y + LIGHT_INSET) as f32, (max.y - LIGHT_INSET) as f32);
            let size = stream.range(0.3, 1.5);
            let color = *stream.pick(colors)?;

            Some(WindowLight {
                position: Point2::new(x as f64, y as f64),
                size,
                color,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use geo_types::Geometry;
    use mapposter_types::Size;

    use super::*;
    use crate::compositor::RenderMode;
    use crate::layer::Tags;
    use crate::tests::{
        berlin_view, night_theme, offset, render_sample, square, EMPTY_PROBE, ROAD_PROBE,
    };

    fn building(east: f64, north: f64, half_size: f64) -> Feature {
        Feature::new(square(east, north, half_size), Tags::new()).with_tag("building", "yes")
    }

    #[test]
    fn roads_glow_over_the_background() {
        let theme = night_theme();
        let canvas = render_sample(RenderMode::NightLights, &theme);

        let road = canvas.pixel(ROAD_PROBE.0, ROAD_PROBE.1).unwrap();
        let empty = canvas.pixel(EMPTY_PROBE.0, EMPTY_PROBE.1).unwrap();
        assert!(road.luminance() > empty.luminance() + 0.05, "{road:?} {empty:?}");
    }

    #[test]
    fn windows_are_reproducible() {
        let view = berlin_view(Size::new(200, 200));
        let house = building(0.0, 0.0, 200.0);

        let lights = window_lights(&view, &house, 400.0, &WINDOWS_INNER, &WINDOWS_OUTER);
        assert_eq!(lights.len(), MAX_LIGHTS);
        assert_eq!(
            lights,
            window_lights(&view, &house, 400.0, &WINDOWS_INNER, &WINDOWS_OUTER)
        );

        for light in &lights {
            assert!(light.position.x.abs() <= 200.0 - LIGHT_INSET + 1.0);
            assert!(light.position.y.abs() <= 200.0 - LIGHT_INSET + 1.0);
            assert!((0.3..1.5).contains(&light.size));
            assert!(WINDOWS_INNER.contains(&light.color));
        }
    }

    #[test]
    fn window_count_follows_area() {
        let view = berlin_view(Size::new(200, 200));

        let small = building(0.0, 0.0, 4.0);
        assert!(window_lights(&view, &small, 400.0, &WINDOWS_INNER, &WINDOWS_OUTER).is_empty());

        let medium = building(0.0, 0.0, 15.0);
        let lights = window_lights(&view, &medium, 400.0, &WINDOWS_INNER, &WINDOWS_OUTER);
        assert!((1..=2).contains(&lights.len()), "{}", lights.len());

        let far = building(600.0, 600.0, 50.0);
        let lights = window_lights(&view, &far, 400.0, &WINDOWS_INNER, &WINDOWS_OUTER);
        assert!(lights.iter().all(|light| WINDOWS_OUTER.contains(&light.color)));
    }

    #[test]
    fn inner_roads() {
        let view = berlin_view(Size::new(200, 200));
        let line = |east: f64| -> Feature {
            let geometry: Geometry<f64> =
                geo_types::LineString::from(vec![offset(east, -50.0), offset(east, 50.0)]).into();
            Feature::new(geometry, Tags::new())
        };

        assert!(is_inner(&view, &line(100.0), 400.0));
        assert!(!is_inner(&view, &line(500.0), 400.0));
    }
}
