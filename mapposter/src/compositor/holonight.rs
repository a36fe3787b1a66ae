use std::collections::BTreeMap;

use geo::CoordsIter;
use log::trace;

use super::effects::{glow_dot, paint_glow, vignette, GlowProfile, Highlight};
use super::standard::paint_flat_layer;
use super::{edge_fade, Compositor, Frame};
use crate::color::Color;
use crate::layer::{Feature, LayerKind, LayerSet, RoadClass, RoadGroup};
use crate::render::LineStyle;

const CORE_COLOR: Color = Color::WHITE;
const WATER_EDGE: Color = Color::from_hex("#004060");
const INTERSECTION_GLOW: Color = Color::from_hex("#00FFFF");
const INTERSECTION_GLOW_INNER: Color = Color::WHITE;

/// Coordinates closer than this many degrees are the same road node.
const NODE_PRECISION: f64 = 1e-7;
/// Smallest number of road ends meeting at a node for it to glow.
const MIN_DEGREE: usize = 3;

/// Neon city: roads are glowing tubes with white-hot cores, busy intersections light up and the corners
/// sink into a vignette.
#[derive(Debug, Default, Copy, Clone)]
pub struct HolonightCompositor;

impl Compositor for HolonightCompositor {
    fn paint_layer(&self, frame: &mut Frame<'_>, kind: LayerKind, features: &[Feature]) {
        match kind {
            LayerKind::Water => {
                let water = frame.palette().base.water;
                let water_edge = frame.extra_or("water_edge", WATER_EDGE);
                let edge = LineStyle::new(0.5);
                for feature in features {
                    frame.fill_area(feature.geometry(), water, 1.0);
                    frame.stroke(feature.geometry(), &edge, water_edge, 0.3);
                }
            }
            LayerKind::Parks => {
                let parks = frame.palette().base.parks;
                for feature in features {
                    frame.fill_area(feature.geometry(), parks, 0.9);
                }
            }
            LayerKind::Buildings => {
                let fill = frame.palette().buildings_fill;
                let edge_color = frame.palette().buildings_edge;
                let edge = LineStyle::new(0.2);
                for feature in features {
                    frame.fill_area(feature.geometry(), fill, 1.0);
                    frame.stroke(feature.geometry(), &edge, edge_color, 0.05);
                }
            }
            _ => paint_flat_layer(frame, kind, features),
        }
    }

    fn paint_roads(&self, frame: &mut Frame<'_>, class: RoadClass, roads: &[&Feature]) {
        let params = frame.theme().params();
        let (width, layers, intensity, inner_default) = match class.group() {
            RoadGroup::Minor => (0.3, 6, 0.6, Color::from_hex("#C0FFFF")),
            RoadGroup::Secondary => (0.5, 8, 0.8, Color::from_hex("#E0FFFF")),
            RoadGroup::Major => (
                0.9,
                params.glow_layers.unwrap_or(10),
                params.glow_intensity.unwrap_or(1.0),
                Color::WHITE,
            ),
        };
        let profile = GlowProfile {
            layers,
            intensity,
            falloff: params.glow_falloff.unwrap_or(1.5),
            spread: 0.6,
            decay: 4.0,
            strength: 0.35,
        };

        let color = frame.palette().road(class);
        let inner = frame.extra_or(&format!("{}_inner", class.theme_key()), inner_default);
        let Some(path) = frame.features_path(roads) else {
            return;
        };

        let highlights = [
            Highlight {
                width: 0.9,
                opacity: 0.75,
                color,
            },
            Highlight {
                width: 0.5,
                opacity: 0.85,
                color: inner,
            },
            Highlight {
                width: 0.15,
                opacity: 1.0,
                color: CORE_COLOR,
            },
        ];
        paint_glow(frame.canvas(), &path, width, color, &profile, &highlights);
    }

    fn paint_ornaments(&self, frame: &mut Frame<'_>, layers: &LayerSet) {
        let params = frame.theme().params();
        if !params.render_intersections {
            return;
        }
        let Some(roads) = layers.get(LayerKind::Roads) else {
            return;
        };

        let base_size = params.intersection_size.unwrap_or(2.5);
        let outer = frame.extra_or("intersection_glow", INTERSECTION_GLOW);
        let inner = frame.extra_or("intersection_glow_inner", INTERSECTION_GLOW_INNER);

        let nodes = intersections(roads);
        trace!("Painting {} intersections", nodes.len());

        for (coord, degree) in nodes {
            let Some((x, y)) = frame.view().to_pixel(coord) else {
                continue;
            };

            let size = base_size * (degree as f32 / 4.0).min(2.5);
            let canvas = frame.canvas();
            glow_dot(canvas, x, y, size * 40.0, outer, 0.15);
            glow_dot(canvas, x, y, size * 15.0, outer, 0.35);
            glow_dot(canvas, x, y, size * 5.0, inner, 0.6);
            glow_dot(canvas, x, y, size, inner, 0.9);
        }
    }

    fn paint_atmosphere(&self, frame: &mut Frame<'_>) {
        let color = frame.extra_or("vignette", Color::BLACK);
        let intensity = frame.theme().params().vignette_intensity.unwrap_or(0.3);
        vignette(frame.canvas(), color, intensity);

        let color = frame.palette().base.gradient_color;
        let band = frame.edge_fade();
        edge_fade(frame.canvas(), color, band);
    }
}

/// Key of a road node: coordinates snapped to the node precision.
type NodeKey = (i64, i64);

fn node_key(coord: geo_types::Coord<f64>) -> NodeKey {
    (
        (coord.x / NODE_PRECISION).round() as i64,
        (coord.y / NODE_PRECISION).round() as i64,
    )
}

/// Nodes where at least three road ends or passes meet, with the number of roads touching them.
///
/// Every vertex of a road counts once for that road, so a straight road crossing another at a shared
/// vertex adds one to its degree, same as a road ending there. Result is ordered by the node coordinates.
fn intersections(roads: &[Feature]) -> Vec<(geo_types::Coord<f64>, usize)> {
    let mut degrees: BTreeMap<NodeKey, (geo_types::Coord<f64>, usize)> = BTreeMap::new();

    for road in roads {
        let mut seen = Vec::new();
        for coord in road.geometry().coords_iter() {
            let key = node_key(coord);
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            degrees.entry(key).or_insert((coord, 0)).1 += 1;
        }
    }

    degrees
        .into_values()
        .filter(|(_, degree)| *degree >= MIN_DEGREE)
        .collect()
}

#[cfg(test)]
mod tests {
    use geo_types::LineString;

    use super::*;
    use crate::compositor::{composite, RenderMode};
    use crate::layer::Tags;
    use crate::render::Canvas;
    use crate::render_spec::RenderSpec;
    use crate::tests::{
        berlin_view, night_theme, offset, render_sample, EMPTY_PROBE, ROAD_PROBE,
    };
    use crate::theme::ModeParams;

    fn road(points: &[(f64, f64)]) -> Feature {
        let line: LineString<f64> = points
            .iter()
            .map(|&(east, north)| offset(east, north))
            .collect();
        Feature::new(line, Tags::new()).with_tag("highway", "residential")
    }

    /// Three roads ending at the center and one passing by.
    fn star() -> Vec<Feature> {
        vec![
            road(&[(-500.0, 0.0), (0.0, 0.0)]),
            road(&[(0.0, 0.0), (500.0, 0.0)]),
            road(&[(0.0, -500.0), (0.0, 0.0), (0.0, 10.0)]),
            road(&[(-500.0, 300.0), (500.0, 300.0)]),
        ]
    }

    #[test]
    fn intersection_degrees() {
        let nodes = intersections(&star());
        assert_eq!(nodes.len(), 1);

        let (coord, degree) = nodes[0];
        assert_eq!(degree, 3);
        assert_eq!(node_key(coord), node_key(offset(0.0, 0.0)));
    }

    #[test]
    fn two_roads_are_not_an_intersection() {
        let roads = &star()[..2];
        assert!(intersections(roads).is_empty());
    }

    fn render_star(render_intersections: bool) -> Canvas {
        let theme = night_theme().with_params(ModeParams {
            render_intersections,
            ..Default::default()
        });
        let layers = LayerSet::new().with_layer(LayerKind::Roads, star());
        let mut canvas = Canvas::new(mapposter_types::Size::new(200, 200), 72).unwrap();
        let view = berlin_view(canvas.size());

        composite(
            &HolonightCompositor,
            &mut canvas,
            &view,
            &layers,
            &theme,
            &RenderSpec::default(),
        );
        canvas
    }

    #[test]
    fn intersections_glow() {
        let plain = render_star(false);
        let lit = render_star(true);

        let probe = |canvas: &Canvas| canvas.pixel(102, 102).unwrap().luminance();
        assert!(probe(&lit) > probe(&plain), "{} {}", probe(&lit), probe(&plain));
    }

    #[test]
    fn roads_glow_over_the_background() {
        let theme = night_theme();
        let canvas = render_sample(RenderMode::Holonight, &theme);

        let road = canvas.pixel(ROAD_PROBE.0, ROAD_PROBE.1).unwrap();
        let empty = canvas.pixel(EMPTY_PROBE.0, EMPTY_PROBE.1).unwrap();
        assert!(road.luminance() > empty.luminance() + 0.05, "{road:?} {empty:?}");
    }

    #[test]
    fn rendering_is_reproducible() {
        let theme = night_theme().with_params(ModeParams {
            render_intersections: true,
            ..Default::default()
        });
        let first = render_sample(RenderMode::Holonight, &theme);
        let second = render_sample(RenderMode::Holonight, &theme);
        assert_eq!(first.to_rgba8(), second.to_rgba8());
    }
}
