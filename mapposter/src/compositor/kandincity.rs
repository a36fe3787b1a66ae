use log::trace;

use super::seed::SeededStream;
use super::standard::{paint_flat_layer, road_width};
use super::{Compositor, Frame};
use crate::color::Color;
use crate::layer::{Feature, LayerKind, RoadClass};
use crate::render::LineStyle;

const BLOCK_COLORS: [Color; 3] = [
    Color::from_hex("#E8642C"),
    Color::from_hex("#3C4654"),
    Color::from_hex("#8B8860"),
];
const BUILDINGS_EDGE: Color = Color::from_hex("#1A1A1A");

/// City blocks in a small palette of flat colors with thin dark outlines, in the manner of abstract
/// painting. The map is left without atmosphere.
#[derive(Debug, Default, Copy, Clone)]
pub struct KandincityCompositor;

impl Compositor for KandincityCompositor {
    fn paint_layer(&self, frame: &mut Frame<'_>, kind: LayerKind, features: &[Feature]) {
        match kind {
            LayerKind::Buildings => paint_blocks(frame, features),
            LayerKind::Parks => {
                let parks = frame.palette().base.parks;
                for feature in features {
                    frame.fill_area(feature.geometry(), parks, 0.9);
                }
            }
            _ => paint_flat_layer(frame, kind, features),
        }
    }

    fn paint_roads(&self, frame: &mut Frame<'_>, class: RoadClass, roads: &[&Feature]) {
        let default = match class {
            RoadClass::Default => 0.3,
            _ => class.width(),
        };
        let style = LineStyle::new(road_width(frame, class, default));
        let color = frame.palette().road(class);
        for road in roads {
            frame.stroke(road.geometry(), &style, color, 1.0);
        }
    }

    fn paint_atmosphere(&self, _frame: &mut Frame<'_>) {}
}

fn paint_blocks(frame: &mut Frame<'_>, buildings: &[Feature]) {
    let params = frame.theme().params();
    let colors = if params.block_colors.is_empty() {
        BLOCK_COLORS.to_vec()
    } else {
        params.block_colors.clone()
    };
    let weights = params.block_color_weights.clone();
    let edge = LineStyle::new(params.building_edge_width.unwrap_or(0.3));
    let edge_color = frame
        .theme()
        .details()
        .buildings_edge
        .unwrap_or(BUILDINGS_EDGE);

    for building in buildings {
        let Some(color) = block_color(building, &colors, &weights) else {
            continue;
        };
        frame.fill_area(building.geometry(), color, 1.0);
        frame.stroke(building.geometry(), &edge, edge_color, 1.0);
    }

    trace!("Painted {} city blocks", buildings.len());
}

/// Fill color of a block. The choice depends only on the block geometry, so a building keeps its color
/// between renders.
fn block_color(building: &Feature, colors: &[Color], weights: &[f32]) -> Option<Color> {
    SeededStream::from_geometry(building.geometry())
        .pick_weighted(colors, weights)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::RenderMode;
    use crate::layer::Tags;
    use crate::tests::{
        render_sample, sample_theme, square, BUILDING_PROBE, EMPTY_PROBE, ROAD_PROBE,
    };

    #[test]
    fn blocks_use_block_colors() {
        let theme = sample_theme();
        let canvas = render_sample(RenderMode::Kandincity, &theme);

        let block = canvas.pixel(BUILDING_PROBE.0, BUILDING_PROBE.1).unwrap();
        assert!(BLOCK_COLORS.contains(&block), "{block:?}");
    }

    #[test]
    fn roads_are_flat_and_no_atmosphere() {
        let theme = sample_theme();
        let palette = theme.palette();
        let canvas = render_sample(RenderMode::Kandincity, &theme);

        assert_eq!(
            canvas.pixel(ROAD_PROBE.0, ROAD_PROBE.1),
            Some(palette.base.road_motorway)
        );
        assert_eq!(canvas.pixel(0, 0), Some(palette.bg()));
        assert_eq!(
            canvas.pixel(EMPTY_PROBE.0, EMPTY_PROBE.1),
            Some(palette.bg())
        );
    }

    #[test]
    fn block_color_is_stable() {
        let block = Feature::new(square(120.0, -40.0, 30.0), Tags::new());
        let first = block_color(&block, &BLOCK_COLORS, &[]).unwrap();
        assert_eq!(block_color(&block, &BLOCK_COLORS, &[]), Some(first));
        assert_eq!(block_color(&block, &[], &[]), None);
    }

    #[test]
    fn weights_skew_the_choice() {
        let weights = [1.0, 0.0, 0.0];
        for step in 0..20 {
            let block = Feature::new(square(step as f64 * 50.0, 0.0, 10.0), Tags::new());
            assert_eq!(
                block_color(&block, &BLOCK_COLORS, &weights),
                Some(BLOCK_COLORS[0])
            );
        }
    }

    #[test]
    fn rendering_is_reproducible() {
        let theme = sample_theme();
        let first = render_sample(RenderMode::Kandincity, &theme);
        let second = render_sample(RenderMode::Kandincity, &theme);
        assert_eq!(first.to_rgba8(), second.to_rgba8());
    }
}
