use super::{Compositor, Frame};
use crate::layer::{Feature, LayerKind, RoadClass};
use crate::render::LineStyle;

const POI_DOT_SIZE: f32 = 1.5;

/// Flat fills and strokes in theme colors.
#[derive(Debug, Default, Copy, Clone)]
pub struct StandardCompositor;

impl Compositor for StandardCompositor {
    fn paint_layer(&self, frame: &mut Frame<'_>, kind: LayerKind, features: &[Feature]) {
        paint_flat_layer(frame, kind, features);
    }

    fn paint_roads(&self, frame: &mut Frame<'_>, class: RoadClass, roads: &[&Feature]) {
        let width = road_width(frame, class, class.width());
        let style = LineStyle::new(width);
        let color = frame.palette().road(class);
        for road in roads {
            frame.stroke(road.geometry(), &style, color, 1.0);
        }
    }
}

/// Road width in points: the `road_width_*` parameter of the theme or `default`.
pub(super) fn road_width(frame: &Frame<'_>, class: RoadClass, default: f32) -> f32 {
    frame
        .theme()
        .params()
        .road_widths
        .get(&class)
        .copied()
        .unwrap_or(default)
}

/// Paints a non-road layer with flat palette colors. Stylized modes use it for the layers they do not
/// restyle.
pub(super) fn paint_flat_layer(frame: &mut Frame<'_>, kind: LayerKind, features: &[Feature]) {
    let palette = frame.palette().clone();

    match kind {
        LayerKind::Landscape => {
            for feature in features {
                let cover = feature.tag("landuse").or_else(|| feature.tag("natural"));
                frame.fill_area(feature.geometry(), palette.landscape(cover), 0.5);
            }
        }
        LayerKind::Water => {
            for feature in features {
                frame.fill_area(feature.geometry(), palette.base.water, 1.0);
            }
        }
        LayerKind::Waterways => {
            let style = LineStyle::new(0.5);
            for feature in features {
                frame.fill_area(feature.geometry(), palette.waterways, 0.8);
                frame.stroke(feature.geometry(), &style, palette.waterways, 0.8);
            }
        }
        LayerKind::Parks => {
            for feature in features {
                frame.fill_area(feature.geometry(), palette.base.parks, 1.0);
            }
        }
        LayerKind::Poi => {
            let edge = LineStyle::new(0.3);
            for feature in features {
                let geometry = feature.geometry();
                if feature.tag("leisure").is_some() {
                    frame.fill_area(geometry, palette.leisure, 0.6);
                    frame.dots(geometry, POI_DOT_SIZE, palette.leisure, 0.6);
                } else {
                    frame.fill_area(geometry, palette.amenities, 0.7);
                    frame.stroke(geometry, &edge, palette.amenities_edge, 0.7);
                    frame.dots(geometry, POI_DOT_SIZE, palette.amenities, 0.7);
                }
            }
        }
        LayerKind::Buildings => {
            let edge = LineStyle::new(0.2);
            for feature in features {
                frame.fill_area(feature.geometry(), palette.buildings_fill, 1.0);
                frame.stroke(feature.geometry(), &edge, palette.buildings_edge, 0.8);
            }
        }
        LayerKind::Hedges => {
            let style = LineStyle::new(0.2);
            for feature in features {
                frame.stroke(feature.geometry(), &style, palette.hedges, 0.7);
            }
        }
        LayerKind::Paths => {
            let style = LineStyle::new(0.3);
            for feature in features {
                frame.stroke(feature.geometry(), &style, palette.paths, 0.6);
            }
        }
        LayerKind::Railways => {
            let style = LineStyle::new(0.6).dashed(5.0, 3.0);
            for feature in features {
                frame.stroke(feature.geometry(), &style, palette.railways, 0.9);
            }
        }
        LayerKind::Roads => {
            let style = LineStyle::new(RoadClass::Default.width());
            for feature in features {
                frame.stroke(
                    feature.geometry(),
                    &style,
                    palette.road(feature.road_class()),
                    1.0,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::color::Color;
    use crate::compositor::RenderMode;
    use crate::render_spec::ColorOverrides;
    use crate::tests::{
        render_sample, sample_theme, theme_json, BUILDING_PROBE, EMPTY_PROBE, HEDGE_PROBE,
        PARK_PROBE, ROAD_PROBE,
    };
    use crate::theme::Theme;

    #[test]
    fn roads_over_buildings_over_parks() {
        let theme = sample_theme();
        let palette = theme.palette();
        let canvas = render_sample(RenderMode::Standard, &theme);

        let pixel = |(x, y): (u32, u32)| canvas.pixel(x, y);
        assert_eq!(pixel(ROAD_PROBE), Some(palette.base.road_motorway));
        assert_eq!(pixel(BUILDING_PROBE), Some(palette.buildings_fill));
        assert_eq!(pixel(PARK_PROBE), Some(palette.base.parks));
        assert_eq!(pixel(EMPTY_PROBE), Some(palette.bg()));
    }

    #[test]
    fn hedges_are_thin_lines() {
        let mut value = theme_json();
        value["hedges"] = serde_json::json!("#000000");
        let theme = Theme::from_json("hedged", value).unwrap();
        let canvas = render_sample(RenderMode::Standard, &theme);

        let bg = theme.palette().bg();
        let hedge = canvas.pixel(HEDGE_PROBE.0, HEDGE_PROBE.1).unwrap();
        assert!(hedge.r() < bg.r(), "{hedge:?}");
        assert_eq!(
            canvas.pixel(HEDGE_PROBE.0, HEDGE_PROBE.1 + 3),
            Some(bg)
        );
    }

    #[test]
    fn corners_fade_into_gradient_color() {
        let theme = sample_theme();
        let canvas = render_sample(RenderMode::Standard, &theme);
        let corner = canvas.pixel(0, 0).unwrap();
        let gradient = theme.colors().gradient_color;
        let distance = |a: u8, b: u8| (a as i32 - b as i32).abs();

        assert!(distance(corner.r(), gradient.r()) < 20, "{corner:?}");
        assert!(distance(corner.g(), gradient.g()) < 20, "{corner:?}");
        assert!(distance(corner.b(), gradient.b()) < 20, "{corner:?}");
    }

    #[test]
    fn overridden_road_color() {
        let overrides = ColorOverrides {
            road_motorway: Some(Color::rgb(255, 0, 0)),
            ..Default::default()
        };
        let theme = sample_theme().with_overrides(&overrides);

        let canvas = render_sample(RenderMode::Standard, &theme);
        assert_eq!(
            canvas.pixel(ROAD_PROBE.0, ROAD_PROBE.1),
            Some(Color::rgb(255, 0, 0))
        );
    }

    #[test]
    fn rendering_is_reproducible() {
        let theme = sample_theme();
        let first = render_sample(RenderMode::Standard, &theme);
        let second = render_sample(RenderMode::Standard, &theme);
        assert_eq!(first.to_rgba8(), second.to_rgba8());
    }
}
