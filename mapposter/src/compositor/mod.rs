//! Painting of map layers in a fixed z-order.
//!
//! The order of layers is decided by [`composite`] alone. A [`Compositor`] only decides how a single
//! layer looks, so every render mode stacks the layers the same way:
//!
//! | z  | content                                                |
//! |----|--------------------------------------------------------|
//! | 0  | background, landscape                                  |
//! | 1  | water, waterways                                       |
//! | 2  | parks, points of interest                              |
//! | 3  | buildings, hedges                                      |
//! | 4  | paths, railways                                        |
//! | 5  | roads, from the minor classes to motorways             |
//! | 6  | mode ornaments (window lights, intersection glows)     |
//! | 10 | atmosphere (edge fade or the effect of the mode)       |
//!
//! Text is drawn on top by the generator.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use geo_types::Geometry;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiny_skia::Path;

use crate::color::Color;
use crate::layer::{Feature, LayerKind, LayerSet, RoadClass};
use crate::render::{
    area_path, line_path, lines_path, point_positions, Canvas, LineStyle, MapView,
};
use crate::render_spec::RenderSpec;
use crate::theme::{Palette, Theme};

mod effects;
mod holonight;
mod kandincity;
mod night_lights;
mod seed;
mod standard;

pub use effects::{
    edge_fade, glow_dot, horizon_glow, paint_glow, vignette, GlowPass, GlowProfile, Highlight,
};
pub use holonight::HolonightCompositor;
pub use kandincity::KandincityCompositor;
pub use night_lights::NightLightsCompositor;
pub use seed::SeededStream;
pub use standard::StandardCompositor;

/// Render mode name is not known.
#[derive(Debug, Error)]
#[error("unknown render mode '{0}'")]
pub struct UnknownRenderMode(pub String);

/// Visual style of a poster.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Flat fills and strokes in theme colors.
    #[default]
    Standard,
    /// City lights at night: glowing roads, window lights and a horizon glow.
    NightLights,
    /// Neon roads with white-hot cores, glowing intersections and a vignette.
    Holonight,
    /// City blocks filled with a small palette of colors, thin dark roads.
    Kandincity,
}

impl RenderMode {
    /// All modes.
    pub const ALL: [RenderMode; 4] = [
        Self::Standard,
        Self::NightLights,
        Self::Holonight,
        Self::Kandincity,
    ];

    /// Name of the mode as used in themes and render requests.
    pub fn name(&self) -> &'static str {
        match self {
            RenderMode::Standard => "standard",
            RenderMode::NightLights => "night_lights",
            RenderMode::Holonight => "holonight",
            RenderMode::Kandincity => "kandincity",
        }
    }

    /// Compositor painting the layers of the mode.
    pub fn compositor(&self) -> &'static dyn Compositor {
        match self {
            RenderMode::Standard => &StandardCompositor,
            RenderMode::NightLights => &NightLightsCompositor,
            RenderMode::Holonight => &HolonightCompositor,
            RenderMode::Kandincity => &KandincityCompositor,
        }
    }
}

impl FromStr for RenderMode {
    type Err = UnknownRenderMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| UnknownRenderMode(s.to_string()))
    }
}

impl Display for RenderMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a compositor needs to paint a layer.
pub struct Frame<'a> {
    canvas: &'a mut Canvas,
    view: &'a MapView,
    theme: &'a Theme,
    palette: Palette,
    edge_fade: f32,
}

impl<'a> Frame<'a> {
    /// Creates a frame. The palette is resolved from the theme.
    pub fn new(canvas: &'a mut Canvas, view: &'a MapView, theme: &'a Theme, edge_fade: f32) -> Self {
        Self {
            canvas,
            view,
            theme,
            palette: theme.palette(),
            edge_fade,
        }
    }

    /// Canvas being painted.
    pub fn canvas(&mut self) -> &mut Canvas {
        &mut *self.canvas
    }

    /// Width and height of the canvas in pixels.
    pub fn canvas_size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    /// Converts points to pixels.
    pub fn pt(&self, points: f32) -> f32 {
        self.canvas.pt(points)
    }

    /// Geographic view of the canvas.
    pub fn view(&self) -> &MapView {
        self.view
    }

    /// Theme of the poster, with overrides applied.
    pub fn theme(&self) -> &Theme {
        self.theme
    }

    /// Resolved theme colors.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Theme extra color, or `default` if the theme does not set it.
    pub fn extra_or(&self, key: &str, default: Color) -> Color {
        self.theme.extra(key).unwrap_or(default)
    }

    /// Width of the edge fade band as a fraction of the canvas dimension.
    pub fn edge_fade(&self) -> f32 {
        self.edge_fade
    }

    /// Fills the polygons of a geometry.
    pub fn fill_area(&mut self, geometry: &Geometry<f64>, color: Color, opacity: f32) {
        if let Some(path) = area_path(self.view, geometry) {
            self.canvas.fill_path(&path, color.with_opacity(opacity));
        }
    }

    /// Strokes the lines and polygon rings of a geometry.
    pub fn stroke(&mut self, geometry: &Geometry<f64>, style: &LineStyle, color: Color, opacity: f32) {
        if let Some(path) = line_path(self.view, geometry) {
            self.canvas
                .stroke_path(&path, style, color.with_opacity(opacity));
        }
    }

    /// Merged stroke path of several features in canvas pixels.
    pub fn features_path(&self, features: &[&Feature]) -> Option<Path> {
        lines_path(self.view, features.iter().map(|feature| feature.geometry()))
    }

    /// Draws the points of a geometry as dots with the given diameter in points.
    pub fn dots(&mut self, geometry: &Geometry<f64>, diameter: f32, color: Color, opacity: f32) {
        let radius = self.pt(diameter) / 2.0;
        for (x, y) in point_positions(self.view, geometry) {
            self.canvas
                .fill_circle(x, y, radius, color.with_opacity(opacity));
        }
    }
}

/// Paints the layers of one render mode.
///
/// Implementations describe how a layer looks. In which order layers are painted is decided by
/// [`composite`] and cannot be changed by a compositor.
pub trait Compositor {
    /// Paints the background. Replaces everything on the canvas.
    fn background(&self, frame: &mut Frame<'_>) {
        let bg = frame.palette().bg();
        frame.canvas().fill(bg);
    }

    /// Paints every layer except roads.
    fn paint_layer(&self, frame: &mut Frame<'_>, kind: LayerKind, features: &[Feature]);

    /// Paints the roads of one class. Called once per class present, from the minor classes to motorways.
    fn paint_roads(&self, frame: &mut Frame<'_>, class: RoadClass, roads: &[&Feature]);

    /// Paints decorations derived from the layers, above the roads.
    fn paint_ornaments(&self, _frame: &mut Frame<'_>, _layers: &LayerSet) {}

    /// Paints the full canvas effect on top of the map. The edge fade by default.
    fn paint_atmosphere(&self, frame: &mut Frame<'_>) {
        let color = frame.palette().base.gradient_color;
        let band = frame.edge_fade();
        edge_fade(frame.canvas(), color, band);
    }
}

/// Paints all layers of the set onto the canvas in z-order. Layers missing from the set are skipped.
pub fn composite(
    compositor: &dyn Compositor,
    canvas: &mut Canvas,
    view: &MapView,
    layers: &LayerSet,
    theme: &Theme,
    spec: &RenderSpec,
) {
    let mut frame = Frame::new(canvas, view, theme, spec.edge_fade);
    compositor.background(&mut frame);

    for kind in LayerKind::ALL {
        let Some(features) = layers.get(kind) else {
            trace!("No '{kind}' features to paint");
            continue;
        };

        debug!("Painting {} '{kind}' features", features.len());
        if kind == LayerKind::Roads {
            for class in RoadClass::ALL {
                let roads: Vec<&Feature> = features
                    .iter()
                    .filter(|road| road.road_class() == class)
                    .collect();
                if !roads.is_empty() {
                    compositor.paint_roads(&mut frame, class, &roads);
                }
            }
        } else {
            compositor.paint_layer(&mut frame, kind, features);
        }
    }

    compositor.paint_ornaments(&mut frame, layers);
    compositor.paint_atmosphere(&mut frame);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use assert_matches::assert_matches;
    use mapposter_types::Size;

    use super::*;
    use crate::tests::{
        berlin_view, night_theme, render_sample, sample_layers, sample_theme, BUILDING_PROBE,
        PARK_PROBE, ROAD_PROBE,
    };

    #[derive(Debug, PartialEq)]
    enum Call {
        Background,
        Layer(LayerKind),
        Roads(RoadClass),
        Ornaments,
        Atmosphere,
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Call>>,
    }

    impl Compositor for Recorder {
        fn background(&self, _frame: &mut Frame<'_>) {
            self.calls.borrow_mut().push(Call::Background);
        }

        fn paint_layer(&self, _frame: &mut Frame<'_>, kind: LayerKind, _features: &[Feature]) {
            self.calls.borrow_mut().push(Call::Layer(kind));
        }

        fn paint_roads(&self, _frame: &mut Frame<'_>, class: RoadClass, _roads: &[&Feature]) {
            self.calls.borrow_mut().push(Call::Roads(class));
        }

        fn paint_ornaments(&self, _frame: &mut Frame<'_>, _layers: &LayerSet) {
            self.calls.borrow_mut().push(Call::Ornaments);
        }

        fn paint_atmosphere(&self, _frame: &mut Frame<'_>) {
            self.calls.borrow_mut().push(Call::Atmosphere);
        }
    }

    #[test]
    fn layers_are_painted_in_z_order() {
        let recorder = Recorder::default();
        let mut canvas = Canvas::new(Size::new(50, 50), 72).unwrap();
        let view = berlin_view(canvas.size());

        composite(
            &recorder,
            &mut canvas,
            &view,
            &sample_layers(),
            &sample_theme(),
            &RenderSpec::default(),
        );

        assert_eq!(
            recorder.calls.into_inner(),
            vec![
                Call::Background,
                Call::Layer(LayerKind::Landscape),
                Call::Layer(LayerKind::Water),
                Call::Layer(LayerKind::Parks),
                Call::Layer(LayerKind::Buildings),
                Call::Layer(LayerKind::Hedges),
                Call::Layer(LayerKind::Railways),
                Call::Roads(RoadClass::Residential),
                Call::Roads(RoadClass::Primary),
                Call::Roads(RoadClass::Motorway),
                Call::Ornaments,
                Call::Atmosphere,
            ]
        );
    }

    #[test]
    fn empty_layer_set_paints_background_and_atmosphere() {
        let recorder = Recorder::default();
        let mut canvas = Canvas::new(Size::new(50, 50), 72).unwrap();
        let view = berlin_view(canvas.size());

        composite(
            &recorder,
            &mut canvas,
            &view,
            &LayerSet::new(),
            &sample_theme(),
            &RenderSpec::default(),
        );

        assert_eq!(
            recorder.calls.into_inner(),
            vec![Call::Background, Call::Ornaments, Call::Atmosphere]
        );
    }

    #[test]
    fn mode_names() {
        for mode in RenderMode::ALL {
            assert_eq!(mode.name().parse::<RenderMode>().unwrap(), mode);
        }
        assert_eq!(RenderMode::default(), RenderMode::Standard);
        assert_matches!("watercolor".parse::<RenderMode>(), Err(UnknownRenderMode(name)) if name == "watercolor");
        assert_eq!(
            serde_json::to_string(&RenderMode::NightLights).unwrap(),
            "\"night_lights\""
        );
    }

    #[test]
    fn roads_cover_buildings_cover_parks_in_every_mode() {
        for theme in [sample_theme(), night_theme()] {
            for mode in RenderMode::ALL {
                let canvas = render_sample(mode, &theme);
                let pixel = |(x, y): (u32, u32)| canvas.pixel(x, y).unwrap();
                let (road, building, park) =
                    (pixel(ROAD_PROBE), pixel(BUILDING_PROBE), pixel(PARK_PROBE));
                let bg = theme.palette().bg();

                assert_ne!(road, building, "{mode} on '{}'", theme.name());
                assert_ne!(building, park, "{mode} on '{}'", theme.name());
                assert_ne!(road, park, "{mode} on '{}'", theme.name());
                assert_ne!(park, bg, "{mode} on '{}'", theme.name());
            }
        }
    }
}
