use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::config::{DEFAULT_DISTANCE, DEFAULT_FONT, DEFAULT_PAPER_SIZE, DEFAULT_THEME, PREVIEW_DPI};
use crate::layer::{LayerKind, RoadClass};

/// Default width of the edge fade band as a fraction of the canvas dimension.
pub const DEFAULT_EDGE_FADE: f32 = 0.02;
/// Largest edge fade band. Wider bands would meet in the middle of the canvas.
pub const MAX_EDGE_FADE: f32 = 0.5;

/// Parameters of a single render.
///
/// The generator only reads the render spec. Missing fields of a deserialized one take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSpec {
    /// Paper preset name, e.g. `A4`.
    pub paper_size: String,
    /// Output resolution.
    pub dpi: u32,
    /// Search radius in meters. Drives the level of detail and the text scale.
    pub distance: f64,
    /// Theme name.
    pub theme: String,
    /// Font family id.
    pub font: String,
    /// Text and color overrides.
    pub personalization: Personalization,
    /// Explicit set of layers to render. When `None`, the level of detail policy picks detail layers
    /// from the distance. Core layers are rendered in any case.
    pub layers: Option<BTreeSet<LayerKind>>,
    /// Width of the edge fade band as a fraction of the canvas dimension.
    pub edge_fade: f32,
    /// Placement of the text block.
    pub text: TextPlacement,
}

impl Default for RenderSpec {
    fn default() -> Self {
        Self {
            paper_size: DEFAULT_PAPER_SIZE.to_string(),
            dpi: PREVIEW_DPI,
            distance: DEFAULT_DISTANCE,
            theme: DEFAULT_THEME.to_string(),
            font: DEFAULT_FONT.to_string(),
            personalization: Personalization::default(),
            layers: None,
            edge_fade: DEFAULT_EDGE_FADE,
            text: TextPlacement::default(),
        }
    }
}

impl RenderSpec {
    /// Sets the paper preset.
    pub fn with_paper_size(mut self, paper_size: impl Into<String>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    /// Sets the output resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Sets the search radius.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Sets the theme name.
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Sets the font family id.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Sets the personalization overlay.
    pub fn with_personalization(mut self, personalization: Personalization) -> Self {
        self.personalization = personalization;
        self
    }

    /// Overrides the layers chosen by the level of detail policy.
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = LayerKind>) -> Self {
        self.layers = Some(layers.into_iter().collect());
        self
    }
}

/// Caller overrides for texts and colors.
///
/// Each field replaces its computed counterpart independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Personalization {
    /// Replaces the city name.
    pub custom_city_text: Option<String>,
    /// Replaces the country name.
    pub custom_country_text: Option<String>,
    /// Adds a subtitle line under the city name.
    pub custom_subtitle: Option<String>,
    /// Replaces the coordinates line. `coords_format` is ignored when set.
    pub custom_coords_text: Option<String>,
    /// Name of the coordinates notation: `default`, `decimal`, `compact` or `dms`.
    pub coords_format: String,
    /// Replaces the theme text color.
    pub text_color: Option<Color>,
    /// Replaces theme colors.
    #[serde(flatten)]
    pub colors: ColorOverrides,
}

impl Default for Personalization {
    fn default() -> Self {
        Self {
            custom_city_text: None,
            custom_country_text: None,
            custom_subtitle: None,
            custom_coords_text: None,
            coords_format: "default".to_string(),
            text_color: None,
            colors: ColorOverrides::default(),
        }
    }
}

/// Replacements for required theme colors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOverrides {
    /// Background.
    #[serde(rename = "bg_color")]
    pub bg: Option<Color>,
    /// Water.
    #[serde(rename = "water_color")]
    pub water: Option<Color>,
    /// Parks.
    #[serde(rename = "parks_color")]
    pub parks: Option<Color>,
    /// Motorways.
    pub road_motorway: Option<Color>,
    /// Trunk and primary roads.
    pub road_primary: Option<Color>,
    /// Secondary roads.
    pub road_secondary: Option<Color>,
    /// Tertiary roads.
    pub road_tertiary: Option<Color>,
    /// Residential streets.
    pub road_residential: Option<Color>,
    /// Any other road.
    pub road_default: Option<Color>,
}

impl ColorOverrides {
    /// Override for the given road class.
    pub fn road(&self, class: RoadClass) -> Option<Color> {
        match class {
            RoadClass::Motorway => self.road_motorway,
            RoadClass::Primary => self.road_primary,
            RoadClass::Secondary => self.road_secondary,
            RoadClass::Tertiary => self.road_tertiary,
            RoadClass::Residential => self.road_residential,
            RoadClass::Default => self.road_default,
        }
    }

    /// Returns true if no color is overridden.
    pub fn is_empty(&self) -> bool {
        self.bg.is_none()
            && self.water.is_none()
            && self.parks.is_none()
            && RoadClass::ALL.iter().all(|class| self.road(*class).is_none())
    }
}

/// Horizontal alignment of the text block.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Text starts at the anchor.
    Left,
    /// Text is centered on the anchor.
    #[default]
    Center,
    /// Text ends at the anchor.
    Right,
}

/// Position of the text block on the poster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPlacement {
    /// Horizontal anchor as a fraction of the width.
    pub x: f32,
    /// Baseline of the city name as a fraction of the height, from the bottom.
    pub y: f32,
    /// Alignment relative to the anchor.
    pub alignment: Alignment,
    /// Print the country line.
    pub show_country: bool,
    /// Print the coordinates line.
    pub show_coords: bool,
}

impl Default for TextPlacement {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.14,
            alignment: Alignment::Center,
            show_country: true,
            show_coords: true,
        }
    }
}
