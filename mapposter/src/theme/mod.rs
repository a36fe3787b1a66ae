//! Named color themes.
//!
//! A theme file is a flat JSON object. Eleven keys are required (see [`REQUIRED_KEYS`]); detail colors
//! are optional and are derived from the required ones when missing (see [`Palette`]). Any other key
//! holding a color is kept as an extra color for the stylized render modes, and a fixed set of numeric
//! and list keys tunes those modes (see [`ModeParams`]).

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::color::Color;
use crate::compositor::RenderMode;
use crate::layer::RoadClass;
use crate::render_spec::ColorOverrides;

mod palette;
mod store;

pub use palette::Palette;
pub use store::ThemeStore;

/// Keys every theme must define.
pub const REQUIRED_KEYS: [&str; 11] = [
    "bg",
    "text",
    "gradient_color",
    "water",
    "parks",
    "road_motorway",
    "road_primary",
    "road_secondary",
    "road_tertiary",
    "road_residential",
    "road_default",
];

/// Theme loading error.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// No theme with this name exists.
    #[error("theme '{0}' not found")]
    NotFound(String),
    /// Theme exists, but cannot be used.
    #[error("theme '{theme}' is invalid: {reason}")]
    Invalid {
        /// Theme name.
        theme: String,
        /// What is wrong with the theme.
        reason: String,
    },
}

impl ThemeError {
    fn invalid(theme: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            theme: theme.to_string(),
            reason: reason.into(),
        }
    }
}

/// Colors every theme defines.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseColors {
    /// Background.
    pub bg: Color,
    /// Text.
    pub text: Color,
    /// Edge fade color.
    pub gradient_color: Color,
    /// Water areas.
    pub water: Color,
    /// Parks.
    pub parks: Color,
    /// Motorways.
    pub road_motorway: Color,
    /// Trunk and primary roads.
    pub road_primary: Color,
    /// Secondary roads.
    pub road_secondary: Color,
    /// Tertiary roads.
    pub road_tertiary: Color,
    /// Residential streets.
    pub road_residential: Color,
    /// Other roads.
    pub road_default: Color,
}

impl BaseColors {
    /// Color of the road class.
    pub fn road(&self, class: RoadClass) -> Color {
        match class {
            RoadClass::Motorway => self.road_motorway,
            RoadClass::Primary => self.road_primary,
            RoadClass::Secondary => self.road_secondary,
            RoadClass::Tertiary => self.road_tertiary,
            RoadClass::Residential => self.road_residential,
            RoadClass::Default => self.road_default,
        }
    }

    fn road_mut(&mut self, class: RoadClass) -> &mut Color {
        match class {
            RoadClass::Motorway => &mut self.road_motorway,
            RoadClass::Primary => &mut self.road_primary,
            RoadClass::Secondary => &mut self.road_secondary,
            RoadClass::Tertiary => &mut self.road_tertiary,
            RoadClass::Residential => &mut self.road_residential,
            RoadClass::Default => &mut self.road_default,
        }
    }
}

/// Detail colors explicitly set by a theme. Missing values are derived by [`Theme::palette`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailColors {
    /// Building outlines, also the base of derived building colors.
    pub buildings: Option<Color>,
    /// Building fill.
    pub buildings_fill: Option<Color>,
    /// Building edge stroke.
    pub buildings_edge: Option<Color>,
    /// Footways and cycleways.
    pub paths: Option<Color>,
    /// Farmland.
    pub farmland: Option<Color>,
    /// Forests and woods.
    pub forest: Option<Color>,
    /// Meadows and other open land cover.
    pub meadow: Option<Color>,
    /// Linear waterways.
    pub waterways: Option<Color>,
    /// Railways.
    pub railways: Option<Color>,
    /// Sport grounds, playgrounds and gardens.
    pub leisure: Option<Color>,
    /// Worship places, schools and cemeteries.
    pub amenities: Option<Color>,
    /// Outline of amenities.
    pub amenities_edge: Option<Color>,
    /// Hedges, fences and walls.
    pub hedges: Option<Color>,
}

impl DetailColors {
    fn slot(&mut self, key: &str) -> Option<&mut Option<Color>> {
        Some(match key {
            "buildings" => &mut self.buildings,
            "buildings_fill" => &mut self.buildings_fill,
            "buildings_edge" => &mut self.buildings_edge,
            "paths" => &mut self.paths,
            "farmland" => &mut self.farmland,
            "forest" => &mut self.forest,
            "meadow" => &mut self.meadow,
            "waterways" => &mut self.waterways,
            "railways" => &mut self.railways,
            "leisure" => &mut self.leisure,
            "amenities" => &mut self.amenities,
            "amenities_edge" => &mut self.amenities_edge,
            "hedges" => &mut self.hedges,
            _ => return None,
        })
    }
}

/// Numeric and list parameters of the stylized render modes. Unset values fall back to the defaults of
/// the mode that reads them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeParams {
    /// Number of halo strokes of major roads.
    pub glow_layers: Option<u32>,
    /// Opacity multiplier of major road glow.
    pub glow_intensity: Option<f32>,
    /// Exponent of the halo width growth.
    pub glow_falloff: Option<f32>,
    /// Strength of the radial vignette.
    pub vignette_intensity: Option<f32>,
    /// Draw glowing dots on road intersections.
    pub render_intersections: bool,
    /// Base size of intersection glows in points.
    pub intersection_size: Option<f32>,
    /// Width of building edges in points.
    pub building_edge_width: Option<f32>,
    /// Fill colors of city blocks.
    pub block_colors: Vec<Color>,
    /// Relative weights of `block_colors`.
    pub block_color_weights: Vec<f32>,
    /// Window light colors near the center.
    pub window_lights_inner: Vec<Color>,
    /// Window light colors in the outskirts.
    pub window_lights_outer: Vec<Color>,
    /// Road widths in points by class.
    pub road_widths: BTreeMap<RoadClass, f32>,
}

/// Validated color theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    name: String,
    description: Option<String>,
    mode: Option<RenderMode>,
    colors: BaseColors,
    details: DetailColors,
    extras: BTreeMap<String, Color>,
    params: ModeParams,
}

impl Theme {
    /// Creates a theme with only the required colors set.
    pub fn new(name: impl Into<String>, colors: BaseColors) -> Self {
        Self {
            name: name.into(),
            description: None,
            mode: None,
            colors,
            details: DetailColors::default(),
            extras: BTreeMap::new(),
            params: ModeParams::default(),
        }
    }

    /// Parses a theme from a JSON document.
    pub fn from_json_str(name: &str, json: &str) -> Result<Self, ThemeError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| ThemeError::invalid(name, format!("malformed JSON: {err}")))?;
        Self::from_json(name, value)
    }

    /// Validates a JSON value as a theme. `name` is used when the document has no `name` key.
    pub fn from_json(name: &str, value: Value) -> Result<Self, ThemeError> {
        let Value::Object(map) = value else {
            return Err(ThemeError::invalid(name, "theme must be a JSON object"));
        };

        let required = |key: &str| -> Result<Color, ThemeError> {
            match map.get(key) {
                None => Err(ThemeError::invalid(
                    name,
                    format!("missing required key '{key}'"),
                )),
                Some(value) => parse_color(name, key, value),
            }
        };

        let colors = BaseColors {
            bg: required("bg")?,
            text: required("text")?,
            gradient_color: required("gradient_color")?,
            water: required("water")?,
            parks: required("parks")?,
            road_motorway: required("road_motorway")?,
            road_primary: required("road_primary")?,
            road_secondary: required("road_secondary")?,
            road_tertiary: required("road_tertiary")?,
            road_residential: required("road_residential")?,
            road_default: required("road_default")?,
        };

        let mut theme = Self::new(name, colors);
        for (key, value) in &map {
            theme.read_key(key, value)?;
        }

        Ok(theme)
    }

    fn read_key(&mut self, key: &str, value: &Value) -> Result<(), ThemeError> {
        let name = self.name.clone();

        if REQUIRED_KEYS.contains(&key) {
            return Ok(());
        }

        if let Some(slot) = self.details.slot(key) {
            *slot = Some(parse_color(&name, key, value)?);
            return Ok(());
        }

        if let Some(class) = key.strip_prefix("road_width_").and_then(|suffix| {
            RoadClass::ALL
                .into_iter()
                .find(|class| class.theme_key().strip_prefix("road_") == Some(suffix))
        }) {
            let width = parse_number(&name, key, value)?;
            self.params.road_widths.insert(class, width);
            return Ok(());
        }

        match key {
            "name" => self.name = parse_string(&name, key, value)?,
            "description" => self.description = Some(parse_string(&name, key, value)?),
            "mode" => {
                let mode = parse_string(&name, key, value)?;
                self.mode = Some(
                    mode.parse()
                        .map_err(|_| ThemeError::invalid(&name, format!("unknown mode '{mode}'")))?,
                );
            }
            "glow_layers" => {
                let layers = parse_number(&name, key, value)?;
                self.params.glow_layers = Some(layers.max(1.0).round() as u32);
            }
            "glow_intensity" => self.params.glow_intensity = Some(parse_number(&name, key, value)?),
            "glow_falloff" => self.params.glow_falloff = Some(parse_number(&name, key, value)?),
            "vignette_intensity" => {
                self.params.vignette_intensity = Some(parse_number(&name, key, value)?)
            }
            "intersection_size" => {
                self.params.intersection_size = Some(parse_number(&name, key, value)?)
            }
            "building_edge_width" => {
                self.params.building_edge_width = Some(parse_number(&name, key, value)?)
            }
            "render_intersections" => {
                self.params.render_intersections = value.as_bool().ok_or_else(|| {
                    ThemeError::invalid(&name, "'render_intersections' must be a boolean")
                })?
            }
            "block_colors" => self.params.block_colors = parse_color_list(&name, key, value)?,
            "window_lights_inner" => {
                self.params.window_lights_inner = parse_color_list(&name, key, value)?
            }
            "window_lights_outer" => {
                self.params.window_lights_outer = parse_color_list(&name, key, value)?
            }
            "block_color_weights" => {
                self.params.block_color_weights = match value {
                    Value::Null => vec![],
                    Value::Array(items) => items
                        .iter()
                        .map(|item| parse_number(&name, key, item))
                        .collect::<Result<_, _>>()?,
                    _ => {
                        return Err(ThemeError::invalid(
                            &name,
                            "'block_color_weights' must be a list of numbers",
                        ))
                    }
                }
            }
            _ => match value.as_str().and_then(Color::parse) {
                Some(color) => {
                    self.extras.insert(key.to_string(), color);
                }
                None => log::warn!("Theme '{name}': ignoring key '{key}' with value {value}"),
            },
        }

        Ok(())
    }

    /// Display name of the theme.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description of the theme.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Render mode the theme is designed for.
    pub fn mode(&self) -> Option<RenderMode> {
        self.mode
    }

    /// Required colors.
    pub fn colors(&self) -> &BaseColors {
        &self.colors
    }

    /// Explicitly set detail colors.
    pub fn details(&self) -> &DetailColors {
        &self.details
    }

    /// Extra color by key, e.g. `road_motorway_inner`.
    pub fn extra(&self, key: &str) -> Option<Color> {
        self.extras.get(key).copied()
    }

    /// Mode parameters.
    pub fn params(&self) -> &ModeParams {
        &self.params
    }

    /// Theme with all detail colors resolved.
    pub fn palette(&self) -> Palette {
        Palette::derive(&self.colors, &self.details)
    }

    /// Returns a copy of the theme with the given colors replaced. Detail colors derived from the
    /// replaced ones follow the new values.
    pub fn with_overrides(&self, overrides: &ColorOverrides) -> Theme {
        let mut theme = self.clone();
        let colors = &mut theme.colors;

        if let Some(bg) = overrides.bg {
            colors.bg = bg;
        }
        if let Some(water) = overrides.water {
            colors.water = water;
        }
        if let Some(parks) = overrides.parks {
            colors.parks = parks;
        }
        for class in RoadClass::ALL {
            if let Some(color) = overrides.road(class) {
                *colors.road_mut(class) = color;
            }
        }

        theme
    }

    /// Sets the render mode.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets an explicit detail color. Unknown keys are stored as extra colors.
    pub fn with_color(mut self, key: &str, color: Color) -> Self {
        match self.details.slot(key) {
            Some(slot) => *slot = Some(color),
            None => {
                self.extras.insert(key.to_string(), color);
            }
        }
        self
    }

    /// Replaces mode parameters.
    pub fn with_params(mut self, params: ModeParams) -> Self {
        self.params = params;
        self
    }
}

fn parse_color(theme: &str, key: &str, value: &Value) -> Result<Color, ThemeError> {
    value
        .as_str()
        .and_then(Color::parse)
        .ok_or_else(|| ThemeError::invalid(theme, format!("invalid color for '{key}': {value}")))
}

fn parse_color_list(theme: &str, key: &str, value: &Value) -> Result<Vec<Color>, ThemeError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| parse_color(theme, key, item))
            .collect(),
        _ => Err(ThemeError::invalid(
            theme,
            format!("'{key}' must be a list of colors"),
        )),
    }
}

fn parse_number(theme: &str, key: &str, value: &Value) -> Result<f32, ThemeError> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .map(|v| v as f32)
        .ok_or_else(|| ThemeError::invalid(theme, format!("'{key}' must be a number")))
}

fn parse_string(theme: &str, key: &str, value: &Value) -> Result<String, ThemeError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ThemeError::invalid(theme, format!("'{key}' must be a string")))
}

/// Converts a theme back into its JSON form.
impl From<&Theme> for Value {
    fn from(theme: &Theme) -> Self {
        let mut map = Map::new();
        let mut put = |key: &str, color: Color| {
            map.insert(key.to_string(), Value::String(color.to_hex()));
        };

        let colors = &theme.colors;
        put("bg", colors.bg);
        put("text", colors.text);
        put("gradient_color", colors.gradient_color);
        put("water", colors.water);
        put("parks", colors.parks);
        for class in RoadClass::ALL {
            put(class.theme_key(), colors.road(class));
        }

        let mut details = theme.details.clone();
        for key in palette::DETAIL_KEYS {
            if let Some(Some(color)) = details.slot(key).map(|slot| *slot) {
                put(key, color);
            }
        }
        for (key, color) in &theme.extras {
            put(key, *color);
        }

        map.insert("name".into(), Value::String(theme.name.clone()));
        if let Some(description) = &theme.description {
            map.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(mode) = theme.mode {
            map.insert("mode".into(), Value::String(mode.name().to_string()));
        }

        Value::Object(map)
    }
}
