//! Layout of the poster text block.
//!
//! The layout is computed in normalized poster coordinates (`x` from the left edge, `y` from the bottom
//! edge, both in `0..=1`) with font sizes in points, so it does not depend on the output resolution.

use thiserror::Error;

use crate::color::Color;
use crate::font::FontWeight;
use crate::location::Location;
use crate::paper::PaperSize;
use crate::render_spec::{Alignment, RenderSpec};

mod coords;
mod scale;

pub use coords::CoordsFormat;
pub use scale::{step_lookup, zoom_factor, TextScale, ZOOM_BREAKPOINTS};

/// Text printed in the corner of every poster.
pub const ATTRIBUTION: &str = "© OpenStreetMap contributors";

const POINTS_PER_INCH: f32 = 72.0;
const RULE_LENGTH_RATIO: f32 = 0.3;

/// Unsupported layout parameter.
#[derive(Debug, Error)]
pub enum TypographyError {
    /// Paper preset is not known.
    #[error("unknown paper size '{0}'")]
    UnknownPaperSize(String),
    /// Coordinates notation is not known.
    #[error("unsupported coordinates format '{0}'")]
    UnsupportedCoordsFormat(String),
}

/// Measures the advance width of a text.
pub trait TextMeasure {
    /// Width of `text` set in the given weight at `size` points, in points.
    fn text_width(&self, text: &str, weight: FontWeight, size: f32) -> f32;
}

/// Purpose of a text run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// City name.
    City,
    /// Custom subtitle.
    Subtitle,
    /// Country name.
    Country,
    /// Coordinates.
    Coords,
    /// Data attribution.
    Attribution,
}

/// Single line of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Purpose of the run.
    pub role: TextRole,
    /// Text to draw.
    pub text: String,
    /// Font size in points.
    pub size: f32,
    /// Font weight.
    pub weight: FontWeight,
    /// Text color with the run opacity applied.
    pub color: Color,
    /// Horizontal anchor, as a fraction of the width.
    pub x: f32,
    /// Baseline, as a fraction of the height from the bottom.
    pub y: f32,
    /// Alignment relative to the anchor.
    pub alignment: Alignment,
}

/// Horizontal separator between the city name and the lines below it.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleLine {
    /// Left end, as a fraction of the width.
    pub x_start: f32,
    /// Right end, as a fraction of the width.
    pub x_end: f32,
    /// Position, as a fraction of the height from the bottom.
    pub y: f32,
    /// Thickness in points.
    pub thickness: f32,
    /// Line color.
    pub color: Color,
}

/// Positioned text of a poster.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    /// Text runs in drawing order.
    pub runs: Vec<TextRun>,
    /// Separator line.
    pub rule: RuleLine,
}

impl TextLayout {
    /// First run with the given role.
    pub fn run(&self, role: TextRole) -> Option<&TextRun> {
        self.runs.iter().find(|run| run.role == role)
    }
}

/// Computes the text block of a poster.
///
/// Texts come from the location unless the personalization overrides them. `theme_text` is
/// used unless the personalization sets a text color. The result depends only on the inputs.
pub fn layout(
    spec: &RenderSpec,
    location: &Location,
    theme_text: Color,
    measure: &impl TextMeasure,
) -> Result<TextLayout, TypographyError> {
    let paper: PaperSize = spec.paper_size.parse()?;
    let personalization = &spec.personalization;
    let placement = &spec.text;
    let scale = TextScale::new(paper, spec.distance);
    let color = personalization.text_color.unwrap_or(theme_text);

    let custom_coords = personalization
        .custom_coords_text
        .as_deref()
        .filter(|s| !s.is_empty());
    let coords_text = if placement.show_coords {
        Some(match custom_coords {
            Some(text) => text.to_string(),
            None => personalization
                .coords_format
                .parse::<CoordsFormat>()?
                .format(location.point.lat(), location.point.lon()),
        })
    } else {
        None
    };

    let city = personalization
        .custom_city_text
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(location.city.as_deref())
        .unwrap_or_default();
    let country = personalization
        .custom_country_text
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(location.country.as_deref())
        .unwrap_or_default();
    let subtitle = personalization
        .custom_subtitle
        .as_deref()
        .filter(|s| !s.is_empty());

    let (x, y, alignment) = (placement.x, placement.y, placement.alignment);
    let run = |role: TextRole,
               text: String,
               size: f32,
               weight: FontWeight,
               opacity: f32,
               y: f32| TextRun {
        role,
        text,
        size,
        weight,
        color: color.with_opacity(opacity),
        x,
        y,
        alignment,
    };

    let mut runs = vec![];
    if !city.is_empty() {
        runs.push(run(
            TextRole::City,
            spaced_upper(city),
            scale.city_size(city.chars().count()),
            FontWeight::Bold,
            1.0,
            y,
        ));
    }

    if let Some(subtitle) = subtitle {
        runs.push(run(
            TextRole::Subtitle,
            subtitle.to_uppercase(),
            scale.subtitle_size(),
            FontWeight::Light,
            0.8,
            y - 0.025,
        ));
    }

    if placement.show_country && !country.is_empty() {
        let offset = if subtitle.is_some() { 0.025 } else { 0.04 };
        runs.push(run(
            TextRole::Country,
            country.to_uppercase(),
            scale.country_size(),
            FontWeight::Light,
            1.0,
            y - 0.04 - offset,
        ));
    }

    if let Some(coords_text) = coords_text {
        let mut coords_y = y - if placement.show_country { 0.07 } else { 0.04 };
        if subtitle.is_some() {
            coords_y -= 0.025;
        }
        runs.push(run(
            TextRole::Coords,
            coords_text,
            scale.coords_size(),
            FontWeight::Regular,
            0.7,
            coords_y,
        ));
    }

    let longest = runs
        .iter()
        .map(|run| measure.text_width(&run.text, run.weight, run.size))
        .fold(0.0f32, f32::max);
    let paper_width = paper.inches().width() as f32 * POINTS_PER_INCH;
    let rule_length = RULE_LENGTH_RATIO * longest / paper_width;
    let (x_start, x_end) = match alignment {
        Alignment::Left => (x, x + rule_length),
        Alignment::Center => (x - rule_length / 2.0, x + rule_length / 2.0),
        Alignment::Right => (x - rule_length, x),
    };
    let rule = RuleLine {
        x_start,
        x_end,
        y: y - 0.04,
        thickness: scale.rule_thickness(),
        color,
    };

    runs.push(TextRun {
        role: TextRole::Attribution,
        text: ATTRIBUTION.to_string(),
        size: scale.attribution_size(),
        weight: FontWeight::Light,
        color: color.with_opacity(0.5),
        x: 0.98,
        y: 0.02,
        alignment: Alignment::Right,
    });

    Ok(TextLayout { runs, rule })
}

/// Upper-cases the text and separates its characters with two spaces.
fn spaced_upper(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join("  ")
}
