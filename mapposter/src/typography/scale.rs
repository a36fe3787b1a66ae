use crate::paper::PaperSize;

/// Size of the city name before scaling, in points.
pub const BASE_SIZE: f32 = 60.0;
/// Country size relative to the city size.
pub const COUNTRY_RATIO: f32 = 0.37;
/// Coordinates size relative to the city size.
pub const COORDS_RATIO: f32 = 0.23;
/// Subtitle size relative to the country size.
pub const SUBTITLE_RATIO: f32 = 0.8;
/// Attribution size relative to the city size.
pub const ATTRIBUTION_RATIO: f32 = 0.13;
/// Smallest attribution size in points.
pub const MIN_ATTRIBUTION_SIZE: f32 = 6.0;

/// Text scale by search radius. Each entry applies from its distance up to the next one.
pub const ZOOM_BREAKPOINTS: [(f64, f32); 6] = [
    (500.0, 0.4),
    (1000.0, 0.5),
    (2000.0, 0.6),
    (4000.0, 0.75),
    (8000.0, 0.9),
    (15000.0, 1.0),
];

/// Value of the entry with the largest key not greater than `x`. Values below the first key take the
/// first value. Returns `None` for an empty table or a NaN input.
pub fn step_lookup<V: Copy>(table: &[(f64, V)], x: f64) -> Option<V> {
    if x.is_nan() {
        return None;
    }

    let first = table.first()?;
    Some(
        table
            .iter()
            .take_while(|(key, _)| *key <= x)
            .last()
            .unwrap_or(first)
            .1,
    )
}

/// Text scale for a distance.
pub fn zoom_factor(distance: f64) -> f32 {
    step_lookup(&ZOOM_BREAKPOINTS, distance).unwrap_or(1.0)
}

/// Paper and zoom dependent font sizes, in points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextScale {
    paper_factor: f32,
    zoom_factor: f32,
}

impl TextScale {
    /// Scale for the paper and distance.
    pub fn new(paper: PaperSize, distance: f64) -> Self {
        Self {
            paper_factor: paper.scale_factor() as f32,
            zoom_factor: zoom_factor(distance),
        }
    }

    /// Paper multiplier.
    pub fn paper_factor(&self) -> f32 {
        self.paper_factor
    }

    /// Zoom multiplier.
    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// Combined multiplier.
    pub fn factor(&self) -> f32 {
        self.paper_factor * self.zoom_factor
    }

    /// City size before the long name adjustment.
    pub fn final_size(&self) -> f32 {
        BASE_SIZE * self.factor()
    }

    /// City size for a name of `chars` characters. Names longer than ten characters shrink, down to
    /// half the size.
    pub fn city_size(&self, chars: usize) -> f32 {
        let name_scale = if chars > 10 {
            (10.0 / chars as f32).max(0.5)
        } else {
            1.0
        };
        self.final_size() * name_scale
    }

    /// Country size.
    pub fn country_size(&self) -> f32 {
        self.final_size() * COUNTRY_RATIO
    }

    /// Subtitle size.
    pub fn subtitle_size(&self) -> f32 {
        self.country_size() * SUBTITLE_RATIO
    }

    /// Coordinates size.
    pub fn coords_size(&self) -> f32 {
        self.final_size() * COORDS_RATIO
    }

    /// Attribution size.
    pub fn attribution_size(&self) -> f32 {
        (self.final_size() * ATTRIBUTION_RATIO).max(MIN_ATTRIBUTION_SIZE)
    }

    /// Thickness of the separator rule.
    pub fn rule_thickness(&self) -> f32 {
        self.factor().max(0.5)
    }
}
