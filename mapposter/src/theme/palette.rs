use crate::color::Color;
use crate::layer::RoadClass;

use super::{BaseColors, DetailColors};

/// Keys of the optional detail colors.
pub(super) const DETAIL_KEYS: [&str; 13] = [
    "buildings",
    "buildings_fill",
    "buildings_edge",
    "paths",
    "farmland",
    "forest",
    "meadow",
    "waterways",
    "railways",
    "leisure",
    "amenities",
    "amenities_edge",
    "hedges",
];

const BUILDINGS_SHIFT: f32 = 0.15;
const BUILDINGS_FILL_SHIFT: f32 = 0.075;

/// Theme colors with every detail color resolved.
///
/// Detail colors missing from the theme are derived from the required ones:
///
/// * `buildings`: background with HSL lightness moved by 0.15 away from it (darker on light backgrounds,
///   lighter on dark ones). `buildings_fill` moves by half of that in the same direction.
/// * `paths`: residential road color at 50% over the background.
/// * `farmland`, `forest`: park color at 30% over the background. `meadow` uses 20%, `leisure` 60%.
/// * `buildings_edge` and `amenities_edge` copy `buildings`, `amenities` copies `buildings_fill`.
/// * `waterways` copies `water`, `railways` copies `text`, `hedges` copies `parks`.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Required colors.
    pub base: BaseColors,
    /// Building outlines.
    pub buildings: Color,
    /// Building fill.
    pub buildings_fill: Color,
    /// Building edge stroke.
    pub buildings_edge: Color,
    /// Footways and cycleways.
    pub paths: Color,
    /// Farmland.
    pub farmland: Color,
    /// Forests.
    pub forest: Color,
    /// Meadows and other land cover.
    pub meadow: Color,
    /// Linear waterways.
    pub waterways: Color,
    /// Railways.
    pub railways: Color,
    /// Sport grounds and gardens.
    pub leisure: Color,
    /// Worship places, schools and cemeteries.
    pub amenities: Color,
    /// Outline of amenities.
    pub amenities_edge: Color,
    /// Hedges, fences and walls.
    pub hedges: Color,
}

impl Palette {
    pub(super) fn derive(base: &BaseColors, details: &DetailColors) -> Self {
        let bg = base.bg;
        let direction = if bg.lightness() >= 0.5 { -1.0 } else { 1.0 };

        let buildings = details
            .buildings
            .unwrap_or_else(|| bg.shift_lightness(direction * BUILDINGS_SHIFT));
        let buildings_fill = details
            .buildings_fill
            .unwrap_or_else(|| bg.shift_lightness(direction * BUILDINGS_FILL_SHIFT));

        Self {
            buildings,
            buildings_fill,
            buildings_edge: details.buildings_edge.unwrap_or(buildings),
            paths: details
                .paths
                .unwrap_or_else(|| base.road_residential.over(bg, 0.5)),
            farmland: details.farmland.unwrap_or_else(|| base.parks.over(bg, 0.3)),
            forest: details.forest.unwrap_or_else(|| base.parks.over(bg, 0.3)),
            meadow: details.meadow.unwrap_or_else(|| base.parks.over(bg, 0.2)),
            waterways: details.waterways.unwrap_or(base.water),
            railways: details.railways.unwrap_or(base.text),
            leisure: details.leisure.unwrap_or_else(|| base.parks.over(bg, 0.6)),
            amenities: details.amenities.unwrap_or(buildings_fill),
            amenities_edge: details.amenities_edge.unwrap_or(buildings),
            hedges: details.hedges.unwrap_or(base.parks),
            base: base.clone(),
        }
    }

    /// Background color.
    pub fn bg(&self) -> Color {
        self.base.bg
    }

    /// Color of the road class.
    pub fn road(&self, class: RoadClass) -> Color {
        self.base.road(class)
    }

    /// Land cover color for the `landuse`/`natural` value of a landscape feature.
    pub fn landscape(&self, kind: Option<&str>) -> Color {
        match kind {
            Some("farmland" | "orchard" | "vineyard") => self.farmland,
            Some("forest" | "wood" | "scrub") => self.forest,
            _ => self.meadow,
        }
    }
}
