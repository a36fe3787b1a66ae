//! Semantic map layers and the features they hold.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use geo::BoundingRect;
use geo_types::{Geometry, Rect};
use serde::{Deserialize, Serialize};

mod road;
mod tags;

pub use road::{RoadClass, RoadGroup};
pub use tags::{TagFilter, TagMatch, Tags};

const PATH_HIGHWAYS: [&str; 5] = ["track", "path", "footway", "cycleway", "bridleway"];

/// Semantic layer of a poster.
///
/// Variants are declared in paint order, so sorting kinds gives the bottom-to-top order of the poster.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Farmland, meadows, forests and other natural land cover.
    Landscape,
    /// Lakes, ponds and wide rivers.
    Water,
    /// Streams, rivers, canals and ditches drawn as lines.
    Waterways,
    /// Parks and grass areas.
    Parks,
    /// Points of interest: worship places, schools, cemeteries, sport grounds.
    Poi,
    /// Building footprints.
    Buildings,
    /// Hedges, fences and walls.
    Hedges,
    /// Footways, cycleways, tracks and paths.
    Paths,
    /// Railway and tram lines.
    Railways,
    /// Street network.
    Roads,
}

impl LayerKind {
    /// All layers in paint order.
    pub const ALL: [LayerKind; 10] = [
        Self::Landscape,
        Self::Water,
        Self::Waterways,
        Self::Parks,
        Self::Poi,
        Self::Buildings,
        Self::Hedges,
        Self::Paths,
        Self::Railways,
        Self::Roads,
    ];

    /// Layers that are rendered at every distance.
    pub const CORE: [LayerKind; 3] = [Self::Water, Self::Parks, Self::Roads];

    /// Returns true for water, parks and roads.
    pub fn is_core(&self) -> bool {
        Self::CORE.contains(self)
    }

    /// Name of the layer as used in render specs.
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Landscape => "landscape",
            LayerKind::Water => "water",
            LayerKind::Waterways => "waterways",
            LayerKind::Parks => "parks",
            LayerKind::Poi => "poi",
            LayerKind::Buildings => "buildings",
            LayerKind::Hedges => "hedges",
            LayerKind::Paths => "paths",
            LayerKind::Railways => "railways",
            LayerKind::Roads => "roads",
        }
    }

    /// Tags a feature must have to belong to the layer.
    pub fn tag_filter(&self) -> TagFilter {
        match self {
            LayerKind::Water => TagFilter::new()
                .one_of("natural", &["water"])
                .one_of("waterway", &["riverbank"]),
            LayerKind::Parks => TagFilter::new()
                .one_of("leisure", &["park"])
                .one_of("landuse", &["grass"]),
            LayerKind::Roads => TagFilter::new().any_except("highway", &PATH_HIGHWAYS),
            LayerKind::Buildings => TagFilter::new().any("building"),
            LayerKind::Hedges => TagFilter::new().one_of("barrier", &["hedge", "fence", "wall"]),
            LayerKind::Paths => TagFilter::new().one_of("highway", &PATH_HIGHWAYS),
            LayerKind::Landscape => TagFilter::new()
                .one_of(
                    "landuse",
                    &["farmland", "meadow", "orchard", "vineyard", "forest"],
                )
                .one_of("natural", &["wood", "scrub", "heath", "grassland"]),
            LayerKind::Waterways => TagFilter::new().one_of(
                "waterway",
                &["stream", "river", "canal", "ditch", "drain"],
            ),
            LayerKind::Railways => TagFilter::new().one_of(
                "railway",
                &["rail", "tram", "light_rail", "narrow_gauge"],
            ),
            LayerKind::Poi => TagFilter::new()
                .one_of("amenity", &["place_of_worship", "school", "cemetery"])
                .one_of(
                    "leisure",
                    &["pitch", "playground", "garden", "sports_centre"],
                ),
        }
    }
}

impl Display for LayerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Geographic feature: WGS84 geometry (`x` is longitude) and its tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    geometry: Geometry<f64>,
    tags: Tags,
}

impl Feature {
    /// Creates a new feature.
    pub fn new(geometry: impl Into<Geometry<f64>>, tags: Tags) -> Self {
        Self {
            geometry: geometry.into(),
            tags,
        }
    }

    /// Adds a tag to the feature.
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    /// Geometry of the feature.
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    /// Tags of the feature.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Value of a tag.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Road class derived from the `highway` tag. Features without the tag are [`RoadClass::Default`].
    pub fn road_class(&self) -> RoadClass {
        self.tag("highway")
            .map(RoadClass::from_highway)
            .unwrap_or(RoadClass::Default)
    }

    /// Bounding rectangle of the geometry in degrees. `None` for empty geometries.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }
}

/// Features of one layer.
pub type LayerFeatures = Vec<Feature>;

/// Features fetched for a single render, grouped by layer.
#[derive(Debug, Clone, Default)]
pub struct LayerSet {
    layers: BTreeMap<LayerKind, LayerFeatures>,
    skipped: Vec<LayerKind>,
}

impl LayerSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets features of a layer. An empty list marks the layer as skipped.
    pub fn insert(&mut self, kind: LayerKind, features: LayerFeatures) {
        if features.is_empty() {
            self.skip(kind);
        } else {
            self.skipped.retain(|k| *k != kind);
            self.layers.insert(kind, features);
        }
    }

    /// Same as [`LayerSet::insert`], but returns the set.
    pub fn with_layer(mut self, kind: LayerKind, features: LayerFeatures) -> Self {
        self.insert(kind, features);
        self
    }

    /// Marks the layer as requested but empty.
    pub fn skip(&mut self, kind: LayerKind) {
        self.layers.remove(&kind);
        if !self.skipped.contains(&kind) {
            self.skipped.push(kind);
        }
    }

    /// Features of the layer, if it was fetched and is not empty.
    pub fn get(&self, kind: LayerKind) -> Option<&[Feature]> {
        self.layers.get(&kind).map(Vec::as_slice)
    }

    /// Returns true if the layer has features.
    pub fn contains(&self, kind: LayerKind) -> bool {
        self.layers.contains_key(&kind)
    }

    /// Layers that were requested but came back empty.
    pub fn skipped(&self) -> &[LayerKind] {
        &self.skipped
    }

    /// Non-empty layers in paint order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, &[Feature])> {
        self.layers
            .iter()
            .map(|(kind, features)| (*kind, features.as_slice()))
    }

    /// Total number of features.
    pub fn feature_count(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Returns true if no layer has features.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
