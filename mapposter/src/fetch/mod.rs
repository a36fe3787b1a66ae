//! Retrieval of map features from geographic data sources.

use std::collections::BTreeSet;

use log::debug;
use mapposter_types::{GeoPoint, Rect};
use thiserror::Error;

use crate::layer::{Feature, LayerKind, LayerSet, TagFilter};

#[cfg(feature = "geojson")]
mod geojson_source;
mod memory;

#[cfg(feature = "geojson")]
pub use geojson_source::GeoJsonSource;
pub use memory::MemorySource;

/// Error of a geographic data source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source cannot be reached.
    #[error("source is unavailable: {0}")]
    Unavailable(String),
    /// Source data cannot be read.
    #[error("failed to read source data")]
    Io(#[from] std::io::Error),
    /// Source data is malformed.
    #[error("malformed source data: {0}")]
    Malformed(String),
}

/// Feature fetching error.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Data source failed. Fatal for the render.
    #[error("data source unavailable while fetching '{layer}'")]
    DataSourceUnavailable {
        /// Layer being fetched.
        layer: LayerKind,
        /// Source failure.
        #[source]
        source: SourceError,
    },
    /// Layer has no features in the requested area. The layer is skipped.
    #[error("no '{0}' features in the requested area")]
    EmptyResult(LayerKind),
}

/// Request for the features of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureQuery {
    /// Center of the requested area.
    pub center: GeoPoint,
    /// Half size of the requested square in meters.
    pub radius: f64,
    /// Layer being requested.
    pub layer: LayerKind,
    /// Tags a feature must match.
    pub filter: TagFilter,
}

impl FeatureQuery {
    /// Creates a query for the layer with the layer's tag filter.
    pub fn new(center: GeoPoint, radius: f64, layer: LayerKind) -> Self {
        Self {
            center,
            radius,
            layer,
            filter: layer.tag_filter(),
        }
    }

    /// Requested area in degrees (`x` is longitude).
    pub fn bbox(&self) -> Rect {
        self.center.extent(self.radius)
    }

    /// Returns true if the feature passes the tag filter and its bounding rectangle intersects the
    /// requested area.
    pub fn matches(&self, feature: &Feature) -> bool {
        if !self.filter.matches(feature.tags()) {
            return false;
        }

        let Some(rect) = feature.bounding_rect() else {
            return false;
        };
        let (min, max) = (rect.min(), rect.max());
        self.bbox().intersects(&Rect::new(min.x, min.y, max.x, max.y))
    }
}

/// Source of geographic features.
///
/// Retries, rate limiting and caching are the responsibility of the implementation. A failing query is
/// never retried by the fetcher.
pub trait GeoDataSource {
    /// Returns features matching the query.
    fn query(&self, query: &FeatureQuery) -> Result<Vec<Feature>, SourceError>;
}

impl<T: GeoDataSource + ?Sized> GeoDataSource for &T {
    fn query(&self, query: &FeatureQuery) -> Result<Vec<Feature>, SourceError> {
        (**self).query(query)
    }
}

/// Fetches the layers of a poster from a data source.
#[derive(Debug)]
pub struct FeatureFetcher<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S: GeoDataSource + ?Sized> FeatureFetcher<'a, S> {
    /// Creates a fetcher reading from the source.
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetches every layer in `active_layers`. Empty layers are recorded as skipped in the result, any
    /// source failure aborts the fetch.
    pub fn fetch(
        &self,
        center: GeoPoint,
        distance: f64,
        active_layers: &BTreeSet<LayerKind>,
    ) -> Result<LayerSet, FetchError> {
        let mut layer_set = LayerSet::new();
        for layer in active_layers {
            match self.fetch_layer(center, distance, *layer) {
                Ok(features) => {
                    debug!("Fetched {} '{layer}' features", features.len());
                    layer_set.insert(*layer, features);
                }
                Err(FetchError::EmptyResult(layer)) => {
                    debug!("Layer '{layer}' is empty and will be skipped");
                    layer_set.skip(layer);
                }
                Err(err) => return Err(err),
            }
        }

        Ok(layer_set)
    }

    /// Fetches a single layer.
    pub fn fetch_layer(
        &self,
        center: GeoPoint,
        distance: f64,
        layer: LayerKind,
    ) -> Result<Vec<Feature>, FetchError> {
        let query = FeatureQuery::new(center, distance, layer);
        let features = self
            .source
            .query(&query)
            .map_err(|source| FetchError::DataSourceUnavailable { layer, source })?;

        if features.is_empty() {
            Err(FetchError::EmptyResult(layer))
        } else {
            Ok(features)
        }
    }
}
