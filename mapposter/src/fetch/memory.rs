use super::{FeatureQuery, GeoDataSource, SourceError};
use crate::layer::Feature;

/// Data source holding features in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    features: Vec<Feature>,
}

impl MemorySource {
    /// Creates a source with the given features.
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Adds a feature.
    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// All features of the source.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }
}

impl FromIterator<Feature> for MemorySource {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl GeoDataSource for MemorySource {
    fn query(&self, query: &FeatureQuery) -> Result<Vec<Feature>, SourceError> {
        Ok(self
            .features
            .iter()
            .filter(|feature| query.matches(feature))
            .cloned()
            .collect())
    }
}
