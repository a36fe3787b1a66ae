use std::collections::BTreeSet;

use crate::layer::LayerKind;

/// Detail layers enabled up to a given distance.
#[derive(Debug, Clone, PartialEq)]
pub struct LodTier {
    max_distance: f64,
    layers: Vec<LayerKind>,
}

impl LodTier {
    /// Creates a tier for distances up to and including `max_distance`. Returns `None` if the distance is
    /// not a positive finite number.
    pub fn new(max_distance: f64, layers: impl IntoIterator<Item = LayerKind>) -> Option<Self> {
        if max_distance.is_finite() && max_distance > 0.0 {
            Some(Self {
                max_distance,
                layers: layers.into_iter().collect(),
            })
        } else {
            None
        }
    }

    /// Largest distance the tier applies to.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Detail layers of the tier.
    pub fn layers(&self) -> &[LayerKind] {
        &self.layers
    }
}

/// Level of detail policy: which detail layers are rendered by default at a given search radius.
///
/// Core layers are always active. Beyond the last tier only core layers are rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct LodPolicy {
    tiers: Vec<LodTier>,
}

impl Default for LodPolicy {
    fn default() -> Self {
        use LayerKind::*;

        let tiers = [
            (
                500.0,
                vec![Buildings, Paths, Landscape, Poi, Waterways, Railways, Hedges],
            ),
            (2000.0, vec![Buildings, Paths, Landscape]),
            (8000.0, vec![Buildings]),
        ]
        .into_iter()
        .filter_map(|(distance, layers)| LodTier::new(distance, layers))
        .collect();

        Self { tiers }
    }
}

impl LodPolicy {
    /// Creates a policy from tiers. Tiers are sorted by distance.
    pub fn new(mut tiers: Vec<LodTier>) -> Self {
        tiers.sort_by(|a, b| a.max_distance.total_cmp(&b.max_distance));
        Self { tiers }
    }

    /// Tiers of the policy from the nearest to the farthest.
    pub fn tiers(&self) -> &[LodTier] {
        &self.tiers
    }

    /// Detail layers enabled by default at the distance.
    pub fn detail_layers(&self, distance: f64) -> BTreeSet<LayerKind> {
        self.tiers
            .iter()
            .find(|tier| distance <= tier.max_distance)
            .map(|tier| tier.layers.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Layers to fetch: core layers plus either the explicit selection or the detail layers of the
    /// distance.
    pub fn active_layers(
        &self,
        distance: f64,
        explicit: Option<&BTreeSet<LayerKind>>,
    ) -> BTreeSet<LayerKind> {
        let mut layers = match explicit {
            Some(layers) => layers.clone(),
            None => self.detail_layers(distance),
        };
        layers.extend(LayerKind::CORE);
        layers
    }
}
