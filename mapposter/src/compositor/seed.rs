use std::hash::{BuildHasher, Hasher};

use ahash::RandomState;
use geo::CoordsIter;
use geo_types::Geometry;

const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// Reproducible stream of pseudo-random numbers.
///
/// Values are hashes of `(seed, index)` computed with fixed hasher keys, so the same seed always gives
/// the same stream and no state is shared between features.
#[derive(Debug, Clone)]
pub struct SeededStream {
    state: RandomState,
    seed: u64,
    index: u64,
}

impl SeededStream {
    /// Creates a stream from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: RandomState::with_seeds(SEEDS[0], SEEDS[1], SEEDS[2], SEEDS[3]),
            seed,
            index: 0,
        }
    }

    /// Creates a stream seeded with the coordinates of a geometry.
    pub fn from_geometry(geometry: &Geometry<f64>) -> Self {
        let mut stream = Self::new(0);
        let mut hasher = stream.state.build_hasher();
        for coord in geometry.coords_iter() {
            hasher.write_u64(coord.x.to_bits());
            hasher.write_u64(coord.y.to_bits());
        }
        stream.seed = hasher.finish();
        stream
    }

    /// Next value of the stream.
    pub fn next_u64(&mut self) -> u64 {
        let value = self.state.hash_one((self.seed, self.index));
        self.index += 1;
        value
    }

    /// Next value in `0..1`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Next value in `min..max`.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }

    /// Picks an item with equal probabilities.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }

        let index = self.next_u64() % items.len() as u64;
        items.get(index as usize)
    }

    /// Picks an item with probability proportional to its weight. Missing, negative or non-finite weights
    /// count as zero. Without usable weights all items are equally likely.
    pub fn pick_weighted<'a, T>(&mut self, items: &'a [T], weights: &[f32]) -> Option<&'a T> {
        let weights: Vec<f32> = (0..items.len())
            .map(|i| {
                weights
                    .get(i)
                    .copied()
                    .filter(|weight| weight.is_finite() && *weight > 0.0)
                    .unwrap_or(0.0)
            })
            .collect();

        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            return self.pick(items);
        }

        let mut target = self.next_f32() * total;
        for (item, weight) in items.iter().zip(&weights) {
            if target < *weight {
                return Some(item);
            }
            target -= weight;
        }

        items
            .iter()
            .zip(&weights)
            .rev()
            .find(|(_, weight)| **weight > 0.0)
            .map(|(item, _)| item)
    }
}
