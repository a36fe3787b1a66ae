//! Geographic points and projections.

mod point;
mod projection;

pub use point::{GeoPoint, METERS_PER_DEGREE};
pub use projection::{LocalMercator, EARTH_RADIUS};
