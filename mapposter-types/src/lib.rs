//! Primitives shared by the `mapposter` renderer.
//!
//! * [`geo`] holds points on the Earth surface and the local projection used to turn them into ground
//!   meters around a poster center.
//! * [`cartesian`] holds plain planar shapes: axis-aligned [`Rect`] and [`Size`].

pub mod cartesian;
pub mod geo;

pub use cartesian::{Rect, Size};
pub use geo::{GeoPoint, LocalMercator};
