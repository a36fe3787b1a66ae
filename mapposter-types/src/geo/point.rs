use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use crate::cartesian::Rect;

/// Approximate length of one degree of latitude in meters.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// 2d point on the surface of the Earth, in WGS84 degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude and longitude in degrees.
    pub const fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.lat.to_radians()
    }

    /// Longitude in radians.
    pub fn lon_rad(&self) -> f64 {
        self.lon.to_radians()
    }

    /// Returns true if both coordinates are finite and inside the valid WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Square extent in degrees (`x` is longitude, `y` is latitude) covering `radius` meters to every side
    /// of the point.
    ///
    /// The longitude span widens with latitude so that the extent stays square on the ground. Close to the
    /// poles the cosine is clamped to keep the span finite.
    pub fn extent(&self, radius: f64) -> Rect {
        let d_lat = radius / METERS_PER_DEGREE;
        let d_lon = radius / (METERS_PER_DEGREE * self.lat_rad().cos().max(1e-6));

        Rect::new(
            self.lon - d_lon,
            self.lat - d_lat,
            self.lon + d_lon,
            self.lat + d_lat,
        )
    }
}

impl From<geo_types::Point<f64>> for GeoPoint {
    fn from(value: geo_types::Point<f64>) -> Self {
        Self::latlon(value.y(), value.x())
    }
}

impl From<geo_types::Coord<f64>> for GeoPoint {
    fn from(value: geo_types::Coord<f64>) -> Self {
        Self::latlon(value.y, value.x)
    }
}

impl From<GeoPoint> for geo_types::Coord<f64> {
    fn from(value: GeoPoint) -> Self {
        geo_types::coord! { x: value.lon, y: value.lat }
    }
}

impl AbsDiffEq for GeoPoint {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lat.abs_diff_eq(&other.lat, epsilon) && self.lon.abs_diff_eq(&other.lon, epsilon)
    }
}

/// Creates a new [`GeoPoint`] from latitude and longitude values (in degrees).
///
/// ```
/// use mapposter_types::latlon;
///
/// let point = latlon!(48.8566, 2.3522);
/// assert_eq!(point.lat(), 48.8566);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        $crate::geo::GeoPoint::latlon($lat, $lon)
    };
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn validity() {
        assert!(latlon!(52.52, 13.405).is_valid());
        assert!(latlon!(-90.0, 180.0).is_valid());
        assert!(!latlon!(91.0, 0.0).is_valid());
        assert!(!latlon!(0.0, -180.5).is_valid());
        assert!(!latlon!(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn extent_is_square_on_the_ground() {
        let point = latlon!(60.0, 10.0);
        let extent = point.extent(1000.0);

        assert_abs_diff_eq!(extent.height(), 2000.0 / METERS_PER_DEGREE, epsilon = 1e-12);
        // cos(60°) = 0.5 so the longitude span doubles.
        assert_abs_diff_eq!(extent.width(), 4000.0 / METERS_PER_DEGREE, epsilon = 1e-9);
        assert_abs_diff_eq!(extent.center().x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(extent.center().y, 60.0, epsilon = 1e-12);
    }

    #[test]
    fn geo_types_conversion() {
        let point = GeoPoint::from(geo_types::Point::new(2.3522, 48.8566));
        assert_abs_diff_eq!(point, latlon!(48.8566, 2.3522));

        let coord: geo_types::Coord<f64> = point.into();
        assert_eq!(coord.x, 2.3522);
        assert_eq!(coord.y, 48.8566);
    }
}
