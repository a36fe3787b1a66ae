use nalgebra::Point2;

use super::point::GeoPoint;

/// Semimajor axis of the WGS84 ellipsoid in meters.
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Spherical Mercator centered on a point and scaled so that one unit equals one meter on the ground at
/// the center latitude.
///
/// The origin of the output coordinates is the projected center. `x` grows to the east and `y` grows to
/// the north.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LocalMercator {
    center: GeoPoint,
    origin: Point2<f64>,
    scale: f64,
}

impl LocalMercator {
    /// Creates a projection centered on `center`.
    pub fn new(center: GeoPoint) -> Self {
        let origin = Point2::new(mercator_x(center), mercator_y(center));
        Self {
            center,
            origin,
            scale: center.lat_rad().cos(),
        }
    }

    /// Center of the projection.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Projects a point into ground meters relative to the center. Returns `None` if the result is not finite.
    pub fn project(&self, point: &GeoPoint) -> Option<Point2<f64>> {
        let x = (mercator_x(*point) - self.origin.x) * self.scale;
        let y = (mercator_y(*point) - self.origin.y) * self.scale;

        if x.is_finite() && y.is_finite() {
            Some(Point2::new(x, y))
        } else {
            None
        }
    }

    /// Inverse of [`LocalMercator::project`].
    pub fn unproject(&self, point: &Point2<f64>) -> Option<GeoPoint> {
        if self.scale == 0.0 {
            return None;
        }

        let x = point.x / self.scale + self.origin.x;
        let y = point.y / self.scale + self.origin.y;

        let lat = 2.0 * (y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2;
        let lon = x / EARTH_RADIUS;

        Some(GeoPoint::latlon(lat.to_degrees(), lon.to_degrees()))
    }
}

fn mercator_x(point: GeoPoint) -> f64 {
    EARTH_RADIUS * point.lon_rad()
}

fn mercator_y(point: GeoPoint) -> f64 {
    EARTH_RADIUS
        * (std::f64::consts::FRAC_PI_4 + point.lat_rad() / 2.0)
            .tan()
            .ln()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::latlon;

    #[test]
    fn center_projects_to_origin() {
        let projection = LocalMercator::new(latlon!(52.52, 13.405));
        let projected = projection.project(&latlon!(52.52, 13.405)).unwrap();
        assert_abs_diff_eq!(projected.x, 0.0);
        assert_abs_diff_eq!(projected.y, 0.0);
    }

    #[test]
    fn units_are_ground_meters() {
        let projection = LocalMercator::new(latlon!(52.52, 13.405));

        // 0.01° of latitude is about 1.1 km.
        let north = projection.project(&latlon!(52.53, 13.405)).unwrap();
        assert_abs_diff_eq!(north.y, 1113.2, epsilon = 5.0);
        assert_abs_diff_eq!(north.x, 0.0);

        // 0.01° of longitude shrinks with cos(lat).
        let east = projection.project(&latlon!(52.52, 13.415)).unwrap();
        assert_abs_diff_eq!(east.x, 1113.2 * 52.52f64.to_radians().cos(), epsilon = 5.0);
    }

    #[test]
    fn unproject_inverts_project() {
        let projection = LocalMercator::new(latlon!(-33.8688, 151.2093));
        let point = latlon!(-33.9, 151.25);
        let projected = projection.project(&point).unwrap();
        let back = projection.unproject(&projected).unwrap();

        assert_abs_diff_eq!(back, point, epsilon = 1e-9);
    }
}
