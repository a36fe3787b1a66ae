use geo_types::Coord;
use mapposter_types::{GeoPoint, LocalMercator, Size};
use nalgebra::Point2;

/// Maps geographic coordinates to canvas pixels.
///
/// The view is centered on the location and covers `distance` meters above and below the center. The
/// horizontal extent follows the aspect ratio of the canvas, so the map is never stretched.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapView {
    projection: LocalMercator,
    half_width: f64,
    half_height: f64,
    pixels_per_meter: f64,
}

impl MapView {
    /// Creates a view of a canvas of the given size.
    pub fn new(center: GeoPoint, distance: f64, size: Size<u32>) -> Self {
        let aspect = if size.height() > 0 {
            size.width() as f64 / size.height() as f64
        } else {
            1.0
        };
        let pixels_per_meter = if distance > 0.0 {
            size.height() as f64 / (2.0 * distance)
        } else {
            0.0
        };

        Self {
            projection: LocalMercator::new(center),
            half_width: distance * aspect,
            half_height: distance,
            pixels_per_meter,
        }
    }

    /// Center of the view.
    pub fn center(&self) -> GeoPoint {
        self.projection.center()
    }

    /// Half of the vertical extent in meters, which is the search radius.
    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    /// Half of the horizontal extent in meters.
    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    /// Scale of the view.
    pub fn pixels_per_meter(&self) -> f64 {
        self.pixels_per_meter
    }

    /// Projects a WGS84 coordinate (`x` is longitude) to meters relative to the center.
    pub fn project(&self, coord: Coord<f64>) -> Option<Point2<f64>> {
        self.projection.project(&GeoPoint::from(coord))
    }

    /// Converts projected meters to canvas pixels. The `y` axis of the canvas points down.
    pub fn meters_to_pixel(&self, point: Point2<f64>) -> (f32, f32) {
        let x = (point.x + self.half_width) * self.pixels_per_meter;
        let y = (self.half_height - point.y) * self.pixels_per_meter;
        (x as f32, y as f32)
    }

    /// Converts a WGS84 coordinate to canvas pixels.
    pub fn to_pixel(&self, coord: Coord<f64>) -> Option<(f32, f32)> {
        self.project(coord).map(|point| self.meters_to_pixel(point))
    }

    /// Ground distance between the coordinate and the center in meters.
    pub fn center_distance(&self, coord: Coord<f64>) -> Option<f64> {
        self.project(coord).map(|point| point.coords.norm())
    }
}
