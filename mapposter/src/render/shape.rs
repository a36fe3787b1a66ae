use geo_types::{Coord, Geometry, LineString, Polygon};
use tiny_skia::{Path, PathBuilder};

use super::view::MapView;

/// Fill path of the polygonal parts of a geometry in canvas pixels. Lines and points are ignored.
pub fn area_path(view: &MapView, geometry: &Geometry<f64>) -> Option<Path> {
    let mut builder = PathBuilder::new();
    add_areas(view, geometry, &mut builder);
    builder.finish()
}

/// Stroke path of a geometry in canvas pixels: lines as they are and the rings of polygons.
pub fn line_path(view: &MapView, geometry: &Geometry<f64>) -> Option<Path> {
    lines_path(view, std::iter::once(geometry))
}

/// Same as [`line_path`], but merges several geometries into one path.
pub fn lines_path<'a>(
    view: &MapView,
    geometries: impl IntoIterator<Item = &'a Geometry<f64>>,
) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for geometry in geometries {
        add_lines(view, geometry, &mut builder);
    }
    builder.finish()
}

/// Pixel positions of the points of a geometry.
pub fn point_positions(view: &MapView, geometry: &Geometry<f64>) -> Vec<(f32, f32)> {
    match geometry {
        Geometry::Point(point) => view.to_pixel(point.0).into_iter().collect(),
        Geometry::MultiPoint(points) => points
            .iter()
            .filter_map(|point| view.to_pixel(point.0))
            .collect(),
        Geometry::GeometryCollection(collection) => collection
            .iter()
            .flat_map(|geometry| point_positions(view, geometry))
            .collect(),
        _ => vec![],
    }
}

fn add_areas(view: &MapView, geometry: &Geometry<f64>, builder: &mut PathBuilder) {
    match geometry {
        Geometry::Polygon(polygon) => add_polygon(view, polygon, builder),
        Geometry::MultiPolygon(polygons) => {
            for polygon in polygons {
                add_polygon(view, polygon, builder);
            }
        }
        Geometry::Rect(rect) => add_polygon(view, &rect.to_polygon(), builder),
        Geometry::Triangle(triangle) => add_polygon(view, &triangle.to_polygon(), builder),
        Geometry::GeometryCollection(collection) => {
            for geometry in collection {
                add_areas(view, geometry, builder);
            }
        }
        Geometry::Point(_)
        | Geometry::MultiPoint(_)
        | Geometry::Line(_)
        | Geometry::LineString(_)
        | Geometry::MultiLineString(_) => {}
    }
}

fn add_lines(view: &MapView, geometry: &Geometry<f64>, builder: &mut PathBuilder) {
    match geometry {
        Geometry::Line(line) => add_coords(view, [line.start, line.end], false, builder),
        Geometry::LineString(line) => add_ring(view, line, false, builder),
        Geometry::MultiLineString(lines) => {
            for line in lines {
                add_ring(view, line, false, builder);
            }
        }
        Geometry::Polygon(polygon) => add_polygon(view, polygon, builder),
        Geometry::MultiPolygon(polygons) => {
            for polygon in polygons {
                add_polygon(view, polygon, builder);
            }
        }
        Geometry::Rect(rect) => add_polygon(view, &rect.to_polygon(), builder),
        Geometry::Triangle(triangle) => add_polygon(view, &triangle.to_polygon(), builder),
        Geometry::GeometryCollection(collection) => {
            for geometry in collection {
                add_lines(view, geometry, builder);
            }
        }
        Geometry::Point(_) | Geometry::MultiPoint(_) => {}
    }
}

fn add_polygon(view: &MapView, polygon: &Polygon<f64>, builder: &mut PathBuilder) {
    add_ring(view, polygon.exterior(), true, builder);
    for interior in polygon.interiors() {
        add_ring(view, interior, true, builder);
    }
}

fn add_ring(view: &MapView, ring: &LineString<f64>, close: bool, builder: &mut PathBuilder) {
    add_coords(view, ring.coords().copied(), close, builder);
}

fn add_coords(
    view: &MapView,
    coords: impl IntoIterator<Item = Coord<f64>>,
    close: bool,
    builder: &mut PathBuilder,
) {
    let mut started = false;
    for (x, y) in coords.into_iter().filter_map(|coord| view.to_pixel(coord)) {
        if started {
            builder.line_to(x, y);
        } else {
            builder.move_to(x, y);
            started = true;
        }
    }

    if started && close {
        builder.close();
    }
}

#[cfg(test)]
mod tests {
    use geo_types::{line_string, point, polygon};
    use mapposter_types::{latlon, Size};

    use super::*;

    fn view() -> MapView {
        MapView::new(latlon!(0.0, 0.0), 1000.0, Size::new(100, 100))
    }

    #[test]
    fn polygon_fills_and_strokes() {
        let square: Geometry<f64> = polygon![
            (x: -0.001, y: -0.001),
            (x: 0.001, y: -0.001),
            (x: 0.001, y: 0.001),
            (x: -0.001, y: 0.001)
        ]
        .into();

        let area = area_path(&view(), &square).unwrap();
        let bounds = area.bounds();
        assert!(bounds.left() < 50.0 && bounds.right() > 50.0);
        assert!(bounds.top() < 50.0 && bounds.bottom() > 50.0);
        assert!(line_path(&view(), &square).is_some());
    }

    #[test]
    fn lines_have_no_area() {
        let line: Geometry<f64> = line_string![(x: -0.001, y: 0.0), (x: 0.001, y: 0.0)].into();
        assert!(area_path(&view(), &line).is_none());
        assert!(line_path(&view(), &line).is_some());
        assert!(point_positions(&view(), &line).is_empty());
    }

    #[test]
    fn points() {
        let point: Geometry<f64> = point!(x: 0.0, y: 0.0).into();
        assert_eq!(point_positions(&view(), &point), vec![(50.0, 50.0)]);
        assert!(line_path(&view(), &point).is_none());
    }
}
