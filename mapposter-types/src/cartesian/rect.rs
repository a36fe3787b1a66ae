use nalgebra::{Point2, Scalar};
use num_traits::Num;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect<N = f64> {
    /// Left edge.
    pub x_min: N,
    /// Bottom edge.
    pub y_min: N,
    /// Right edge.
    pub x_max: N,
    /// Top edge.
    pub y_max: N,
}

impl<N: Num + Copy + PartialOrd + Scalar> Rect<N> {
    /// Creates a new rectangle from its edges.
    pub fn new(x_min: N, y_min: N, x_max: N, y_max: N) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> N {
        self.x_max - self.x_min
    }

    /// Height of the rectangle.
    pub fn height(&self) -> N {
        self.y_max - self.y_min
    }

    /// Center point.
    pub fn center(&self) -> Point2<N> {
        let two = N::one() + N::one();
        Point2::new(
            (self.x_min + self.x_max) / two,
            (self.y_min + self.y_max) / two,
        )
    }

    /// Rectangle shrunk by `amount` from every side.
    pub fn shrink(&self, amount: N) -> Self {
        Self {
            x_min: self.x_min + amount,
            x_max: self.x_max - amount,
            y_min: self.y_min + amount,
            y_max: self.y_max - amount,
        }
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self {
            x_min: min(self.x_min, other.x_min),
            y_min: min(self.y_min, other.y_min),
            x_max: max(self.x_max, other.x_max),
            y_max: max(self.y_max, other.y_max),
        }
    }

    /// Bounding rectangle of the points, or `None` if the iterator is empty.
    pub fn from_points(mut points: impl Iterator<Item = Point2<N>>) -> Option<Self> {
        let first = points.next()?;
        let init = Self::new(first.x, first.y, first.x, first.y);

        Some(points.fold(init, |rect, p| {
            rect.merge(Self::new(p.x, p.y, p.x, p.y))
        }))
    }

    /// Returns true if the point is inside the rectangle or on its border.
    pub fn contains(&self, point: &Point2<N>) -> bool {
        self.x_min <= point.x
            && self.x_max >= point.x
            && self.y_min <= point.y
            && self.y_max >= point.y
    }

    /// Returns true if the two rectangles share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.x_min <= other.x_max
            && self.x_max >= other.x_min
            && self.y_min <= other.y_max
            && self.y_max >= other.y_min
    }
}

fn min<N: PartialOrd>(a: N, b: N) -> N {
    if a < b {
        a
    } else {
        b
    }
}

fn max<N: PartialOrd>(a: N, b: N) -> N {
    if a > b {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points() {
        let points = [
            Point2::new(1.0, 5.0),
            Point2::new(-2.0, 3.0),
            Point2::new(4.0, -1.0),
        ];
        let rect = Rect::from_points(points.into_iter()).unwrap();
        assert_eq!(rect, Rect::new(-2.0, -1.0, 4.0, 5.0));
        assert_eq!(rect.center(), Point2::new(1.0, 2.0));

        assert!(Rect::<f64>::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn contains_and_intersects() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(&Point2::new(10, 0)));
        assert!(!rect.contains(&Point2::new(11, 5)));

        assert!(rect.intersects(&Rect::new(10, 10, 20, 20)));
        assert!(!rect.intersects(&Rect::new(11, 0, 20, 10)));
        assert_eq!(rect.shrink(2), Rect::new(2, 2, 8, 8));
    }
}
