use num_traits::{Num, NumCast};
use serde::{Deserialize, Serialize};

/// Width and height of a planar object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size<N = f64> {
    width: N,
    height: N,
}

impl<N: Num + PartialOrd + Copy + NumCast> Size<N> {
    /// Creates a new size.
    pub fn new(width: N, height: N) -> Self {
        Self { width, height }
    }

    /// Width.
    pub fn width(&self) -> N {
        self.width
    }

    /// Height.
    pub fn height(&self) -> N {
        self.height
    }

    /// Returns true if either side is zero.
    pub fn is_zero(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }

    /// Returns true if the object is taller than it is wide.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Converts the size to a different numeric type. Returns `None` if either side does not fit.
    pub fn cast<T: Num + PartialOrd + Copy + NumCast>(&self) -> Option<Size<T>> {
        Some(Size {
            width: NumCast::from(self.width)?,
            height: NumCast::from(self.height)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_rounds_toward_zero() {
        let size = Size::new(1240.6, 1753.2);
        assert_eq!(size.cast::<u32>(), Some(Size::new(1240, 1753)));
        assert!(size.is_portrait());
        assert_eq!(Size::new(-1.0, 2.0).cast::<u32>(), None);
    }
}
