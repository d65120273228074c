use crate::math::curve::curve::Curve;

/// One sample `(x, y)` of a curve.
///
/// Containers hand out copies, so mutating a returned point never reaches
/// the container it came from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    x: f64,
    y: f64
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn with_x(&self, x: f64) -> Point2D {
        Point2D { x, y: self.y }
    }

    pub fn with_y(&self, y: f64) -> Point2D {
        Point2D { x: self.x, y }
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Point2D {
        Point2D::new(x, y)
    }
}

/// A curve defined by a finite set of samples ordered by x.
pub trait NonparametricCurve: Curve {
    /// Copies of all samples in ascending x order.
    fn points(&self) -> Vec<Point2D>;

    fn left_border(&self) -> f64;

    fn right_border(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_coordinates_leaves_original_untouched() {
        let pt = Point2D::new(1.0, 2.0);
        let moved = pt.with_x(3.0).with_y(-1.0);
        assert_eq!(pt, Point2D::new(1.0, 2.0));
        assert_eq!(moved, Point2D::new(3.0, -1.0));
        assert_eq!(Point2D::from((3.0, -1.0)), moved);
    }
}
