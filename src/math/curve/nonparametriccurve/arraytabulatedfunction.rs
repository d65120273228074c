use tracing::{
    debug,
    trace
};

use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::accesscache::AccessCache;
use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    Point2D
};
use crate::math::curve::nonparametriccurve::tabulatedfunction::{
    check_between,
    check_deletable,
    check_index,
    check_unique,
    evaluate,
    uniform_grid,
    TabulatedFunction
};
use crate::math::curve::nonparametriccurve::tabulatedfunctionerror::TabulatedFunctionError;

// ─────────────────────────────────────────────
// ArrayTabulatedFunction
// ─────────────────────────────────────────────
//
// Points live in a contiguous buffer. Capacity only grows on demand, one
// slot per insert that finds the buffer full; deletes keep the capacity.
//
// The cache holds a snapshot of the last point read or written together with
// its index. Every write at an index refreshes the snapshot, and a delete
// drops it because all later indices move.

#[derive(Debug, Clone)]
pub struct ArrayTabulatedFunction {
    points: Vec<Point2D>,
    cache: AccessCache<Point2D>,
}

impl ArrayTabulatedFunction {
    /// `point_count` points evenly spread over `[left_x, right_x]`, all with y = 0.
    pub fn new(left_x: f64, right_x: f64, point_count: usize) -> Result<ArrayTabulatedFunction, TabulatedFunctionError> {
        let grid = uniform_grid(left_x, right_x, point_count, |_| 0.0)?;
        Ok(Self::from_grid(grid))
    }

    /// One point per entry of `values`, evenly spread over `[left_x, right_x]`.
    pub fn from_values(left_x: f64, right_x: f64, values: &[f64]) -> Result<ArrayTabulatedFunction, TabulatedFunctionError> {
        let grid = uniform_grid(left_x, right_x, values.len(), |i| values[i])?;
        Ok(Self::from_grid(grid))
    }

    fn from_grid(grid: impl Iterator<Item = Point2D>) -> ArrayTabulatedFunction {
        let points: Vec<Point2D> = grid.collect();
        debug!(count = points.len(), "array tabulated function created");
        ArrayTabulatedFunction { points, cache: AccessCache::new() }
    }

    /// Copies of the points in ascending x order. Does not touch the cache.
    pub fn iter(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.points.iter().copied()
    }

    /// Number of points the buffer can hold before the next insert grows it.
    pub fn capacity(&self) -> usize {
        self.points.capacity()
    }

    fn cached_point(&self, index: usize) -> Result<Point2D, TabulatedFunctionError> {
        check_index(index, self.points.len())?;
        if let Some(point) = self.cache.lookup(index) {
            trace!(index, "array cache hit");
            return Ok(point);
        }
        let point = self.points[index];
        self.cache.refresh(index, point);
        Ok(point)
    }

    fn neighbors_x(&self, index: usize) -> (Option<f64>, Option<f64>) {
        let left = index.checked_sub(1).map(|i| self.points[i].x());
        let right = self.points.get(index + 1).map(|pt| pt.x());
        (left, right)
    }

    fn store(&mut self, index: usize, point: Point2D) {
        self.points[index] = point;
        self.cache.refresh(index, point);
        debug_assert!(self.is_strictly_ordered());
    }

    fn is_strictly_ordered(&self) -> bool {
        self.points.windows(2).all(|pair| pair[0].x() < pair[1].x())
    }
}

impl Curve for ArrayTabulatedFunction {
    fn value(&self, x: f64) -> f64 {
        evaluate(self.iter(), self.left_border(), self.right_border(), x)
    }
}

impl NonparametricCurve for ArrayTabulatedFunction {
    fn points(&self) -> Vec<Point2D> {
        self.points.clone()
    }

    fn left_border(&self) -> f64 {
        self.points[0].x()
    }

    fn right_border(&self) -> f64 {
        self.points[self.points.len() - 1].x()
    }
}

impl TabulatedFunction for ArrayTabulatedFunction {
    fn count(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> Result<Point2D, TabulatedFunctionError> {
        self.cached_point(index)
    }

    fn set_point(&mut self, index: usize, point: Point2D) -> Result<(), TabulatedFunctionError> {
        check_index(index, self.points.len())?;
        let (left, right) = self.neighbors_x(index);
        check_between(point.x(), left, right)?;
        self.store(index, point);
        Ok(())
    }

    fn point_x(&self, index: usize) -> Result<f64, TabulatedFunctionError> {
        self.cached_point(index).map(|pt| pt.x())
    }

    fn set_point_x(&mut self, index: usize, x: f64) -> Result<(), TabulatedFunctionError> {
        check_index(index, self.points.len())?;
        let (left, right) = self.neighbors_x(index);
        check_between(x, left, right)?;
        let point = self.points[index].with_x(x);
        self.store(index, point);
        Ok(())
    }

    fn point_y(&self, index: usize) -> Result<f64, TabulatedFunctionError> {
        self.cached_point(index).map(|pt| pt.y())
    }

    fn set_point_y(&mut self, index: usize, y: f64) -> Result<(), TabulatedFunctionError> {
        check_index(index, self.points.len())?;
        let point = self.points[index].with_y(y);
        self.store(index, point);
        Ok(())
    }

    fn add_point(&mut self, point: Point2D) -> Result<usize, TabulatedFunctionError> {
        check_unique(self.iter(), point.x())?;

        if self.points.len() == self.points.capacity() {
            self.points.reserve_exact(1);
        }
        let index = self.points.iter().take_while(|pt| pt.x() < point.x()).count();
        self.points.insert(index, point);
        self.cache.refresh(index, point);
        debug_assert!(self.is_strictly_ordered());

        debug!(index, x = point.x(), count = self.points.len(), "point added");
        Ok(index)
    }

    fn delete_point(&mut self, index: usize) -> Result<Point2D, TabulatedFunctionError> {
        check_index(index, self.points.len())?;
        check_deletable(self.points.len())?;

        let removed = self.points.remove(index);
        self.cache.invalidate();

        debug!(index, count = self.points.len(), "point deleted, cache invalidated");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::curve::nonparametriccurve::tabulatedfunctionerror::OrderViolation;

    fn squares() -> ArrayTabulatedFunction {
        ArrayTabulatedFunction::from_values(0.0, 4.0, &[0.0, 1.0, 4.0, 9.0, 16.0]).unwrap()
    }

    #[test]
    fn point_count_constructor_builds_flat_grid() {
        let func = ArrayTabulatedFunction::new(0.0, 1.0, 3).unwrap();
        assert_eq!(func.points(), vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(0.5, 0.0),
            Point2D::new(1.0, 0.0),
        ]);
    }

    #[test]
    fn constructors_validate_arguments() {
        assert!(matches!(ArrayTabulatedFunction::from_values(5.0, 2.0, &[1.0, 4.0, 9.0]),
                         Err(TabulatedFunctionError::InvalidArgument(_))));
        assert!(matches!(ArrayTabulatedFunction::from_values(0.0, 2.0, &[1.0]),
                         Err(TabulatedFunctionError::InvalidArgument(_))));
        assert!(matches!(ArrayTabulatedFunction::new(0.0, 2.0, 0),
                         Err(TabulatedFunctionError::InvalidArgument(_))));
    }

    #[test]
    fn reads_refresh_the_cache() {
        let func = squares();
        assert!(func.cache.is_empty());
        assert_eq!(func.point_y(3).unwrap(), 9.0);
        assert_eq!(func.cache.entry(), Some((3, Point2D::new(3.0, 9.0))));
        assert_eq!(func.point_x(3).unwrap(), 3.0);
        assert_eq!(func.point(1).unwrap(), Point2D::new(1.0, 1.0));
        assert_eq!(func.cache.entry().map(|(index, _)| index), Some(1));
    }

    #[test]
    fn writes_keep_cached_snapshot_current() {
        let mut func = squares();
        assert_eq!(func.point_y(2).unwrap(), 4.0);
        func.set_point_y(2, -4.0).unwrap();
        assert_eq!(func.point_y(2).unwrap(), -4.0);
        func.set_point_x(2, 2.5).unwrap();
        assert_eq!(func.point(2).unwrap(), Point2D::new(2.5, -4.0));
        func.set_point(2, Point2D::new(1.5, 7.0)).unwrap();
        assert_eq!(func.point(2).unwrap(), Point2D::new(1.5, 7.0));
    }

    #[test]
    fn set_point_x_rejects_neighbor_collision() {
        let mut func = squares();
        let err = func.set_point_x(2, 3.0).unwrap_err();
        assert_eq!(err, TabulatedFunctionError::InvalidOrder {
            x: 3.0,
            violation: OrderViolation::RightNeighbor { neighbor_x: 3.0 },
        });
        assert_eq!(func.point_x(2).unwrap(), 2.0);
        assert!(func.set_point(0, Point2D::new(1.0, 0.0)).is_err());
        assert!(func.set_point(0, Point2D::new(-10.0, 0.0)).is_ok());
        assert!(func.set_point(4, Point2D::new(100.0, 0.0)).is_ok());
    }

    #[test]
    fn add_point_grows_by_one_slot() {
        let mut func = squares();
        assert_eq!(func.capacity(), func.count());
        let index = func.add_point(Point2D::new(2.5, 6.0)).unwrap();
        assert_eq!(index, 3);
        assert_eq!(func.count(), 6);
        assert_eq!(func.capacity(), 6);
        assert_eq!(func.cache.entry(), Some((3, Point2D::new(2.5, 6.0))));
        assert_relative_eq!(func.value(2.25), 5.0);
    }

    #[test]
    fn add_point_at_both_ends() {
        let mut func = squares();
        assert_eq!(func.add_point(Point2D::new(-1.0, 1.0)).unwrap(), 0);
        assert_eq!(func.add_point(Point2D::new(5.0, 25.0)).unwrap(), 6);
        assert_eq!(func.left_border(), -1.0);
        assert_eq!(func.right_border(), 5.0);
        assert_eq!(func.value(5.0), 25.0);
    }

    #[test]
    fn delete_point_invalidates_cache_and_keeps_capacity() {
        let mut func = squares();
        func.point(4).unwrap();
        let capacity = func.capacity();
        assert_eq!(func.delete_point(1).unwrap(), Point2D::new(1.0, 1.0));
        assert!(func.cache.is_empty());
        assert_eq!(func.capacity(), capacity);
        assert_eq!(func.point(3).unwrap(), Point2D::new(4.0, 16.0));
        assert_relative_eq!(func.value(1.0), 2.0);
    }

    #[test]
    fn delete_point_reports_index_before_state() {
        let mut func = ArrayTabulatedFunction::from_values(0.0, 1.0, &[0.0, 1.0]).unwrap();
        assert!(matches!(func.delete_point(2), Err(TabulatedFunctionError::IndexOutOfRange { .. })));
        assert_eq!(func.delete_point(0), Err(TabulatedFunctionError::IllegalState { count: 2 }));
        assert_eq!(func.points(), vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)]);
    }
}
