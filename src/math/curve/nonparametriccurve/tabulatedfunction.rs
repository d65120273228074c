use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    Point2D
};
use crate::math::curve::nonparametriccurve::tabulatedfunctionerror::{
    OrderViolation,
    TabulatedFunctionError
};

/// Tolerance for "x hits a sample" and "x reached a border": the gap between
/// 1.0 and the next representable `f64`.
pub const EPSILON: f64 = f64::EPSILON;

/// A function sampled at a finite set of points with strictly increasing x,
/// evaluated by linear interpolation between neighbouring samples.
///
/// Every implementation keeps at least 2 points at all times. Fallible
/// operations validate fully before writing anything, so an `Err` always
/// leaves the function exactly as it was.
pub trait TabulatedFunction: NonparametricCurve {
    fn count(&self) -> usize;

    fn point(&self, index: usize) -> Result<Point2D, TabulatedFunctionError>;

    /// Replaces the point at `index`. The new x must lie strictly between the
    /// x of its neighbours.
    fn set_point(&mut self, index: usize, point: Point2D) -> Result<(), TabulatedFunctionError>;

    fn point_x(&self, index: usize) -> Result<f64, TabulatedFunctionError>;

    fn set_point_x(&mut self, index: usize, x: f64) -> Result<(), TabulatedFunctionError>;

    fn point_y(&self, index: usize) -> Result<f64, TabulatedFunctionError>;

    fn set_point_y(&mut self, index: usize, y: f64) -> Result<(), TabulatedFunctionError>;

    /// Inserts `point` at the position that keeps x ascending and returns that
    /// position. Rejects an x within [`EPSILON`] of an existing one.
    fn add_point(&mut self, point: Point2D) -> Result<usize, TabulatedFunctionError>;

    /// Fails with [`TabulatedFunctionError::IllegalState`] when only 2 points remain.
    fn delete_point(&mut self, index: usize) -> Result<Point2D, TabulatedFunctionError>;
}

// ─────────────────────────────────────────────
// Helpers shared by both storages
// ─────────────────────────────────────────────

pub(crate) fn uniform_grid<F>(left_x: f64,
                              right_x: f64,
                              count: usize,
                              y_at: F) -> Result<impl Iterator<Item = Point2D>, TabulatedFunctionError>
    where F: Fn(usize) -> f64 {
    if !left_x.is_finite() || !right_x.is_finite() || left_x >= right_x {
        return Err(TabulatedFunctionError::invalid_borders(left_x, right_x));
    }
    if count < 2 {
        return Err(TabulatedFunctionError::too_few_points(count));
    }
    let step = (right_x - left_x) / (count - 1) as f64;
    if !step.is_finite() {
        return Err(TabulatedFunctionError::InvalidArgument(
            format!("span from {left_x} to {right_x} is not representable")));
    }
    let x_at = move |i: usize| left_x + i as f64 * step;
    if (1..count).any(|i| x_at(i) <= x_at(i - 1)) {
        return Err(TabulatedFunctionError::InvalidArgument(
            format!("{count} points do not fit between {left_x} and {right_x}")));
    }
    Ok((0..count).map(move |i| Point2D::new(x_at(i), y_at(i))))
}

pub(crate) fn check_index(index: usize, count: usize) -> Result<(), TabulatedFunctionError> {
    if index >= count {
        return Err(TabulatedFunctionError::index_out_of_range(index, count));
    }
    Ok(())
}

pub(crate) fn check_deletable(count: usize) -> Result<(), TabulatedFunctionError> {
    if count <= 2 {
        return Err(TabulatedFunctionError::IllegalState { count });
    }
    Ok(())
}

fn check_finite_x(x: f64) -> Result<(), TabulatedFunctionError> {
    if !x.is_finite() {
        return Err(TabulatedFunctionError::InvalidArgument(format!("x = {x} is not finite")));
    }
    Ok(())
}

/// Strict check of `x` against the neighbours of the slot it is written to.
/// Exact equality with a neighbour is rejected; no tolerance is applied.
pub(crate) fn check_between(x: f64,
                            left: Option<f64>,
                            right: Option<f64>) -> Result<(), TabulatedFunctionError> {
    check_finite_x(x)?;
    if let Some(neighbor_x) = left.filter(|&left_x| x <= left_x) {
        return Err(TabulatedFunctionError::invalid_order(x, OrderViolation::LeftNeighbor { neighbor_x }));
    }
    if let Some(neighbor_x) = right.filter(|&right_x| x >= right_x) {
        return Err(TabulatedFunctionError::invalid_order(x, OrderViolation::RightNeighbor { neighbor_x }));
    }
    Ok(())
}

pub(crate) fn check_unique<I>(points: I, x: f64) -> Result<(), TabulatedFunctionError>
    where I: IntoIterator<Item = Point2D> {
    check_finite_x(x)?;
    match points.into_iter().find(|pt| (pt.x() - x).abs() < EPSILON) {
        Some(existing) => Err(TabulatedFunctionError::invalid_order(
            x, OrderViolation::DuplicateX { existing_x: existing.x() })),
        None => Ok(())
    }
}

pub(crate) fn linear_interpolation(lhs_pt: &Point2D, rhs_pt: &Point2D, x: f64) -> f64 {
    lhs_pt.y() + (rhs_pt.y() - lhs_pt.y()) * (x - lhs_pt.x()) / (rhs_pt.x() - lhs_pt.x())
}

/// Evaluates a sampled function given its points in ascending x order.
///
/// Outside `[left − ε, right + ε]` the result is NaN. Inside, each adjacent
/// pair is tried from the left: a hit on the pair's left point returns its y,
/// otherwise an x bracketed by the pair (with ε slack) is interpolated. The
/// last point is matched separately since it is never a pair's left point.
pub(crate) fn evaluate<I>(points: I, left_x: f64, right_x: f64, x: f64) -> f64
    where I: IntoIterator<Item = Point2D> {
    if x < left_x - EPSILON || x > right_x + EPSILON {
        return f64::NAN;
    }

    let mut iter = points.into_iter();
    let Some(mut lhs_pt) = iter.next() else {
        return f64::NAN;
    };
    for rhs_pt in iter {
        if (x - lhs_pt.x()).abs() < EPSILON {
            return lhs_pt.y();
        }
        if x > lhs_pt.x() - EPSILON && x < rhs_pt.x() + EPSILON {
            return linear_interpolation(&lhs_pt, &rhs_pt, x);
        }
        lhs_pt = rhs_pt;
    }

    if (x - lhs_pt.x()).abs() < EPSILON {
        lhs_pt.y()
    } else {
        f64::NAN
    }
}
