use thiserror::Error;

/// Which neighbour a rejected x collided with.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OrderViolation {
    #[error("not greater than left neighbour x = {neighbor_x}")]
    LeftNeighbor { neighbor_x: f64 },
    #[error("not less than right neighbour x = {neighbor_x}")]
    RightNeighbor { neighbor_x: f64 },
    #[error("duplicates existing x = {existing_x}")]
    DuplicateX { existing_x: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TabulatedFunctionError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index {index} out of range for {count} points")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("x = {x} breaks point order: {violation}")]
    InvalidOrder { x: f64, violation: OrderViolation },

    #[error("cannot delete from a function of {count} points, at least 2 must remain")]
    IllegalState { count: usize },
}

impl TabulatedFunctionError {
    pub fn invalid_borders(left_x: f64, right_x: f64) -> TabulatedFunctionError {
        TabulatedFunctionError::InvalidArgument(
            format!("left border {left_x} must be less than right border {right_x}"))
    }

    pub fn too_few_points(count: usize) -> TabulatedFunctionError {
        TabulatedFunctionError::InvalidArgument(
            format!("at least 2 points required, got {count}"))
    }

    pub fn index_out_of_range(index: usize, count: usize) -> TabulatedFunctionError {
        TabulatedFunctionError::IndexOutOfRange { index, count }
    }

    pub fn invalid_order(x: f64, violation: OrderViolation) -> TabulatedFunctionError {
        TabulatedFunctionError::InvalidOrder { x, violation }
    }
}
