pub trait Curve {
    /// Value of the curve at `x`, or `f64::NAN` where the curve is undefined.
    fn value(&self, x: f64) -> f64;
}
