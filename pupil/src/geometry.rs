use std::f64::consts::{FRAC_PI_4, PI};

use nalgebra::{Point2, Vector2};

/// Ellipse fitted to a point set. `axes` are full axis lengths, `angle` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedEllipse {
    pub center: Point2<f64>,
    pub axes: Vector2<f64>,
    pub angle: f64,
}

impl FittedEllipse {
    pub fn new(center: Point2<f64>, axes: Vector2<f64>, angle: f64) -> Self {
        Self { center, axes, angle }
    }

    pub fn area(&self) -> f64 {
        FRAC_PI_4 * self.axes.x * self.axes.y
    }
}

/// Closed boundary curve as produced by contour tracing.
///
/// The measurements are delegated to whatever vision backend owns the point
/// storage, the shape filter and the loss only consume the numbers.
pub trait Contour: Sized {
    fn convex_hull(&self) -> anyhow::Result<Self>;

    fn area(&self) -> anyhow::Result<f64>;

    /// Arc length of the curve, treated as closed.
    fn perimeter(&self) -> anyhow::Result<f64>;

    fn fit_ellipse(&self) -> anyhow::Result<FittedEllipse>;
}

/// 4π·area / perimeter². `None` when the perimeter is zero or not finite.
pub fn circularity(area: f64, perimeter: f64) -> Option<f64> {
    if perimeter == 0.0 || !perimeter.is_finite() {
        return None;
    }

    Some(4.0 * PI * area / (perimeter * perimeter))
}
