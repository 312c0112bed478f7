use nalgebra::{Point2, Vector2};

use crate::geometry::{Contour, FittedEllipse};

/// Contour with preset measurements, used where the vision backend would be.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticContour {
    pub hull_area: f64,
    pub hull_perimeter: f64,
    pub contour_perimeter: f64,
    pub ellipse_axes: (f64, f64),
    pub is_hull: bool,
}

impl SyntheticContour {
    pub fn new(hull_area: f64, hull_perimeter: f64) -> Self {
        let diameter = 2.0 * (hull_area / std::f64::consts::PI).sqrt();
        Self {
            hull_area,
            hull_perimeter,
            contour_perimeter: hull_perimeter,
            ellipse_axes: (diameter, diameter),
            is_hull: false,
        }
    }

    /// Circle of radius `r`: hull area equals the fitted ellipse area.
    pub fn circle(r: f64) -> Self {
        let pi = std::f64::consts::PI;
        Self::new(pi * r * r, 2.0 * pi * r).with_ellipse(2.0 * r, 2.0 * r)
    }

    pub fn with_ellipse(mut self, major: f64, minor: f64) -> Self {
        self.ellipse_axes = (major, minor);
        self
    }
}

impl Contour for SyntheticContour {
    fn convex_hull(&self) -> anyhow::Result<Self> {
        Ok(Self { is_hull: true, ..self.clone() })
    }

    fn area(&self) -> anyhow::Result<f64> {
        Ok(self.hull_area)
    }

    fn perimeter(&self) -> anyhow::Result<f64> {
        if self.is_hull {
            Ok(self.hull_perimeter)
        } else {
            Ok(self.contour_perimeter)
        }
    }

    fn fit_ellipse(&self) -> anyhow::Result<FittedEllipse> {
        let (major, minor) = self.ellipse_axes;
        Ok(FittedEllipse::new(Point2::new(0.0, 0.0), Vector2::new(major, minor), 0.0))
    }
}
