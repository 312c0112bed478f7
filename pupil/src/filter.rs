use crate::geometry::{circularity, Contour};

/// Hull area at or below which a contour is treated as noise.
pub const MIN_HULL_AREA: f64 = 600.0;
/// Hull circularity at or below which a contour is treated as elongated.
pub const MIN_HULL_CIRCULARITY: f64 = 0.8;

/// Contour that passed the shape filter, together with the hull it was judged on.
#[derive(Debug, Clone)]
pub struct AcceptedContour<C> {
    pub contour: C,
    pub hull: C,
    pub hull_area: f64,
    pub circularity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeFilter {
    pub min_area: f64,
    pub min_circularity: f64,
}

impl Default for ShapeFilter {
    fn default() -> Self {
        Self::new(MIN_HULL_AREA, MIN_HULL_CIRCULARITY)
    }
}

impl ShapeFilter {
    pub fn new(min_area: f64, min_circularity: f64) -> Self {
        Self { min_area, min_circularity }
    }

    /// Keeps the contours whose convex hull is both large and round enough.
    /// Input order is preserved. Hulls with a zero perimeter are skipped.
    pub fn apply<C: Contour>(
        &self,
        contours: impl IntoIterator<Item = C>,
    ) -> anyhow::Result<Vec<AcceptedContour<C>>> {
        let mut accepted = Vec::new();
        for (i, contour) in contours.into_iter().enumerate() {
            if let Some(a) = self.check(i, contour)? {
                accepted.push(a);
            }
        }

        Ok(accepted)
    }

    fn check<C: Contour>(&self, index: usize, contour: C) -> anyhow::Result<Option<AcceptedContour<C>>> {
        let hull = contour.convex_hull()?;
        let hull_area = hull.area()?;
        // Area first, circularity of tiny hulls is meaningless
        if !(hull_area > self.min_area) {
            return Ok(None);
        }

        let perimeter = hull.perimeter()?;
        let Some(circularity) = circularity(hull_area, perimeter) else {
            log::warn!("Division by zero for contour {index}, hull perimeter is {perimeter}");
            return Ok(None);
        };
        if !(circularity > self.min_circularity) {
            return Ok(None);
        }

        Ok(Some(AcceptedContour {
            contour,
            hull,
            hull_area,
            circularity,
        }))
    }
}
