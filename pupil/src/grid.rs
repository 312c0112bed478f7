use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// One cell of the threshold sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterPoint {
    pub blur_kernel_size: i32,
    pub edge_threshold: i32,
}

impl ParameterPoint {
    pub fn new(blur_kernel_size: i32, edge_threshold: i32) -> Self {
        Self { blur_kernel_size, edge_threshold }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterGrid {
    blur_kernel_sizes: Vec<i32>,
    edge_thresholds: Vec<i32>,
}

impl ParameterGrid {
    pub fn new(blur_kernel_sizes: Vec<i32>, edge_thresholds: Vec<i32>) -> Self {
        Self {
            blur_kernel_sizes,
            edge_thresholds,
        }
    }

    pub fn blur_kernel_sizes(&self) -> &[i32] {
        &self.blur_kernel_sizes
    }

    pub fn edge_thresholds(&self) -> &[i32] {
        &self.edge_thresholds
    }

    pub fn len(&self) -> usize {
        self.blur_kernel_sizes.len() * self.edge_thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cells, edge thresholds varying slowest. Every cell can be
    /// evaluated on its own.
    pub fn points(&self) -> impl Iterator<Item = ParameterPoint> + '_ {
        self.edge_thresholds
            .iter()
            .cartesian_product(self.blur_kernel_sizes.iter())
            .map(|(&edge_threshold, &blur_kernel_size)| ParameterPoint {
                blur_kernel_size,
                edge_threshold,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_cover_the_product_with_edge_threshold_outermost() {
        let grid = ParameterGrid::new(vec![7, 9], vec![10, 20]);
        let points: Vec<_> = grid.points().collect();

        assert_eq!(grid.len(), 4);
        assert_eq!(
            points,
            vec![
                ParameterPoint::new(7, 10),
                ParameterPoint::new(9, 10),
                ParameterPoint::new(7, 20),
                ParameterPoint::new(9, 20),
            ]
        );
    }

    #[test]
    fn empty_axis_gives_no_points() {
        let grid = ParameterGrid::new(vec![7, 9], vec![]);
        assert!(grid.is_empty());
        assert_eq!(grid.points().count(), 0);
    }
}
