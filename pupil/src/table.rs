use std::{io, iter};

use anyhow::bail;

use crate::grid::{ParameterGrid, ParameterPoint};

/// Values indexed by blur kernel size (rows) and edge threshold (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    blur_kernel_sizes: Vec<i32>,
    edge_thresholds: Vec<i32>,
    cells: Vec<Option<f64>>,
}

impl ResultTable {
    pub fn for_grid(grid: &ParameterGrid) -> Self {
        Self {
            blur_kernel_sizes: grid.blur_kernel_sizes().to_vec(),
            edge_thresholds: grid.edge_thresholds().to_vec(),
            cells: vec![None; grid.len()],
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.blur_kernel_sizes.len(), self.edge_thresholds.len())
    }

    fn index(&self, point: ParameterPoint) -> Option<usize> {
        let row = self.blur_kernel_sizes.iter().position(|&k| k == point.blur_kernel_size)?;
        let col = self.edge_thresholds.iter().position(|&t| t == point.edge_threshold)?;
        Some(row * self.edge_thresholds.len() + col)
    }

    pub fn set(&mut self, point: ParameterPoint, value: f64) -> anyhow::Result<()> {
        let Some(index) = self.index(point) else {
            bail!(
                "Point (blur {}, edge {}) is not part of the table",
                point.blur_kernel_size,
                point.edge_threshold
            );
        };
        self.cells[index] = Some(value);

        Ok(())
    }

    pub fn get(&self, point: ParameterPoint) -> Option<f64> {
        self.index(point).and_then(|i| self.cells[i])
    }

    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Header row holds the edge thresholds after an empty corner cell,
    /// each following row starts with its blur kernel size. Unset and NaN cells are empty.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> anyhow::Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(iter::once(String::new()).chain(self.edge_thresholds.iter().map(|t| t.to_string())))?;

        for (row, blur) in self.cells.chunks(self.edge_thresholds.len().max(1)).zip(&self.blur_kernel_sizes) {
            let values = row.iter().map(|c| c.filter(|v| !v.is_nan()).map(|v| v.to_string()).unwrap_or_default());
            out.write_record(iter::once(blur.to_string()).chain(values))?;
        }
        out.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> ParameterGrid {
        ParameterGrid::new(vec![7, 9], vec![10, 20, 30])
    }

    #[test]
    fn cells_are_addressed_by_point() {
        let mut table = ResultTable::for_grid(&grid());
        table.set(ParameterPoint::new(9, 20), 1.5).unwrap();

        assert_eq!(table.shape(), (2, 3));
        assert_eq!(table.get(ParameterPoint::new(9, 20)), Some(1.5));
        assert_eq!(table.get(ParameterPoint::new(7, 20)), None);
        assert_eq!(table.filled(), 1);
    }

    #[test]
    fn unknown_points_are_rejected() {
        let mut table = ResultTable::for_grid(&grid());
        assert!(table.set(ParameterPoint::new(11, 20), 1.0).is_err());
        assert_eq!(table.get(ParameterPoint::new(11, 20)), None);
    }

    #[test]
    fn csv_layout_matches_grid() {
        let mut table = ResultTable::for_grid(&grid());
        table.set(ParameterPoint::new(7, 10), 1007.0).unwrap();
        table.set(ParameterPoint::new(7, 30), 12.5).unwrap();
        table.set(ParameterPoint::new(9, 20), 3.25).unwrap();

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, ",10,20,30\n7,1007,,12.5\n9,,3.25,\n");
    }

    #[test]
    fn nan_cells_are_written_empty() {
        let grid = ParameterGrid::new(vec![7], vec![10, 20]);
        let mut table = ResultTable::for_grid(&grid);
        table.set(ParameterPoint::new(7, 10), f64::NAN).unwrap();
        table.set(ParameterPoint::new(7, 20), 4.0).unwrap();

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), ",10,20\n7,,4\n");
    }
}
