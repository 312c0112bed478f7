use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Serialize;

use crate::{
    grid::{ParameterGrid, ParameterPoint},
    metrics::{FrameScore, LossSummary},
    table::ResultTable,
};

/// Runs the detection chain for one image at one parameter point.
pub trait FrameScorer {
    fn score(&mut self, image: &Path, point: ParameterPoint) -> anyhow::Result<FrameScore>;
}

/// One accepted contour of one image at one parameter point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub image_name: String,
    pub edge_threshold: i32,
    pub blur_kernel_size: i32,
    pub area_convex_hull: f64,
    pub area_ellipse: f64,
    pub circularity_hull: f64,
    pub perimeter_contour: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellResult {
    pub point: ParameterPoint,
    pub losses: Vec<f64>,
    pub summary: LossSummary,
    pub measurements: Vec<Measurement>,
}

/// Scores every image at `point`. The first image that fails aborts the cell.
pub fn evaluate_cell<S: FrameScorer + ?Sized>(
    point: ParameterPoint,
    images: &[PathBuf],
    scorer: &mut S,
) -> anyhow::Result<CellResult> {
    let mut losses = Vec::with_capacity(images.len());
    let mut measurements = Vec::new();

    for image in images {
        let score = scorer.score(image, point).with_context(|| {
            format!(
                "Failed to score {} (blur {}, edge {})",
                image.display(),
                point.blur_kernel_size,
                point.edge_threshold
            )
        })?;

        let image_name = image.display().to_string();
        measurements.extend(score.fits.iter().map(|fit| Measurement {
            image_name: image_name.clone(),
            edge_threshold: point.edge_threshold,
            blur_kernel_size: point.blur_kernel_size,
            area_convex_hull: fit.hull_area,
            area_ellipse: fit.ellipse.area(),
            circularity_hull: fit.circularity,
            perimeter_contour: fit.contour_perimeter,
        }));
        losses.push(score.loss);
    }

    if losses.is_empty() {
        log::warn!(
            "No images scored for blur {}, edge {}",
            point.blur_kernel_size,
            point.edge_threshold
        );
    }

    Ok(CellResult {
        point,
        summary: LossSummary::from_losses(&losses),
        losses,
        measurements,
    })
}

/// Evaluates the whole grid, one cell after another.
pub fn run_sweep<S: FrameScorer + ?Sized>(
    grid: &ParameterGrid,
    images: &[PathBuf],
    scorer: &mut S,
) -> anyhow::Result<SweepReport> {
    let mut report = SweepReport::new(grid);
    let row_len = grid.blur_kernel_sizes().len();
    let rounds = grid.edge_thresholds().len();

    for (i, point) in grid.points().enumerate() {
        if i % row_len == 0 {
            log::info!("loop {} of {} (edge threshold {})", i / row_len + 1, rounds, point.edge_threshold);
        }
        let cell = evaluate_cell(point, images, scorer)?;
        log::debug!(
            "blur {}, edge {}: mean loss {:.3}, std {:.3}",
            point.blur_kernel_size,
            point.edge_threshold,
            cell.summary.mean,
            cell.summary.std
        );
        report.record(cell)?;
    }

    Ok(report)
}

/// Paths of the files written by [`SweepReport::write_csv_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub measurements: PathBuf,
    pub loss_mean: PathBuf,
    pub loss_sigma: PathBuf,
}

/// Accumulated sweep results, kept in memory until the sweep is done.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub mean: ResultTable,
    pub std: ResultTable,
    pub measurements: Vec<Measurement>,
    pub summaries: Vec<(ParameterPoint, LossSummary)>,
}

impl SweepReport {
    pub fn new(grid: &ParameterGrid) -> Self {
        Self {
            mean: ResultTable::for_grid(grid),
            std: ResultTable::for_grid(grid),
            measurements: Vec::new(),
            summaries: Vec::with_capacity(grid.len()),
        }
    }

    pub fn record(&mut self, cell: CellResult) -> anyhow::Result<()> {
        self.mean.set(cell.point, cell.summary.mean)?;
        self.std.set(cell.point, cell.summary.std)?;
        self.measurements.extend(cell.measurements);
        self.summaries.push((cell.point, cell.summary));

        Ok(())
    }

    /// Point with the lowest mean loss, the earliest one on ties.
    pub fn best(&self) -> Option<(ParameterPoint, LossSummary)> {
        self.summaries
            .iter()
            .filter(|(_, s)| !s.mean.is_nan())
            .fold(None, |best: Option<&(ParameterPoint, LossSummary)>, cell| match best {
                Some(b) if b.1.mean <= cell.1.mean => Some(b),
                _ => Some(cell),
            })
            .copied()
    }

    /// Writes `<stem>_test_<ts>.csv`, `<stem>_loss_mean_<ts>.csv` and
    /// `<stem>_loss_sigma_<ts>.csv` into `dir`.
    pub fn write_csv_files(&self, dir: &Path, stem: &str, timestamp: &str) -> anyhow::Result<ReportFiles> {
        let files = ReportFiles {
            measurements: dir.join(format!("{stem}_test_{timestamp}.csv")),
            loss_mean: dir.join(format!("{stem}_loss_mean_{timestamp}.csv")),
            loss_sigma: dir.join(format!("{stem}_loss_sigma_{timestamp}.csv")),
        };

        let mut writer = csv::Writer::from_writer(create(&files.measurements)?);
        if self.measurements.is_empty() {
            writer.write_record([
                "image_name",
                "edge_threshold",
                "blur_kernel_size",
                "area_convex_hull",
                "area_ellipse",
                "circularity_hull",
                "perimeter_contour",
            ])?;
        }
        for m in &self.measurements {
            writer.serialize(m)?;
        }
        writer.flush()?;

        self.mean.write_csv(create(&files.loss_mean)?)?;
        self.std.write_csv(create(&files.loss_sigma)?)?;

        Ok(files)
    }
}

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
