use std::path::Path;

use anyhow::{bail, Context};
use opencv::{
    core::{Mat, MatTraitConst},
    imgcodecs::{imread, IMREAD_COLOR},
};
use pupil::{score_frame, FrameScore, FrameScorer, ParameterPoint, Roi, ShapeFilter, SweepConfig};

use crate::{contours::extract_contours, preprocess::preprocess_image};

/// Reads an image from disk and scores it at one parameter point.
#[derive(Debug, Clone)]
pub struct ImageScorer {
    roi: Option<Roi>,
    morph_kernel_size: i32,
    filter: ShapeFilter,
}

impl ImageScorer {
    pub fn new(roi: Option<Roi>, morph_kernel_size: i32, filter: ShapeFilter) -> Self {
        Self {
            roi,
            morph_kernel_size,
            filter,
        }
    }

    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(config.roi, config.morph_kernel_size, config.shape_filter())
    }

    pub fn score_image(&self, img: &Mat, point: ParameterPoint) -> anyhow::Result<FrameScore> {
        let preprocessed = preprocess_image(img, self.roi.as_ref(), point.blur_kernel_size, self.morph_kernel_size)?;
        let contours = extract_contours(&preprocessed, point.edge_threshold)?;

        score_frame(contours, &self.filter)
    }
}

impl FrameScorer for ImageScorer {
    fn score(&mut self, image: &Path, point: ParameterPoint) -> anyhow::Result<FrameScore> {
        let img = read_image(image)?;
        self.score_image(&img, point)
    }
}

pub fn read_image(path: &Path) -> anyhow::Result<Mat> {
    let name = path.to_str().with_context(|| format!("Path {} is not valid UTF-8", path.display()))?;
    let img = imread(name, IMREAD_COLOR)?;
    if img.empty() {
        bail!("Failed to read image {}", path.display());
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use opencv::{
        core::{Point, Scalar, Vector, CV_8UC3},
        imgcodecs::imwrite,
        imgproc::{circle, FILLED, LINE_8},
    };
    use pupil::{metrics::frame_loss, run_sweep, ParameterGrid};

    use super::*;

    fn eye_image() -> Mat {
        let mut img = Mat::new_rows_cols_with_default(480, 480, CV_8UC3, Scalar::all(200.0)).unwrap();
        circle(&mut img, Point::new(240, 240), 45, Scalar::all(20.0), FILLED, LINE_8, 0).unwrap();
        img
    }

    #[test]
    fn dark_disc_is_detected_as_pupil() {
        let scorer = ImageScorer::new(None, 1, ShapeFilter::default());
        let score = scorer.score_image(&eye_image(), ParameterPoint::new(9, 25)).unwrap();

        assert_eq!(score.fits.len(), 1);
        assert!(score.fits[0].hull_area > 600.0);
        assert!(score.fits[0].circularity > 0.8);
        assert!((score.fits[0].ellipse.center.x - 240.0).abs() < 2.0);
        assert_eq!(score.loss, frame_loss(score.raw_contours, score.penalty));
    }

    #[test]
    fn blank_image_is_a_missed_detection() {
        let img = Mat::new_rows_cols_with_default(480, 480, CV_8UC3, Scalar::all(128.0)).unwrap();
        let scorer = ImageScorer::new(None, 1, ShapeFilter::default());
        let score = scorer.score_image(&img, ParameterPoint::new(7, 10)).unwrap();

        assert_eq!(score.raw_contours, 0);
        assert_eq!(score.loss, 1000.0);
    }

    #[test]
    fn missing_file_fails() {
        assert!(read_image(Path::new("/nonexistent/eye.png")).is_err());
    }

    #[test]
    fn sweep_over_written_images() {
        let dir = std::env::temp_dir().join(format!("vision-scorer-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let images: Vec<PathBuf> = (0..3).map(|i| dir.join(format!("frame{i}.png"))).collect();
        for path in &images {
            imwrite(path.to_str().unwrap(), &eye_image(), &Vector::new()).unwrap();
        }

        let mut scorer = ImageScorer::new(None, 1, ShapeFilter::default());
        let grid = ParameterGrid::new(vec![7, 9], vec![10, 20]);
        let report = run_sweep(&grid, &images, &mut scorer).unwrap();

        assert_eq!(report.mean.filled(), 4);
        assert!(report.summaries.iter().all(|(_, s)| s.count == 3 && s.std < 1e-9));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
