mod capture;
mod contours;
mod draw;
mod preprocess;
mod scorer;
mod utils;

use std::time::{Duration, Instant};

use opencv::core::Mat;
use pupil::{AcceptedContour, Roi, ShapeFilter};

pub use capture::{open_capture, read_frame, PI_CAMERA_PIPELINE};
pub use contours::{extract_contours, CvContour};
pub use draw::{black_canvas, draw_pupils, draw_segments, to_bgr};
pub use preprocess::{crop, preprocess_image, to_gray};
pub use scorer::{read_image, ImageScorer};

/// Fixed parameters of the live detection chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineParams {
    pub edge_threshold: i32,
    pub blur_kernel_size: i32,
    pub morph_kernel_size: i32,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            edge_threshold: 25,
            blur_kernel_size: 9,
            morph_kernel_size: 1,
        }
    }
}

/// Time spent in each stage of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    pub preprocess: Duration,
    pub contours: Duration,
    pub filter: Duration,
}

pub struct Detection {
    /// Preprocessed frame the contours were traced on.
    pub frame: Mat,
    pub raw_contours: usize,
    pub pupils: Vec<AcceptedContour<CvContour>>,
    pub timings: StageTimings,
}

pub struct PupilDetector {
    params: PipelineParams,
    roi: Option<Roi>,
    filter: ShapeFilter,
}

impl PupilDetector {
    pub fn new(params: PipelineParams, roi: Option<Roi>, filter: ShapeFilter) -> Self {
        Self { params, roi, filter }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn process_frame(&self, img: &Mat) -> anyhow::Result<Detection> {
        let started = Instant::now();
        let frame = preprocess_image(
            img,
            self.roi.as_ref(),
            self.params.blur_kernel_size,
            self.params.morph_kernel_size,
        )?;
        let preprocess = started.elapsed();

        let started = Instant::now();
        let contours = extract_contours(&frame, self.params.edge_threshold)?;
        let raw_contours = contours.len();
        let contours_time = started.elapsed();

        let started = Instant::now();
        let pupils = self.filter.apply(contours)?;
        let filter = started.elapsed();

        Ok(Detection {
            frame,
            raw_contours,
            pupils,
            timings: StageTimings {
                preprocess,
                contours: contours_time,
                filter,
            },
        })
    }
}
