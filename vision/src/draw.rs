use opencv::{
    core::{Mat, Point, Scalar, Vector, CV_8UC3},
    imgproc::{cvt_color_def, draw_contours_def, ellipse_rotated_rect, fit_ellipse, line, COLOR_GRAY2BGR, LINE_8},
    prelude::*,
};
use pupil::{markers::Segment, AcceptedContour};
use rand::Rng;

use crate::{contours::CvContour, utils::to_cv_point};

/// Outlines every accepted hull and the ellipse fitted to it, one random colour each.
pub fn draw_pupils<R: Rng>(canvas: &mut Mat, pupils: &[AcceptedContour<CvContour>], rng: &mut R) -> anyhow::Result<()> {
    let hulls: Vector<Vector<Point>> = pupils.iter().map(|p| p.hull.0.clone()).collect();
    for (i, pupil) in pupils.iter().enumerate() {
        let color = Scalar::new(
            rng.gen_range(0..256) as f64,
            rng.gen_range(0..256) as f64,
            rng.gen_range(0..256) as f64,
            0.0,
        );
        let ellipse = fit_ellipse(&pupil.hull.0)?;
        draw_contours_def(canvas, &hulls, i as i32, color)?;
        ellipse_rotated_rect(canvas, ellipse, color, 2, LINE_8)?;
    }

    Ok(())
}

pub fn draw_segments(canvas: &mut Mat, segments: &[Segment], color: Scalar, thickness: i32) -> anyhow::Result<()> {
    for (from, to) in segments {
        line(canvas, to_cv_point(from), to_cv_point(to), color, thickness, LINE_8, 0)?;
    }

    Ok(())
}

pub fn black_canvas(width: i32, height: i32) -> anyhow::Result<Mat> {
    Ok(Mat::zeros(height, width, CV_8UC3)?.to_mat()?)
}

/// Three channel copy of a grayscale frame, so overlays keep their colour.
pub fn to_bgr(img_gray: &Mat) -> anyhow::Result<Mat> {
    if img_gray.channels() == 3 {
        return Ok(img_gray.try_clone()?);
    }
    let mut bgr = Mat::default();
    cvt_color_def(img_gray, &mut bgr, COLOR_GRAY2BGR)?;

    Ok(bgr)
}
