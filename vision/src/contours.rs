use opencv::{
    core::{Mat, Point, Vector},
    imgproc::{
        arc_length, canny_def, contour_area, convex_hull_def, find_contours_def, fit_ellipse,
        CHAIN_APPROX_SIMPLE, RETR_EXTERNAL,
    },
};
use pupil::{Contour, FittedEllipse};

use crate::utils::rotated_rect_to_ellipse;

/// Contour traced by OpenCV.
#[derive(Debug, Clone)]
pub struct CvContour(pub Vector<Point>);

impl CvContour {
    pub fn points(&self) -> &Vector<Point> {
        &self.0
    }
}

impl Contour for CvContour {
    fn convex_hull(&self) -> anyhow::Result<Self> {
        let mut hull: Vector<Point> = Vector::new();
        convex_hull_def(&self.0, &mut hull)?;

        Ok(CvContour(hull))
    }

    fn area(&self) -> anyhow::Result<f64> {
        Ok(contour_area(&self.0, false)?)
    }

    fn perimeter(&self) -> anyhow::Result<f64> {
        Ok(arc_length(&self.0, true)?)
    }

    fn fit_ellipse(&self) -> anyhow::Result<FittedEllipse> {
        let rect = fit_ellipse(&self.0)?;

        Ok(rotated_rect_to_ellipse(&rect))
    }
}

/// Canny with thresholds `(t, 2t)`, then the outer contours of the edge map.
pub fn extract_contours(img: &Mat, edge_threshold: i32) -> anyhow::Result<Vec<CvContour>> {
    let threshold = edge_threshold as f64;
    let mut edges = Mat::default();
    canny_def(img, &mut edges, threshold, threshold * 2.0)?;

    let mut contours: Vector<Vector<Point>> = Vector::new();
    find_contours_def(&edges, &mut contours, RETR_EXTERNAL, CHAIN_APPROX_SIMPLE)?;

    Ok(contours.iter().map(CvContour).collect())
}
