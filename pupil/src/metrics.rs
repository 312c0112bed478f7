use crate::{
    filter::{AcceptedContour, ShapeFilter},
    geometry::{Contour, FittedEllipse},
};

/// Added to the loss of a frame whose best-fit penalty is zero.
pub const NO_DETECTION_PENALTY: f64 = 1000.0;

/// Ellipse fit of one accepted contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourFit {
    pub hull_area: f64,
    pub circularity: f64,
    pub ellipse: FittedEllipse,
    pub contour_perimeter: f64,
}

impl ContourFit {
    /// Absolute difference between hull area and fitted ellipse area.
    pub fn penalty(&self) -> f64 {
        (self.hull_area - self.ellipse.area()).abs()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameScore {
    pub raw_contours: usize,
    pub fits: Vec<ContourFit>,
    pub penalty: f64,
    pub loss: f64,
}

pub fn fit_contours<C: Contour>(accepted: &[AcceptedContour<C>]) -> anyhow::Result<Vec<ContourFit>> {
    accepted
        .iter()
        .map(|a| {
            Ok(ContourFit {
                hull_area: a.hull_area,
                circularity: a.circularity,
                ellipse: a.contour.fit_ellipse()?,
                contour_perimeter: a.contour.perimeter()?,
            })
        })
        .collect()
}

/// Smallest fit penalty, the first one wins on ties. Zero when nothing was accepted.
pub fn best_fit_penalty(fits: &[ContourFit]) -> f64 {
    fits.iter()
        .map(ContourFit::penalty)
        .fold(None, |best: Option<f64>, p| match best {
            Some(b) if b <= p => Some(b),
            _ => Some(p),
        })
        .unwrap_or(0.0)
}

/// Contour count plus best-fit penalty.
///
/// A zero penalty is charged `NO_DETECTION_PENALTY`, whether it comes from an
/// empty detection or from a perfect fit.
pub fn frame_loss(raw_contours: usize, penalty: f64) -> f64 {
    let no_detection = if penalty == 0.0 { NO_DETECTION_PENALTY } else { 0.0 };
    raw_contours as f64 + penalty + no_detection
}

pub fn score_frame<C: Contour>(contours: Vec<C>, filter: &ShapeFilter) -> anyhow::Result<FrameScore> {
    let raw_contours = contours.len();
    let accepted = filter.apply(contours)?;
    let fits = fit_contours(&accepted)?;
    let penalty = best_fit_penalty(&fits);

    Ok(FrameScore {
        raw_contours,
        loss: frame_loss(raw_contours, penalty),
        penalty,
        fits,
    })
}

/// Mean and population standard deviation of the losses of one parameter point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossSummary {
    pub mean: f64,
    pub std: f64,
    pub count: usize,
}

impl LossSummary {
    /// Both statistics are NaN for an empty sample.
    pub fn from_losses(losses: &[f64]) -> Self {
        let n = losses.len() as f64;
        let mean = losses.iter().sum::<f64>() / n;
        let variance = losses.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;

        Self {
            mean,
            std: variance.sqrt(),
            count: losses.len(),
        }
    }
}
