pub mod config;
pub mod filter;
pub mod geometry;
pub mod grid;
pub mod markers;
pub mod metrics;
pub mod sweep;
pub mod table;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{Roi, SweepConfig};
pub use filter::{AcceptedContour, ShapeFilter};
pub use geometry::{Contour, FittedEllipse};
pub use grid::{ParameterGrid, ParameterPoint};
pub use metrics::{score_frame, FrameScore, LossSummary};
pub use sweep::{run_sweep, FrameScorer, SweepReport};
pub use table::ResultTable;
