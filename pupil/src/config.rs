use std::{fs, path::Path};

use anyhow::{bail, Context};
use itertools::Itertools;
use serde::Deserialize;

use crate::{
    filter::{ShapeFilter, MIN_HULL_AREA, MIN_HULL_CIRCULARITY},
    grid::ParameterGrid,
};

/// Crop rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Roi {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Roi {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Part of the roi that lies inside a `cols` x `rows` image.
    pub fn clamped(&self, cols: i32, rows: i32) -> Option<Roi> {
        let x0 = self.x.clamp(0, cols);
        let y0 = self.y.clamp(0, rows);
        let x1 = (self.x + self.width).clamp(0, cols);
        let y1 = (self.y + self.height).clamp(0, rows);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Roi::new(x0, y0, x1 - x0, y1 - y0))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub blur_kernel_sizes: Vec<i32>,
    pub edge_thresholds: Vec<i32>,
    pub morph_kernel_size: i32,
    pub min_area: f64,
    pub min_circularity: f64,
    pub roi: Option<Roi>,
    pub image_extension: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            blur_kernel_sizes: vec![7, 9, 11, 13, 15, 17, 19, 21, 23],
            edge_thresholds: vec![
                4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30, 35, 40, 55, 60, 65, 70,
            ],
            morph_kernel_size: 1,
            min_area: MIN_HULL_AREA,
            min_circularity: MIN_HULL_CIRCULARITY,
            // rows 220..640, cols 0..480
            roi: Some(Roi::new(0, 220, 480, 420)),
            image_extension: "png".to_string(),
        }
    }
}

impl SweepConfig {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: SweepConfig =
            serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.blur_kernel_sizes.is_empty() || self.edge_thresholds.is_empty() {
            bail!("Parameter grid is empty");
        }
        if let Some(k) = self.blur_kernel_sizes.iter().find(|&&k| k < 1 || k % 2 == 0) {
            bail!("Blur kernel size {k} must be odd and positive");
        }
        if let Some(t) = self.edge_thresholds.iter().find(|&&t| t <= 0) {
            bail!("Edge threshold {t} must be positive");
        }
        if let Some(k) = self.blur_kernel_sizes.iter().duplicates().next() {
            bail!("Blur kernel size {k} is listed twice");
        }
        if let Some(t) = self.edge_thresholds.iter().duplicates().next() {
            bail!("Edge threshold {t} is listed twice");
        }
        if self.morph_kernel_size < 1 {
            bail!("Morphology kernel size {} must be positive", self.morph_kernel_size);
        }
        if let Some(roi) = self.roi {
            if roi.width <= 0 || roi.height <= 0 {
                bail!("Roi {roi:?} is empty");
            }
        }

        Ok(())
    }

    pub fn grid(&self) -> ParameterGrid {
        ParameterGrid::new(self.blur_kernel_sizes.clone(), self.edge_thresholds.clone())
    }

    pub fn shape_filter(&self) -> ShapeFilter {
        ShapeFilter::new(self.min_area, self.min_circularity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SweepConfig::default();
        config.validate().unwrap();
        assert_eq!(config.grid().len(), 9 * 20);
        assert_eq!(config.shape_filter(), ShapeFilter::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SweepConfig =
            serde_json::from_str(r#"{ "blur_kernel_sizes": [7, 9], "edge_thresholds": [10, 20], "roi": null }"#)
                .unwrap();

        assert_eq!(config.grid(), ParameterGrid::new(vec![7, 9], vec![10, 20]));
        assert_eq!(config.morph_kernel_size, 1);
        assert_eq!(config.roi, None);
        assert_eq!(config.image_extension, "png");
    }

    #[test]
    fn even_blur_kernel_is_rejected() {
        let config = SweepConfig {
            blur_kernel_sizes: vec![7, 8],
            ..SweepConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn repeated_grid_values_are_rejected() {
        let blur = SweepConfig {
            blur_kernel_sizes: vec![7, 9, 7],
            edge_thresholds: vec![10],
            ..SweepConfig::default()
        };
        let edge = SweepConfig {
            edge_thresholds: vec![10, 20, 20],
            ..SweepConfig::default()
        };

        assert!(blur.validate().is_err());
        assert!(edge.validate().is_err());
    }

    #[test]
    fn empty_grid_is_rejected() {
        let config = SweepConfig {
            edge_thresholds: Vec::new(),
            ..SweepConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_file_is_loaded_and_validated() {
        let dir = std::env::temp_dir().join(format!("pupil-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.json");
        let bad = dir.join("bad.json");
        fs::write(&good, r#"{ "edge_thresholds": [25], "morph_kernel_size": 3 }"#).unwrap();
        fs::write(&bad, r#"{ "morph_kernel_size": 0 }"#).unwrap();

        let config = SweepConfig::from_json_file(&good).unwrap();
        assert_eq!(config.edge_thresholds, vec![25]);
        assert_eq!(config.morph_kernel_size, 3);
        assert!(SweepConfig::from_json_file(&bad).is_err());
        assert!(SweepConfig::from_json_file(&dir.join("missing.json")).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn roi_is_clamped_to_the_image() {
        let roi = Roi::new(0, 220, 480, 420);
        assert_eq!(roi.clamped(640, 480), Some(Roi::new(0, 220, 480, 260)));
        assert_eq!(roi.clamped(480, 640), Some(roi));
        assert_eq!(roi.clamped(480, 200), None);
    }
}
