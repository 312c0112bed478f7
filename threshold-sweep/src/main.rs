mod images;

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Parser;
use images::{folder_stem, list_images};
use pupil::{run_sweep, SweepConfig};
use vision::ImageScorer;

/// Sweeps blur kernel sizes and edge thresholds over a folder of eye images
/// and writes the loss tables next to the images.
#[derive(Parser, Debug)]
#[command(name = "threshold-sweep")]
struct Args {
    /// Folder with the recorded images
    folder: PathBuf,
    /// JSON file overriding the default sweep configuration
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, default_value = "../log_threshold_determination.log")]
    log_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_file)?;

    log::info!("{}", "*".repeat(50));
    log::info!("EXPERIMENT START");

    let config = match &args.config {
        Some(path) => SweepConfig::from_json_file(path)?,
        None => SweepConfig::default(),
    };

    log::info!("Folder Name :{}", args.folder.display());
    let images = list_images(&args.folder, &config.image_extension)?;
    log::info!("{} images, {} parameter points", images.len(), config.grid().len());

    let timestamp = Local::now().format("%d_%m_%Y_%H_%M_%S").to_string();
    let mut scorer = ImageScorer::from_config(&config);
    let report = run_sweep(&config.grid(), &images, &mut scorer)?;

    let files = report.write_csv_files(&args.folder, &folder_stem(&args.folder), &timestamp)?;
    log::info!("Measurements written to {}", files.measurements.display());
    log::info!("Loss tables written to {} and {}", files.loss_mean.display(), files.loss_sigma.display());
    if let Some((point, summary)) = report.best() {
        log::info!(
            "Lowest mean loss {:.3} (std {:.3}) at blur {}, edge threshold {}",
            summary.mean,
            summary.std,
            point.blur_kernel_size,
            point.edge_threshold
        );
    }

    log::info!("EXPERIMENT END");
    log::info!("{}", "*".repeat(50));

    Ok(())
}

fn setup_logging(log_file: &Path) -> anyhow::Result<()> {
    simple_log::file(log_file.display().to_string(), "debug", 100, 10).map_err(anyhow::Error::msg)
}
