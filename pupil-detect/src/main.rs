mod instrument;

use std::time::Instant;

use clap::Parser;
use instrument::{ResourceMonitor, RunStats};
use opencv::highgui::{destroy_all_windows, imshow, wait_key};
use pupil::{Roi, ShapeFilter};
use vision::{draw_pupils, open_capture, read_frame, to_bgr, PipelineParams, PupilDetector, PI_CAMERA_PIPELINE};

/// Real-time pupil detection with timing and resource figures.
#[derive(Parser, Debug)]
#[command(name = "pupil-detect")]
struct Args {
    /// Camera index, video file or GStreamer pipeline
    #[arg(long, default_value = PI_CAMERA_PIPELINE)]
    source: String,
    /// Stop after this many processed frames
    #[arg(long, default_value_t = 100)]
    max_frames: usize,
    #[arg(long, default_value_t = 25)]
    edge_threshold: i32,
    #[arg(long, default_value_t = 9)]
    blur_kernel_size: i32,
    #[arg(long, default_value_t = 1)]
    morph_kernel_size: i32,
    /// Side of the square crop taken from the top left corner
    #[arg(long, default_value_t = 480)]
    crop: i32,
    /// Skip the preview window
    #[arg(long)]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = Args::parse();

    let params = PipelineParams {
        edge_threshold: args.edge_threshold,
        blur_kernel_size: args.blur_kernel_size,
        morph_kernel_size: args.morph_kernel_size,
    };
    let detector = PupilDetector::new(params, Some(Roi::new(0, 0, args.crop, args.crop)), ShapeFilter::default());
    log::info!("Detecting with {:?}", detector.params());

    let mut capture = open_capture(&args.source)?;
    let mut monitor = ResourceMonitor::new()?;
    let mut stats = RunStats::default();
    let mut rng = rand::thread_rng();

    let started = Instant::now();
    while stats.frames < args.max_frames {
        let Some(frame) = read_frame(&mut capture)? else {
            log::warn!("Source returned no frame, stopping");
            break;
        };

        let detection = detector.process_frame(&frame)?;

        let draw_started = Instant::now();
        let mut output = to_bgr(&detection.frame)?;
        draw_pupils(&mut output, &detection.pupils, &mut rng)?;
        if !args.headless {
            imshow("Processed Frame", &output)?;
        }
        let draw = draw_started.elapsed();

        log::debug!("{} contours, {} pupils", detection.raw_contours, detection.pupils.len());
        stats.add_frame(&detection.timings, draw, monitor.sample());

        if !args.headless && (wait_key(1)? & 0xFF) == 'q' as i32 {
            break;
        }
    }
    let elapsed = started.elapsed();

    log::info!("Total Frames: {}", stats.frames);
    log::info!("Total Execution Time: {} seconds", elapsed.as_secs_f64());
    log::info!("Average FPS: {}", stats.fps(elapsed));
    if let Some((stages, draw)) = stats.mean_timings() {
        log::info!(
            "Average per frame: preprocess {:?}, contours {:?}, filter {:?}, draw {:?}",
            stages.preprocess,
            stages.contours,
            stages.filter,
            draw
        );
    }
    if let Some(resources) = stats.mean_resources() {
        log::info!("Average cpu usage {:.1}%", resources.cpu_percent);
        log::info!("Average memory usage {:.2}%", resources.memory_percent);
    }

    if !args.headless {
        destroy_all_windows()?;
    }

    Ok(())
}

fn setup_logging() {
    simple_log::quick!();
}
