mod workspace;

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Parser;
use opencv::{
    core::{Scalar, Size},
    highgui::{destroy_all_windows, imshow, named_window_def, resize_window, wait_key},
    videoio::{
        VideoCapture, VideoCaptureTraitConst, VideoWriter, VideoWriterTrait, CAP_PROP_FRAME_HEIGHT,
        CAP_PROP_FRAME_WIDTH,
    },
};
use pupil::markers::landmark_crosses;
use vision::{black_canvas, draw_segments, open_capture, read_frame};
use workspace::create_workspace;

const CANVAS_WINDOW: &str = "Data_Collector";
const CROSS_THICKNESS: i32 = 5;

/// Shows fixation crosses on a full screen canvas while the pupil camera runs.
#[derive(Parser, Debug)]
#[command(name = "marker-capture")]
struct Args {
    /// Camera index, video file or GStreamer pipeline
    #[arg(long, default_value = "1.avi")]
    source: String,
    /// Directory the timestamped workspace is created in
    #[arg(long, default_value = ".")]
    output_root: PathBuf,
    #[arg(long, default_value_t = 2000)]
    max_frames: usize,
    /// Record the pupil stream to fixed.avi in the workspace
    #[arg(long)]
    record: bool,
    #[arg(long, default_value_t = 1920)]
    canvas_width: i32,
    #[arg(long, default_value_t = 1080)]
    canvas_height: i32,
}

fn main() -> anyhow::Result<()> {
    simple_log::quick!();
    let args = Args::parse();

    let timestamp = Local::now().format("%d_%m_%Y_%H_%M_%S").to_string();
    let workspace = create_workspace(&args.output_root, &timestamp)?;

    let mut capture = open_capture(&args.source)?;
    let mut writer = if args.record {
        Some(open_writer(&capture, &workspace.join("fixed.avi"))?)
    } else {
        None
    };

    let mut canvas = black_canvas(args.canvas_width, args.canvas_height)?;
    draw_segments(
        &mut canvas,
        &landmark_crosses(args.canvas_width, args.canvas_height),
        Scalar::new(0.0, 0.0, 255.0, 0.0),
        CROSS_THICKNESS,
    )?;
    named_window_def(CANVAS_WINDOW)?;
    resize_window(CANVAS_WINDOW, args.canvas_width, args.canvas_height)?;

    let mut frame_count = 0;
    loop {
        frame_count += 1;
        if let Some(frame) = read_frame(&mut capture)? {
            imshow("frame", &frame)?;
            imshow(CANVAS_WINDOW, &canvas)?;
            if let Some(writer) = writer.as_mut() {
                writer.write(&frame)?;
            }
        }

        if (wait_key(1)? & 0xFF) == 'q' as i32 || frame_count >= args.max_frames {
            break;
        }
    }
    log::info!("Captured {frame_count} frames into {}", workspace.display());

    destroy_all_windows()?;

    Ok(())
}

fn open_writer(capture: &VideoCapture, path: &Path) -> anyhow::Result<VideoWriter> {
    let width = capture.get(CAP_PROP_FRAME_WIDTH)? as i32;
    let height = capture.get(CAP_PROP_FRAME_HEIGHT)? as i32;
    let fourcc = VideoWriter::fourcc('D', 'I', 'V', 'X')?;
    let path = path.to_string_lossy();
    log::info!("Recording {width}x{height} to {path}");

    Ok(VideoWriter::new(&path, fourcc, 30.0, Size::new(width, height), true)?)
}
