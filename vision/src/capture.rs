use anyhow::bail;
use opencv::{
    core::{Mat, MatTraitConst},
    videoio::{VideoCapture, VideoCaptureTrait, VideoCaptureTraitConst, CAP_ANY},
};

/// GStreamer pipeline of the Raspberry Pi camera module.
pub const PI_CAMERA_PIPELINE: &str = "libcamerasrc ! video/x-raw,width=640,height=480 ! videoflip method=clockwise ! videoconvert ! appsink drop=True";

/// Opens a camera by index ("0"), or a video file / GStreamer pipeline.
pub fn open_capture(source: &str) -> anyhow::Result<VideoCapture> {
    let capture = match source.parse::<i32>() {
        Ok(index) => VideoCapture::new(index, CAP_ANY)?,
        Err(_) => VideoCapture::from_file(source, CAP_ANY)?,
    };
    if !capture.is_opened()? {
        bail!("Camera {source} is not available");
    }
    log::info!("Camera available: {source}");

    Ok(capture)
}

/// `None` when the source had no frame to give.
pub fn read_frame(capture: &mut VideoCapture) -> anyhow::Result<Option<Mat>> {
    let mut frame = Mat::default();
    if !capture.read(&mut frame)? || frame.empty() {
        return Ok(None);
    }

    Ok(Some(frame))
}
