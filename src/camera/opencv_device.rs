use crate::camera::capture_device::{CaptureBackend, CaptureDevice};
use crate::camera::frame::{ChannelOrder, RawFrame};
use crate::errors::{AppError, CameraError};
use log::{debug, warn};
use opencv::{core as opencv_core, imgproc, prelude::*, videoio};
use std::time::Instant;

/// Capture backend on top of OpenCV's `VideoCapture`.
#[derive(Debug, Clone, Default)]
pub struct OpenCvBackend {
    pub capture_width: Option<u32>,
    pub capture_height: Option<u32>,
}

impl OpenCvBackend {
    pub fn new(capture_width: Option<u32>, capture_height: Option<u32>) -> Self {
        OpenCvBackend { capture_width, capture_height }
    }
}

impl CaptureBackend for OpenCvBackend {
    fn name(&self) -> &str {
        "opencv"
    }

    fn open(&mut self, index: i32) -> Result<Box<dyn CaptureDevice>, CameraError> {
        debug!("Creating VideoCapture for camera index {}", index);
        let open_start = Instant::now();
        let open_err = |details: String| AppError::CameraOpen { index, details };

        let mut cap = videoio::VideoCapture::new(index, videoio::CAP_ANY)
            .map_err(|e| open_err(format!("OpenCV: {}", e)))?;
        let opened = cap
            .is_opened()
            .map_err(|e| open_err(format!("OpenCV: is_opened failed: {}", e)))?;
        if !opened {
            return Err(open_err("camera not found or in use".to_string()));
        }
        debug!("  VideoCapture opened for index {} in {:?}", index, open_start.elapsed());

        for (prop, value, label) in [
            (videoio::CAP_PROP_FRAME_WIDTH, self.capture_width, "width"),
            (videoio::CAP_PROP_FRAME_HEIGHT, self.capture_height, "height"),
        ] {
            if let Some(value) = value {
                match cap.set(prop, value as f64) {
                    Ok(true) => debug!("  Requested capture {} {} on camera {}", label, value, index),
                    Ok(false) => warn!("⚠️ Camera {} ignored capture {} request {}", index, label, value),
                    Err(e) => warn!("⚠️ Setting capture {} on camera {} failed: {}", label, index, e),
                }
            }
        }

        Ok(Box::new(OpenCvDevice { cap, index }))
    }
}

pub struct OpenCvDevice {
    cap: videoio::VideoCapture,
    index: i32,
}

impl CaptureDevice for OpenCvDevice {
    fn read_frame(&mut self) -> Result<RawFrame, AppError> {
        let mut frame = opencv_core::Mat::default();
        let ok = self
            .cap
            .read(&mut frame)
            .map_err(|e| AppError::FrameRead(format!("OpenCV: read failed for camera {}: {}", self.index, e)))?;
        if !ok || frame.empty() {
            return Err(AppError::FrameRead(format!("camera {} returned no frame", self.index)));
        }
        mat_to_raw_frame(&frame)
    }

    fn release(&mut self) -> Result<(), AppError> {
        self.cap.release()?;
        Ok(())
    }
}

/// Copies an 8-bit OpenCV frame into a packed BGR `RawFrame`.
pub fn mat_to_raw_frame(frame: &opencv_core::Mat) -> Result<RawFrame, AppError> {
    let bgr = match frame.typ() {
        opencv_core::CV_8UC3 => frame.try_clone()?,
        opencv_core::CV_8UC1 => convert(frame, imgproc::COLOR_GRAY2BGR)?,
        opencv_core::CV_8UC4 => convert(frame, imgproc::COLOR_BGRA2BGR)?,
        other => {
            return Err(AppError::FrameRead(format!("unsupported frame type {}", other)));
        }
    };
    // try_clone and cvt_color both yield continuous matrices
    let data = bgr.data_bytes()?.to_vec();
    RawFrame::new(bgr.cols() as u32, bgr.rows() as u32, ChannelOrder::Bgr, data)
}

fn convert(frame: &opencv_core::Mat, code: i32) -> Result<opencv_core::Mat, AppError> {
    let mut out = opencv_core::Mat::default();
    imgproc::cvt_color_def(frame, &mut out, code)?;
    Ok(out)
}
