use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Camera Open Error: could not open camera index {index}: {details}")]
    CameraOpen { index: i32, details: String },

    #[error("Frame Read Error: {0}")]
    FrameRead(String),

    #[error("No Frame Available: {0}")]
    NoFrameAvailable(String),

    #[error("File Write Error for '{}': {details}", path.display())]
    FileWrite { path: PathBuf, details: String },

    #[error("Display Error: {0}")]
    Display(String),

    #[error("OpenCV Error: {0}")]
    OpenCV(String),
}

/// Error returned by device open operations.
pub type CameraError = AppError;
/// Error returned by the capture trigger.
pub type CaptureError = AppError;

impl From<opencv::Error> for AppError {
    fn from(err: opencv::Error) -> Self {
        AppError::OpenCV(err.to_string())
    }
}
