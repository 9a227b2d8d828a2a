use crate::camera::frame::RawFrame;
use crate::errors::{AppError, CameraError};
use log::{debug, warn};

/// A single opened capture stream.
pub trait CaptureDevice {
    /// Blocks until the device delivers one frame. A failed or empty read is
    /// reported as `AppError::FrameRead` and leaves the device usable.
    fn read_frame(&mut self) -> Result<RawFrame, AppError>;

    /// Releases the underlying driver resources.
    fn release(&mut self) -> Result<(), AppError>;
}

/// Opens capture devices by index.
pub trait CaptureBackend {
    fn name(&self) -> &str;

    fn open(&mut self, index: i32) -> Result<Box<dyn CaptureDevice>, CameraError>;
}

/// Owned handle to an open device. Dropping it releases the device, so a
/// handle is released exactly once whichever path discards it.
pub struct DeviceHandle {
    index: i32,
    device: Box<dyn CaptureDevice>,
    released: bool,
}

impl DeviceHandle {
    pub fn new(index: i32, device: Box<dyn CaptureDevice>) -> Self {
        DeviceHandle { index, device, released: false }
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn read_frame(&mut self) -> Result<RawFrame, AppError> {
        self.device.read_frame()
    }

    pub fn release(mut self) -> Result<(), AppError> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Result<(), AppError> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!("🔌 Releasing camera {}", self.index);
        self.device.release()
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        if let Err(e) = self.release_inner() {
            warn!("⚠️ Failed to release camera {}: {}", self.index, e);
        }
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("index", &self.index)
            .field("released", &self.released)
            .finish()
    }
}
