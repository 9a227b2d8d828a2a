use crate::camera::capture_device::{CaptureBackend, DeviceHandle};
use crate::camera::frame::RawFrame;
use crate::errors::{AppError, CameraError};
use log::{debug, error, info, warn};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Closed,
    Open(i32),
    Failed(i32),
}

/// Sole owner of the capture device handle.
pub struct DeviceManager {
    backend: Box<dyn CaptureBackend>,
    handle: Option<DeviceHandle>,
    state: DeviceState,
}

impl DeviceManager {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        debug!("🛠️ DeviceManager using backend '{}'", backend.name());
        DeviceManager {
            backend,
            handle: None,
            state: DeviceState::Closed,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub fn current_index(&self) -> Option<i32> {
        self.handle.as_ref().map(DeviceHandle::index)
    }

    /// Opens `index`, releasing whatever was open before. A failure leaves the
    /// manager closed in the `Failed` state; other indices are never tried.
    pub fn open(&mut self, index: i32) -> Result<&DeviceHandle, CameraError> {
        self.close();

        if index < 0 {
            self.state = DeviceState::Failed(index);
            return Err(AppError::CameraOpen {
                index,
                details: "camera index must be non-negative".to_string(),
            });
        }

        let open_start = Instant::now();
        match self.backend.open(index) {
            Ok(device) => {
                info!("📷 Camera {} opened via '{}' in {:?}", index, self.backend.name(), open_start.elapsed());
                self.state = DeviceState::Open(index);
                let handle: &DeviceHandle = self.handle.insert(DeviceHandle::new(index, device));
                Ok(handle)
            }
            Err(e) => {
                error!("❌ Could not open camera {}: {}", index, e);
                self.state = DeviceState::Failed(index);
                Err(match e {
                    AppError::CameraOpen { .. } => e,
                    other => AppError::CameraOpen { index, details: other.to_string() },
                })
            }
        }
    }

    /// Releases the open device. No-op when nothing is open.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            let index = handle.index();
            if let Err(e) = handle.release() {
                warn!("⚠️ Error while releasing camera {}: {}", index, e);
            }
            self.state = DeviceState::Closed;
        }
    }

    /// Reads one frame from the open device; `None` when nothing is open.
    pub fn read_frame(&mut self) -> Option<Result<RawFrame, AppError>> {
        self.handle.as_mut().map(DeviceHandle::read_frame)
    }
}

impl Drop for DeviceManager {
    fn drop(&mut self) {
        self.close();
    }
}
