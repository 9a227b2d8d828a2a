use crate::app_config::ApplicationConfig;
use crate::camera::capture_device::CaptureBackend;
use crate::camera::device_manager::{DeviceManager, DeviceState};
use crate::camera::frame::{DisplayBounds, FrameBuffer};
use crate::common::file_utils;
use crate::core::capture_trigger::{self, OutputConfig, PhotoWriter, SavedPhoto};
use crate::core::events::{EventOutcome, StatusMessage, UiEvent};
use crate::core::frame_pump::{FramePump, PollStatus};
use crate::errors::{AppError, CameraError, CaptureError};
use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// What the UI shows besides the preview itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub device_state: DeviceState,
    pub last_error: Option<String>,
    pub last_saved: Option<PathBuf>,
    pub message: StatusMessage,
}

impl SessionStatus {
    pub fn device_index(&self) -> Option<i32> {
        match self.device_state {
            DeviceState::Open(index) => Some(index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub bounds: DisplayBounds,
    pub output_dir: PathBuf,
    pub writer: PhotoWriter,
}

impl SessionSettings {
    pub fn from_config(app: &ApplicationConfig) -> Self {
        SessionSettings {
            bounds: DisplayBounds {
                max_width: app.display_max_width,
                max_height: app.display_max_height,
            },
            output_dir: PathBuf::from(&app.output_directory),
            writer: PhotoWriter::from_config(app),
        }
    }
}

/// One preview/capture session: device, latest frame, output directory and
/// status, all driven from a single thread.
pub struct Session {
    devices: DeviceManager,
    pump: FramePump,
    output: OutputConfig,
    writer: PhotoWriter,
    status: SessionStatus,
}

impl Session {
    pub fn new(backend: Box<dyn CaptureBackend>, settings: SessionSettings) -> Self {
        Session {
            devices: DeviceManager::new(backend),
            pump: FramePump::new(settings.bounds),
            output: OutputConfig::new(settings.output_dir),
            writer: settings.writer,
            status: SessionStatus {
                device_state: DeviceState::Closed,
                last_error: None,
                last_saved: None,
                message: StatusMessage::Waiting,
            },
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn output_dir(&self) -> &Path {
        self.output.dir()
    }

    pub fn photo_count(&self) -> u32 {
        self.output.counter()
    }

    pub fn current_frame(&self) -> Option<&FrameBuffer> {
        self.pump.current()
    }

    pub fn is_camera_open(&self) -> bool {
        self.devices.is_open()
    }

    /// Opens `index`, replacing any open camera. The buffered frame belongs to
    /// the previous device and is dropped either way.
    pub fn open_camera(&mut self, index: i32) -> Result<i32, CameraError> {
        self.pump.clear();
        let result = self.devices.open(index).map(|handle| handle.index());
        self.status.device_state = self.devices.state();
        match &result {
            Ok(index) => {
                self.status.message = StatusMessage::CameraOpened(*index);
                self.status.last_error = None;
            }
            Err(e) => {
                self.status.message = StatusMessage::CameraOpenFailed(index);
                self.status.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// UI-level camera switch: asking for the camera that is already open is
    /// ignored, anything else goes through `open_camera`.
    pub fn select_camera(&mut self, index: i32) -> Option<Result<i32, CameraError>> {
        if self.devices.current_index() == Some(index) {
            debug!("Camera {} is already open, ignoring selection", index);
            return None;
        }
        Some(self.open_camera(index))
    }

    pub fn close_camera(&mut self) {
        self.devices.close();
        self.pump.clear();
        self.status.device_state = self.devices.state();
    }

    /// One tick of the frame pump. Returns the fresh frame, or `None` when no
    /// device is open or the read failed.
    pub fn poll(&mut self) -> Option<&FrameBuffer> {
        match self.pump.tick(&mut self.devices) {
            PollStatus::Frame => {
                if matches!(self.status.message, StatusMessage::FrameReadFailed(_)) {
                    self.status.message = StatusMessage::Waiting;
                }
                self.pump.current()
            }
            PollStatus::ReadFailed(details) => {
                let index = self.devices.current_index().unwrap_or_default();
                self.status.message = StatusMessage::FrameReadFailed(index);
                self.status.last_error = Some(details);
                None
            }
            PollStatus::NoDevice => None,
        }
    }

    pub fn capture(&mut self) -> Result<SavedPhoto, CaptureError> {
        self.capture_at(Local::now())
    }

    /// Saves the buffered frame using `at` for the file name timestamp.
    pub fn capture_at(&mut self, at: DateTime<Local>) -> Result<SavedPhoto, CaptureError> {
        let frame = if self.devices.is_open() { self.pump.current() } else { None };
        let result = capture_trigger::capture_frame(&mut self.output, &self.writer, frame, at);
        match &result {
            Ok(saved) => {
                self.status.message = StatusMessage::PhotoSaved(saved.path.clone());
                self.status.last_saved = Some(saved.path.clone());
                self.status.last_error = None;
            }
            Err(e) => {
                error!("❌ Capture failed: {}", e);
                self.status.message = StatusMessage::CaptureFailed;
                self.status.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// Switches the output directory, creating it if needed, and restarts
    /// photo numbering. On failure the previous directory stays in effect.
    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) -> Result<(), AppError> {
        let dir = dir.into();
        match file_utils::ensure_output_directory(&dir) {
            Ok(dir) => {
                info!("📁 Photos will be saved to: {}", dir.display());
                self.output.set_dir(dir.clone());
                self.status.message = StatusMessage::FolderSet(dir);
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ Keeping output directory {}: {}", self.output.dir().display(), e);
                self.status.message = StatusMessage::FolderFailed(dir);
                self.status.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) -> EventOutcome {
        match event {
            UiEvent::Tick => {
                self.poll();
            }
            UiEvent::Capture => {
                // Outcome is recorded in the status.
                let _ = self.capture();
            }
            UiEvent::SelectCamera(index) => {
                let _ = self.select_camera(index);
            }
            UiEvent::ChangeOutputDir(dir) => {
                let _ = self.set_output_dir(dir);
            }
            UiEvent::Quit => {
                self.shutdown();
                return EventOutcome::Exit;
            }
        }
        EventOutcome::Continue
    }

    /// Releases the camera. Safe to call repeatedly; also runs on drop.
    pub fn shutdown(&mut self) {
        if self.devices.is_open() {
            info!("🏁 Shutting down session, releasing camera");
        }
        self.close_camera();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
