use crate::camera::device_manager::DeviceManager;
use crate::camera::frame::{DisplayBounds, FrameBuffer};
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    NoDevice,
    Frame,
    ReadFailed(String),
}

/// Holds the single latest frame. Each successful tick replaces it.
#[derive(Debug)]
pub struct FramePump {
    bounds: DisplayBounds,
    current: Option<FrameBuffer>,
    consecutive_failures: u32,
    frames_pumped: u64,
}

impl FramePump {
    pub fn new(bounds: DisplayBounds) -> Self {
        FramePump {
            bounds,
            current: None,
            consecutive_failures: 0,
            frames_pumped: 0,
        }
    }

    pub fn current(&self) -> Option<&FrameBuffer> {
        self.current.as_ref()
    }

    pub fn frames_pumped(&self) -> u64 {
        self.frames_pumped
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Drops the buffered frame, e.g. when the device it came from goes away.
    pub fn clear(&mut self) {
        self.current = None;
        self.consecutive_failures = 0;
    }

    /// Pulls one frame from the open device into the buffer. A failed read
    /// keeps the previous frame and the device stays open.
    pub fn tick(&mut self, devices: &mut DeviceManager) -> PollStatus {
        let read = match devices.read_frame() {
            Some(read) => read,
            None => return PollStatus::NoDevice,
        };

        let converted = read.and_then(|raw| FrameBuffer::from_raw(raw, self.bounds));
        match converted {
            Ok(frame) => {
                if self.consecutive_failures > 0 {
                    debug!("Frame reads recovered after {} failure(s)", self.consecutive_failures);
                }
                self.consecutive_failures = 0;
                self.frames_pumped += 1;
                self.current = Some(frame);
                PollStatus::Frame
            }
            Err(e) => {
                self.consecutive_failures += 1;
                // Only the first failure of a streak is worth a warning at 100 ticks/s.
                if self.consecutive_failures == 1 {
                    warn!("⚠️ {}", e);
                } else {
                    debug!("Frame read failure #{}: {}", self.consecutive_failures, e);
                }
                PollStatus::ReadFailed(e.to_string())
            }
        }
    }
}
