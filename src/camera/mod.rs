pub mod capture_device;
pub mod device_manager;
pub mod frame;
pub mod opencv_device;

pub use capture_device::{CaptureBackend, CaptureDevice, DeviceHandle};
pub use device_manager::{DeviceManager, DeviceState};
pub use frame::{ChannelOrder, DisplayBounds, FrameBuffer, RawFrame};
